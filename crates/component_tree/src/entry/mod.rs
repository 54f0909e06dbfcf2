use std::path::{Path, PathBuf};

use logger::Logger;
use swc_ecma_visit::VisitWith;
use swc_utils_parse::parse_source_file;

use crate::{cfg::ComponentTreeConfig, parse::FileExtraction, registry::ComponentRegistry};

pub mod render_visitor;
pub mod rules;

use render_visitor::RootRenderVisitor;
pub use rules::{
    DefaultRootFallbackRule, FirstUsageFallbackRule, PathNameRule, RenderMarkupChainRule,
    RootRenderRule, StructuralWrapperRule,
};

/// How confident the resolver is that a file bootstraps the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryStrength {
    #[default]
    None,
    /// The file name looks like an entry file
    Weak,
    /// The file mounts the application root
    Strong,
}

/// Entry file candidates collected while observing the scanned files
#[derive(Debug, Default, Clone)]
pub struct EntryCandidates {
    pub weak: Option<PathBuf>,
    pub strong: Option<PathBuf>,
}

impl EntryCandidates {
    /// The strongest candidate, if any
    pub fn selected(&self) -> Option<(&Path, EntryStrength)> {
        if let Some(strong) = &self.strong {
            return Some((strong.as_path(), EntryStrength::Strong));
        }
        self.weak
            .as_deref()
            .map(|weak| (weak, EntryStrength::Weak))
    }
}

/// Everything a rule may look at while refining the root chain
pub struct ChainContext<'a> {
    pub config: &'a ComponentTreeConfig,
    pub registry: &'a ComponentRegistry,
    /// Extraction of the selected entry file, if one was selected
    pub entry: Option<&'a FileExtraction>,
    /// Components mounted by the entry file's render call, when it has one
    pub render_chain: Option<&'a [String]>,
}

/// One step of entry point resolution.
///
/// Rules run in order. Every rule sees every scanned file in discovery order
/// through [EntryRule::observe_file], then every rule gets a chance to edit
/// the root chain through [EntryRule::refine_chain].
pub trait EntryRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn observe_file(
        &self,
        _file: &FileExtraction,
        _config: &ComponentTreeConfig,
        _candidates: &mut EntryCandidates,
    ) {
    }

    fn refine_chain(&self, _context: &ChainContext, _chain: &mut Vec<String>) {}
}

/// The resolved entry point of an application
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EntryResolution {
    pub entry_file: Option<PathBuf>,
    pub strength: EntryStrength,
    pub root_chain: Vec<String>,
}

/// Ordered chain of [EntryRule]s
pub struct EntryResolver {
    rules: Vec<Box<dyn EntryRule>>,
}

impl Default for EntryResolver {
    fn default() -> Self {
        Self::empty()
            .with_rule(PathNameRule)
            .with_rule(RootRenderRule)
            .with_rule(RenderMarkupChainRule)
            .with_rule(FirstUsageFallbackRule)
            .with_rule(StructuralWrapperRule)
            .with_rule(DefaultRootFallbackRule)
    }
}

impl EntryResolver {
    /// A resolver with no rules, which never finds an entry point
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule to the end of the chain
    pub fn with_rule(mut self, rule: impl EntryRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Observes every scanned file, in order, and collects entry candidates
    pub fn select_entry_file(
        &self,
        files: &[FileExtraction],
        config: &ComponentTreeConfig,
    ) -> EntryCandidates {
        let mut candidates = EntryCandidates::default();
        for file in files {
            for rule in self.rules.iter() {
                rule.observe_file(file, config, &mut candidates);
            }
        }
        candidates
    }

    /// Runs every rule's chain refinement in order
    pub fn resolve_chain(&self, context: &ChainContext) -> Vec<String> {
        let mut chain = Vec::new();
        for rule in self.rules.iter() {
            rule.refine_chain(context, &mut chain);
            tracing::trace!("after {}: {:?}", rule.name(), chain);
        }
        chain
    }

    /// Resolves the root chain of the selected entry file.
    ///
    /// `entry_source` is the entry file's text, read again by the caller. It is
    /// re-parsed here to find the markup passed to its render call. A file that
    /// cannot be re-parsed falls back to the usage-based rules.
    pub fn resolve_chain_from_source(
        &self,
        candidates: &EntryCandidates,
        entry_source: Option<&str>,
        files: &[FileExtraction],
        registry: &ComponentRegistry,
        config: &ComponentTreeConfig,
        logger: impl Logger,
    ) -> EntryResolution {
        let (entry_file, strength) = match candidates.selected() {
            Some((path, strength)) => (Some(path.to_path_buf()), strength),
            None => (None, EntryStrength::None),
        };

        let render_chain = match (&entry_file, entry_source) {
            (Some(path), Some(source)) => match parse_source_file(path, source) {
                Ok(parsed) => {
                    let mut visitor = RootRenderVisitor::new(config);
                    parsed.module.visit_with(&mut visitor);
                    visitor.render_chain
                }
                Err(e) => {
                    logger.warn(format!("could not re-parse entry file: {e}"));
                    None
                }
            },
            _ => None,
        };

        let entry = entry_file
            .as_deref()
            .and_then(|path| files.iter().find(|file| file.file_path == path));
        let context = ChainContext {
            config,
            registry,
            entry,
            render_chain: render_chain.as_deref(),
        };

        EntryResolution {
            root_chain: self.resolve_chain(&context),
            entry_file,
            strength,
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use logger::VecLogger;
    use pretty_assertions::assert_eq;

    use super::{ChainContext, EntryResolution, EntryResolver, EntryRule, EntryStrength};
    use crate::{
        cfg::ComponentTreeConfig,
        parse::{extract_file, FileExtraction},
        registry::ComponentRegistry,
    };

    fn extract_all(files: &[(&str, &str)]) -> Vec<FileExtraction> {
        let config = ComponentTreeConfig::default();
        files
            .iter()
            .map(|(path, src)| extract_file(Path::new(path), *src, &config).unwrap())
            .collect()
    }

    fn resolve(resolver: &EntryResolver, files: &[(&str, &str)]) -> EntryResolution {
        let config = ComponentTreeConfig::default();
        let extractions = extract_all(files);
        let registry = ComponentRegistry::from_extractions(&extractions);
        let candidates = resolver.select_entry_file(&extractions, &config);
        let source = candidates.selected().and_then(|(path, _)| {
            files
                .iter()
                .find(|(file_path, _)| Path::new(file_path) == path)
                .map(|(_, src)| *src)
        });
        let logger = VecLogger::new();
        resolver.resolve_chain_from_source(
            &candidates,
            source,
            &extractions,
            &registry,
            &config,
            &logger,
        )
    }

    #[test]
    fn test_strict_mode_wrapper_is_skipped() {
        let resolution = resolve(
            &EntryResolver::default(),
            &[
                ("src/App.tsx", "export const App = () => <div />;"),
                (
                    "src/index.tsx",
                    "ReactDOM.createRoot(el).render(<React.StrictMode><App /></React.StrictMode>);",
                ),
            ],
        );
        assert_eq!(resolution.entry_file, Some(PathBuf::from("src/index.tsx")));
        assert_eq!(resolution.strength, EntryStrength::Strong);
        assert_eq!(resolution.root_chain, vec!["App"]);
    }

    #[test]
    fn test_router_wrapper_is_skipped_when_not_alone() {
        let resolution = resolve(
            &EntryResolver::default(),
            &[(
                "src/index.jsx",
                "ReactDOM.render(<BrowserRouter><Shell /></BrowserRouter>, root);",
            )],
        );
        assert_eq!(resolution.root_chain, vec!["Shell"]);

        let alone = resolve(
            &EntryResolver::default(),
            &[("src/index.jsx", "ReactDOM.render(<AppRouter />, root);")],
        );
        assert_eq!(alone.root_chain, vec!["AppRouter"]);
    }

    #[test]
    fn test_render_call_beats_file_name() {
        let candidates = EntryResolver::default().select_entry_file(
            &extract_all(&[
                ("src/App.tsx", "export const App = () => <div />;"),
                ("src/bootstrap.tsx", "createRoot(el).render(<App />);"),
                ("src/main.tsx", "export const x = 1;"),
            ]),
            &ComponentTreeConfig::default(),
        );
        assert_eq!(candidates.weak, Some(PathBuf::from("src/main.tsx")));
        assert_eq!(
            candidates.selected(),
            Some((Path::new("src/bootstrap.tsx"), EntryStrength::Strong))
        );
    }

    #[test]
    fn test_falls_back_to_first_usage() {
        // no render call in the weak candidate
        let resolution = resolve(
            &EntryResolver::default(),
            &[(
                "src/App.tsx",
                "export const App = () => <StrictMode><Layout><Page /></Layout></StrictMode>;",
            )],
        );
        assert_eq!(resolution.strength, EntryStrength::Weak);
        assert_eq!(resolution.root_chain, vec!["Layout"]);
    }

    #[test]
    fn test_falls_back_to_default_root() {
        let resolution = resolve(
            &EntryResolver::default(),
            &[
                ("src/App.tsx", "export default function App() { return null; }"),
            ],
        );
        assert_eq!(resolution.entry_file, Some(PathBuf::from("src/App.tsx")));
        assert_eq!(resolution.root_chain, vec!["App"]);
    }

    #[test]
    fn test_no_entry_file() {
        let resolution = resolve(
            &EntryResolver::default(),
            &[("src/widgets/Card.tsx", "export const Card = () => <div />;")],
        );
        assert_eq!(resolution.entry_file, None);
        assert_eq!(resolution.strength, EntryStrength::None);
        assert!(resolution.root_chain.is_empty());
    }

    struct ForcedRoot(&'static str);

    impl EntryRule for ForcedRoot {
        fn name(&self) -> &'static str {
            "forced-root"
        }

        fn refine_chain(&self, _context: &ChainContext, chain: &mut Vec<String>) {
            *chain = vec![self.0.to_string()];
        }
    }

    #[test]
    fn test_custom_rules_run_last() {
        let resolver = EntryResolver::default().with_rule(ForcedRoot("Storybook"));
        assert_eq!(
            resolver.rule_names(),
            vec![
                "path-name",
                "root-render",
                "render-markup-chain",
                "first-usage-fallback",
                "structural-wrapper",
                "default-root-fallback",
                "forced-root",
            ]
        );

        let resolution = resolve(
            &resolver,
            &[("src/main.tsx", "createRoot(el).render(<App />);")],
        );
        assert_eq!(resolution.root_chain, vec!["Storybook"]);
    }
}
