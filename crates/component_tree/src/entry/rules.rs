use path_slash::PathBufExt;

use super::{ChainContext, EntryCandidates, EntryRule};
use crate::{cfg::ComponentTreeConfig, parse::FileExtraction};

/// A file whose path has an `app.` or `main.` segment is a weak candidate.
/// The last such file in discovery order wins.
pub struct PathNameRule;

impl EntryRule for PathNameRule {
    fn name(&self) -> &'static str {
        "path-name"
    }

    fn observe_file(
        &self,
        file: &FileExtraction,
        config: &ComponentTreeConfig,
        candidates: &mut EntryCandidates,
    ) {
        if config.is_entry_file_path(&file.file_path.to_slash_lossy()) {
            candidates.weak = Some(file.file_path.clone());
        }
    }
}

/// The first file that mounts the application root is a strong candidate
pub struct RootRenderRule;

impl EntryRule for RootRenderRule {
    fn name(&self) -> &'static str {
        "root-render"
    }

    fn observe_file(
        &self,
        file: &FileExtraction,
        _config: &ComponentTreeConfig,
        candidates: &mut EntryCandidates,
    ) {
        if file.renders_root && candidates.strong.is_none() {
            candidates.strong = Some(file.file_path.clone());
        }
    }
}

/// Uses the components mounted by the entry file's render call
pub struct RenderMarkupChainRule;

impl EntryRule for RenderMarkupChainRule {
    fn name(&self) -> &'static str {
        "render-markup-chain"
    }

    fn refine_chain(&self, context: &ChainContext, chain: &mut Vec<String>) {
        if !chain.is_empty() {
            return;
        }
        if let Some(render_chain) = context.render_chain {
            chain.extend(render_chain.iter().cloned());
        }
    }
}

/// Without a render call, uses the first component the entry file renders
/// that is not a structural wrapper
pub struct FirstUsageFallbackRule;

impl EntryRule for FirstUsageFallbackRule {
    fn name(&self) -> &'static str {
        "first-usage-fallback"
    }

    fn refine_chain(&self, context: &ChainContext, chain: &mut Vec<String>) {
        if !chain.is_empty() {
            return;
        }
        let Some(entry) = context.entry else {
            return;
        };
        let mut usages = entry.used_components.clone();
        skip_structural_wrappers(context.config, &mut usages);
        chain.extend(usages.into_iter().take(1));
    }
}

/// Drops wrappers from the head of the chain, e.g. `StrictMode`, or a router
/// around the real root component
pub struct StructuralWrapperRule;

impl EntryRule for StructuralWrapperRule {
    fn name(&self) -> &'static str {
        "structural-wrapper"
    }

    fn refine_chain(&self, context: &ChainContext, chain: &mut Vec<String>) {
        skip_structural_wrappers(context.config, chain);
    }
}

/// Last resort: the conventional root component, if one was declared
pub struct DefaultRootFallbackRule;

impl EntryRule for DefaultRootFallbackRule {
    fn name(&self) -> &'static str {
        "default-root-fallback"
    }

    fn refine_chain(&self, context: &ChainContext, chain: &mut Vec<String>) {
        if chain.is_empty() && context.registry.contains(&context.config.default_root) {
            chain.push(context.config.default_root.clone());
        }
    }
}

/// Removes wrappers from the head of `chain` until a real component leads.
///
/// A name containing "route" only counts as a wrapper while something
/// follows it.
pub fn skip_structural_wrappers(config: &ComponentTreeConfig, chain: &mut Vec<String>) {
    let skip = chain
        .iter()
        .enumerate()
        .take_while(|(i, name)| {
            let remaining = chain.len() - i;
            config.is_structural_wrapper(name)
                || (remaining > 1 && name.to_lowercase().contains("route"))
        })
        .count();
    chain.drain(..skip);
}
