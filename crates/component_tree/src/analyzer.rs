use std::{
    future::Future,
    panic::AssertUnwindSafe,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::FutureExt;
use logger::Logger;
use swc_utils_parse::ParseError;

use crate::{
    cfg::ComponentTreeConfig,
    entry::{EntryResolution, EntryResolver, EntryRule},
    parse::{extract_file, FileExtraction},
    registry::ComponentRegistry,
    throttled_async_map::throttled_async_map,
    tree::{TreeBuilder, TreeNode},
    walk::{walk_source_files, WalkedSources},
};

/// Why a single file contributed nothing to the registry
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("extraction of {path} panicked")]
    Panicked { path: String },
}

/// The tree, along with what was learned while building it
#[derive(Debug, Clone)]
pub struct ComponentTreeAnalysis {
    pub tree: TreeNode,
    pub entry: EntryResolution,
    /// Every source file found, in discovery order
    pub scanned_files: Vec<PathBuf>,
    /// Files that could not be read or parsed
    pub failed_files: Vec<PathBuf>,
    pub registry_size: usize,
}

/// Runs the full analysis over a source directory.
///
/// Holds the configuration and the entry rules, so callers that add their
/// own rules can run several analyses with them.
pub struct ComponentTreeAnalyzer {
    config: Arc<ComponentTreeConfig>,
    entry_resolver: EntryResolver,
}

impl ComponentTreeAnalyzer {
    pub fn new(config: ComponentTreeConfig) -> Self {
        Self {
            config: Arc::new(config),
            entry_resolver: EntryResolver::default(),
        }
    }

    /// Appends an entry rule after the built-in ones
    pub fn with_entry_rule(mut self, rule: impl EntryRule + 'static) -> Self {
        self.entry_resolver = self.entry_resolver.with_rule(rule);
        self
    }

    pub fn with_entry_resolver(mut self, entry_resolver: EntryResolver) -> Self {
        self.entry_resolver = entry_resolver;
        self
    }

    pub fn config(&self) -> &ComponentTreeConfig {
        &self.config
    }

    pub async fn analyze(&self, root_dir: impl AsRef<Path>, logger: impl Logger) -> TreeNode {
        self.analyze_detailed(root_dir, logger).await.tree
    }

    pub async fn analyze_detailed(
        &self,
        root_dir: impl AsRef<Path>,
        logger: impl Logger,
    ) -> ComponentTreeAnalysis {
        let root_dir = root_dir.as_ref().to_path_buf();

        let walked = self.walk(root_dir, &logger).await;
        for error in walked.errors.iter() {
            logger.warn(error);
        }
        let scanned_files = walked.files;
        tracing::debug!("found {} source files", scanned_files.len());

        let (extractions, failed_files) = self.load_all(&scanned_files, &logger).await;
        let registry = ComponentRegistry::from_extractions(&extractions);
        tracing::debug!("registry holds {} components", registry.len());

        let candidates = self
            .entry_resolver
            .select_entry_file(&extractions, &self.config);
        let entry_source = match candidates.selected() {
            Some((entry_path, _)) => match tokio::fs::read_to_string(entry_path).await {
                Ok(text) => Some(text),
                Err(e) => {
                    logger.warn(format!(
                        "could not re-read entry file {}: {e}",
                        entry_path.display()
                    ));
                    None
                }
            },
            None => {
                logger.warn("no entry file found");
                None
            }
        };
        let entry = self.entry_resolver.resolve_chain_from_source(
            &candidates,
            entry_source.as_deref(),
            &extractions,
            &registry,
            &self.config,
            &logger,
        );
        tracing::debug!(
            "entry file {:?} ({:?}), root chain {:?}",
            entry.entry_file,
            entry.strength,
            entry.root_chain
        );

        let tree = TreeBuilder::new(&registry, self.config.attach_mode).build(
            &entry.root_chain,
            entry.entry_file.as_deref(),
            &self.config.default_root,
        );

        ComponentTreeAnalysis {
            tree,
            entry,
            scanned_files,
            failed_files,
            registry_size: registry.len(),
        }
    }

    async fn walk(&self, root_dir: PathBuf, logger: &impl Logger) -> WalkedSources {
        let config = self.config.clone();
        match tokio::task::spawn_blocking(move || walk_source_files(&root_dir, &config)).await {
            Ok(walked) => walked,
            Err(e) => {
                logger.error(format!("directory walk failed: {e}"));
                WalkedSources::default()
            }
        }
    }

    /// Reads and extracts every file, returning the extractions in input
    /// order. Files that fail to load keep their slot with an empty result.
    async fn load_all(
        &self,
        files: &[PathBuf],
        logger: &impl Logger,
    ) -> (Vec<FileExtraction>, Vec<PathBuf>) {
        let config = self.config.clone();
        let loaded = throttled_async_map(
            self.config.max_concurrent_reads,
            files.to_vec(),
            move |path| load_and_extract(path, config.clone()),
        )
        .await;

        let loaded = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                logger.error(format!("a file task failed, discarding all results: {e}"));
                return (vec![], vec![]);
            }
        };

        let mut extractions = Vec::with_capacity(loaded.len());
        let mut failed_files = Vec::new();
        for (path, result) in files.iter().zip(loaded) {
            match result {
                Ok(extraction) => {
                    for diagnostic in extraction.diagnostics.iter() {
                        replay_diagnostic(logger, diagnostic);
                    }
                    extractions.push(extraction);
                }
                Err(e) => {
                    logger.warn(format!("skipping {}: {e}", path.display()));
                    failed_files.push(path.clone());
                    extractions.push(FileExtraction::empty(path));
                }
            }
        }
        (extractions, failed_files)
    }
}

impl Default for ComponentTreeAnalyzer {
    fn default() -> Self {
        Self::new(ComponentTreeConfig::default())
    }
}

async fn load_and_extract(
    path: PathBuf,
    config: Arc<ComponentTreeConfig>,
) -> Result<FileExtraction, LoadError> {
    let display_path = path.display().to_string();
    isolate_panic(display_path, read_and_extract(path, config)).await
}

/// Turns a panic inside one file's task into a [LoadError] for that file, so
/// the other files of the run are unaffected
async fn isolate_panic<F>(path: String, load: F) -> Result<FileExtraction, LoadError>
where
    F: Future<Output = Result<FileExtraction, LoadError>>,
{
    match AssertUnwindSafe(load).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(LoadError::Panicked { path }),
    }
}

async fn read_and_extract(
    path: PathBuf,
    config: Arc<ComponentTreeConfig>,
) -> Result<FileExtraction, LoadError> {
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
    Ok(extract_file(&path, text, &config)?)
}

/// Diagnostics are buffered with their level prefix; route them back to
/// the matching level of the caller's logger
fn replay_diagnostic(logger: &impl Logger, diagnostic: &str) {
    if let Some(message) = diagnostic.strip_prefix("WARN: ") {
        logger.warn(message);
    } else if let Some(message) = diagnostic.strip_prefix("ERROR: ") {
        logger.error(message);
    } else {
        logger.log(diagnostic);
    }
}

/// Analyzes the sources under `root_dir` and returns their component tree.
///
/// Never fails: unreadable directories, unparseable files and unresolved
/// entry points all degrade to a smaller tree.
pub async fn analyze(
    root_dir: impl AsRef<Path>,
    config: &ComponentTreeConfig,
    logger: impl Logger,
) -> TreeNode {
    ComponentTreeAnalyzer::new(config.clone())
        .analyze(root_dir, logger)
        .await
}

/// Like [analyze], but also reports the entry point and scanned files
pub async fn analyze_detailed(
    root_dir: impl AsRef<Path>,
    config: &ComponentTreeConfig,
    logger: impl Logger,
) -> ComponentTreeAnalysis {
    ComponentTreeAnalyzer::new(config.clone())
        .analyze_detailed(root_dir, logger)
        .await
}
