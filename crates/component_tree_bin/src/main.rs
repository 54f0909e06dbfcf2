use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use component_tree::{
    AttachMode, ComponentTreeAnalyzer, ComponentTreeConfig, ComponentTreeJSONConfig, TreeNode,
};
use logger::TracingLogger;
use path_clean::PathClean;

mod server;

const VIEWER_HTML: &str = include_str!("../assets/index.html");
const TREE_FILE_NAME: &str = "tree.json";
const LOG_ENV_VAR: &str = "COMPONENT_TREE_LOG";

/// Generate a component tree of a React codebase
#[derive(Parser, Debug)]
#[command(version, about)]
struct CliArgs {
    /// Source directory of the React codebase
    #[arg(short, long, default_value = "./src")]
    source: PathBuf,
    /// Output directory for generated files
    #[arg(short, long, default_value = "./component-tree-output")]
    output: PathBuf,
    /// Port of the preview server
    #[arg(short, long, default_value_t = 4001)]
    port: u16,
    /// JSON config file. Flags take precedence over its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where the usages of an expanded component are attached
    #[arg(long, value_enum)]
    attach_mode: Option<CliAttachMode>,
    /// Write the output without starting the preview server
    #[arg(long)]
    no_serve: bool,
    /// Don't open a browser once the preview server is running
    #[arg(long)]
    no_open: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliAttachMode {
    CurrentNode,
    CallSite,
}

impl From<CliAttachMode> for AttachMode {
    fn from(value: CliAttachMode) -> Self {
        match value {
            CliAttachMode::CurrentNode => AttachMode::CurrentNode,
            CliAttachMode::CallSite => AttachMode::CallSite,
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf().clean());
    }
    let cwd = std::env::current_dir().context("Failed to get the current directory")?;
    Ok(cwd.join(path).clean())
}

fn load_config(args: &CliArgs) -> Result<ComponentTreeConfig> {
    let mut json_config = match &args.config {
        Some(config_path) => {
            tracing::info!("reading config from path {}", config_path.display());
            let config_str = std::fs::read_to_string(config_path).with_context(|| {
                format!("Failed to read config file {}", config_path.display())
            })?;
            serde_json::from_str::<ComponentTreeJSONConfig>(&config_str).with_context(|| {
                format!("Failed to parse config file {}", config_path.display())
            })?
        }
        None => ComponentTreeJSONConfig::default(),
    };
    if let Some(attach_mode) = args.attach_mode {
        json_config.attach_mode = attach_mode.into();
    }
    ComponentTreeConfig::try_from(json_config).context("Invalid config")
}

/// Writes the tree and the viewer page into `output_dir`
async fn write_artifacts(output_dir: &Path, tree: &TreeNode) -> Result<()> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let tree_path = output_dir.join(TREE_FILE_NAME);
    let tree_json = serde_json::to_string_pretty(tree).context("Failed to serialize the tree")?;
    tokio::fs::write(&tree_path, tree_json)
        .await
        .with_context(|| format!("Failed to write {}", tree_path.display()))?;

    let html_path = output_dir.join("index.html");
    tokio::fs::write(&html_path, VIEWER_HTML)
        .await
        .with_context(|| format!("Failed to write {}", html_path.display()))?;
    Ok(())
}

async fn run(args: CliArgs) -> Result<()> {
    let config = load_config(&args)?;
    let source_dir = absolute(&args.source)?;
    let output_dir = absolute(&args.output)?;

    let start_time = std::time::Instant::now();
    let analysis = ComponentTreeAnalyzer::new(config)
        .analyze_detailed(&source_dir, TracingLogger)
        .await;
    tracing::info!(
        "analyzed {} files ({} failed), {} components in {}ms",
        analysis.scanned_files.len(),
        analysis.failed_files.len(),
        analysis.registry_size,
        start_time.elapsed().as_millis()
    );

    write_artifacts(&output_dir, &analysis.tree).await?;
    tracing::info!("wrote {}", output_dir.join(TREE_FILE_NAME).display());

    if args.no_serve {
        return Ok(());
    }
    server::serve(output_dir, args.port, !args.no_open).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    match run(CliArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
