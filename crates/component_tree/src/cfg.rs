use std::path::Path;

use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::tree::AttachMode;

/// Directory names that are never walked, regardless of the `skip` config
pub const DEFAULT_SKIPPED_DIRS: [&str; 2] = ["node_modules", ".git"];

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid skip glob {pattern:?}: {source}")]
    InvalidSkipGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("invalid entry file pattern {pattern:?}: {source}")]
    InvalidEntryPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("maxConcurrentReads must be at least 1")]
    ZeroConcurrency,
    #[error("no source extensions configured")]
    NoExtensions,
}

/// A JSON serializable proxy for the ComponentTreeConfig struct
///
/// This struct is used to deserialize the config from a config file with
/// serde. Missing fields take their defaults.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentTreeJSONConfig {
    /// File extensions (without the leading dot) treated as source files
    pub extensions: Vec<String>,
    /// A List of globs.
    /// Matching files and directories won't be scanned during the file walk
    ///
    /// Matches are made against the names of the individual directories,
    /// NOT the full directory paths
    pub skip: Vec<String>,
    /// Where the usages of an expanded component are attached
    pub attach_mode: AttachMode,
    /// Tag name of routing elements, e.g. `<Route path="/x" component={Page} />`
    pub route_tag: String,
    /// Attributes of a routing element that name its target component
    pub route_target_attributes: Vec<String>,
    /// Receivers of root render calls, e.g. `ReactDOM.render(..)`
    pub render_namespaces: Vec<String>,
    /// Tags skipped at the head of the root chain, compared case-insensitively
    /// against the last segment of the tag name
    pub structural_wrappers: Vec<String>,
    /// Regular expressions matched against slash-separated file paths.
    /// A matching file is a weak entry file candidate
    pub entry_file_patterns: Vec<String>,
    /// Name of the root node when no root component can be resolved
    pub default_root: String,
    /// Maximum number of files read and parsed at once
    pub max_concurrent_reads: usize,
}

impl Default for ComponentTreeJSONConfig {
    fn default() -> Self {
        Self {
            extensions: ["js", "jsx", "ts", "tsx"].map(String::from).to_vec(),
            skip: vec![],
            attach_mode: AttachMode::default(),
            route_tag: "Route".to_string(),
            route_target_attributes: ["component", "Component", "element"]
                .map(String::from)
                .to_vec(),
            render_namespaces: vec!["ReactDOM".to_string()],
            structural_wrappers: vec!["strictmode".to_string()],
            entry_file_patterns: vec![r"(?i)(^|/)(app|main)\.".to_string()],
            default_root: "App".to_string(),
            max_concurrent_reads: 32,
        }
    }
}

/// Validated configuration for a component tree analysis
#[derive(Debug, Clone)]
pub struct ComponentTreeConfig {
    pub extensions: Vec<String>,
    pub skip: Vec<glob::Pattern>,
    pub attach_mode: AttachMode,
    pub route_tag: String,
    pub route_target_attributes: Vec<String>,
    pub render_namespaces: Vec<String>,
    /// Lowercased wrapper names
    pub structural_wrappers: Vec<String>,
    pub entry_file_patterns: Vec<Regex>,
    pub default_root: String,
    pub max_concurrent_reads: usize,
}

impl ComponentTreeConfig {
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }

    /// True for `node_modules`, `.git`, and names matching a `skip` glob
    pub fn is_skipped_name(&self, name: &str) -> bool {
        DEFAULT_SKIPPED_DIRS.contains(&name) || self.skip.iter().any(|glob| glob.matches(name))
    }

    pub fn is_route_target_attribute(&self, attr_name: &str) -> bool {
        self.route_target_attributes
            .iter()
            .any(|allowed| allowed == attr_name)
    }

    pub fn is_render_namespace(&self, name: &str) -> bool {
        self.render_namespaces.iter().any(|ns| ns == name)
    }

    /// `React.StrictMode` and `strictmode` are both structural wrappers
    pub fn is_structural_wrapper(&self, tag_name: &str) -> bool {
        let segment = crate::parse::utils::last_segment(tag_name).to_lowercase();
        self.structural_wrappers.iter().any(|w| *w == segment)
    }

    pub fn is_entry_file_path(&self, slash_path: &str) -> bool {
        self.entry_file_patterns
            .iter()
            .any(|pattern| pattern.is_match(slash_path))
    }
}

impl Default for ComponentTreeConfig {
    fn default() -> Self {
        let mut patterns = Vec::new();
        // the default pattern is a literal known to compile
        if let Ok(pattern) = Regex::new(r"(?i)(^|/)(app|main)\.") {
            patterns.push(pattern);
        }
        let json = ComponentTreeJSONConfig::default();
        Self {
            extensions: json.extensions,
            skip: vec![],
            attach_mode: json.attach_mode,
            route_tag: json.route_tag,
            route_target_attributes: json.route_target_attributes,
            render_namespaces: json.render_namespaces,
            structural_wrappers: json.structural_wrappers,
            entry_file_patterns: patterns,
            default_root: json.default_root,
            max_concurrent_reads: json.max_concurrent_reads,
        }
    }
}

impl TryFrom<ComponentTreeJSONConfig> for ComponentTreeConfig {
    type Error = ConfigError;
    fn try_from(value: ComponentTreeJSONConfig) -> Result<Self, Self::Error> {
        if value.max_concurrent_reads == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        let extensions = value
            .extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect::<Vec<_>>();
        if extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }

        let skip = value
            .skip
            .into_iter()
            .map(|pattern| {
                glob::Pattern::new(&pattern)
                    .map_err(|source| ConfigError::InvalidSkipGlob { pattern, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let entry_file_patterns = value
            .entry_file_patterns
            .into_iter()
            .map(|pattern| {
                Regex::new(&pattern)
                    .map_err(|source| ConfigError::InvalidEntryPattern { pattern, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ComponentTreeConfig {
            // raw fields that are copied from the JSON config
            extensions,
            attach_mode: value.attach_mode,
            route_tag: value.route_tag,
            route_target_attributes: value.route_target_attributes,
            render_namespaces: value.render_namespaces,
            default_root: value.default_root,
            max_concurrent_reads: value.max_concurrent_reads,
            // other fields that are processed before use
            structural_wrappers: value
                .structural_wrappers
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            skip,
            entry_file_patterns,
        })
    }
}
