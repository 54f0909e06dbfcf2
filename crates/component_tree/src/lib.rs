mod analyzer;
pub mod cfg;
pub mod entry;
pub mod parse;
pub mod registry;
mod throttled_async_map;
pub mod tree;
pub mod walk;


pub use analyzer::{
    analyze, analyze_detailed, ComponentTreeAnalysis, ComponentTreeAnalyzer, LoadError,
};
pub use cfg::{ComponentTreeConfig, ComponentTreeJSONConfig, ConfigError};
pub use entry::{EntryResolution, EntryResolver, EntryRule, EntryStrength};
pub use registry::{ComponentRecord, ComponentRegistry};
pub use tree::{AttachMode, TreeBuilder, TreeNode};
