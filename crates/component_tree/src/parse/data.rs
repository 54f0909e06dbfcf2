use std::path::{Path, PathBuf};

/// Path used for routing elements whose path is not a string literal
pub const DYNAMIC_ROUTE_PATH: &str = "dynamic";

/// A component declared in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDeclaration {
    pub name: String,
    pub defined_in: PathBuf,
    /// Keys of the destructured props parameter, in source order
    pub props: Vec<String>,
}

/// `<Route path="/x" component={Page} />` generates `{ path: "/x", component: "Page" }`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDeclaration {
    pub path: String,
    pub component: String,
}

impl RouteDeclaration {
    pub fn new(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
        }
    }
}

/// Everything the extractor learned from a single file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileExtraction {
    pub file_path: PathBuf,
    // `function Header() {}` and `const Body = () => ...` generate `["Header", "Body"]`
    pub components: Vec<ComponentDeclaration>,
    // capitalized markup tags, deduplicated, in order of first appearance
    pub used_components: Vec<String>,
    pub routes: Vec<RouteDeclaration>,
    // true if the file mounts the application, e.g. `ReactDOM.createRoot(el)`
    pub renders_root: bool,
    // located warnings raised while extracting, replayed by the caller
    pub diagnostics: Vec<String>,
}

impl FileExtraction {
    /// The result recorded for a file that could not be read or parsed
    pub fn empty(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
}
