use std::path::Path;

use logger::{Logger, VecLogger};
use logger_srcfile::WrapFileLogger;
use swc_ecma_visit::VisitWith;
use swc_utils_parse::{parse_source_file, ParseError};

use crate::{cfg::ComponentTreeConfig, entry::render_visitor::RootRenderVisitor};

pub mod data;
pub mod declarations_visitor;
#[cfg(test)]
mod declarations_visitor_tests;
pub mod utils;

pub use data::*;
pub use declarations_visitor::DeclarationsVisitor;

/// Parses one source file and extracts its components, usages and routes.
///
/// Warnings raised along the way are not logged directly. They are returned
/// on [FileExtraction::diagnostics] so the caller can report them in a stable
/// order.
pub fn extract_file(
    file_path: &Path,
    source_text: impl Into<String>,
    config: &ComponentTreeConfig,
) -> Result<FileExtraction, ParseError> {
    let parsed = parse_source_file(file_path, source_text)?;

    let diagnostics_sink = VecLogger::new();
    for recovered in parsed.recovered_errors.iter() {
        (&diagnostics_sink).warn(recovered);
    }

    let file_logger = WrapFileLogger::new(parsed.source_map.clone(), &diagnostics_sink);
    let mut declarations = DeclarationsVisitor::new(config, file_path, file_logger);
    parsed.module.visit_with(&mut declarations);

    let mut render_visitor = RootRenderVisitor::new(config);
    parsed.module.visit_with(&mut render_visitor);

    let DeclarationsVisitor {
        components,
        used_components,
        routes,
        ..
    } = declarations;

    Ok(FileExtraction {
        file_path: file_path.to_path_buf(),
        components,
        used_components,
        routes,
        renders_root: render_visitor.renders_root,
        diagnostics: diagnostics_sink.snapshot(),
    })
}
