use std::{borrow::Borrow, fmt::Display};

use logger::Logger;
use swc_common::{SourceMap, Span};

/// A logger that can attribute messages to a span of a parsed source file.
pub trait SrcFileLogger: Logger {
    fn src_warn(&self, location: &Span, message: impl Display);
    fn src_error(&self, location: &Span, message: impl Display);
}

/// Renders `span` as `file:line:col`, using the source map the span came from.
pub fn format_location(source_map: &SourceMap, location: &Span) -> String {
    let loc = source_map.lookup_char_pos(location.lo);
    format!("{}:{}:{}", loc.file.name, loc.line, loc.col_display)
}

/// Wraps an inner logger with the source map of a single parsed file, so
/// visitors can report problems at the offending node.
#[derive(Clone)]
pub struct WrapFileLogger<TSrcMap, TLogger> {
    source_map: TSrcMap,
    inner_logger: TLogger,
}
impl<TSourceMap: Borrow<SourceMap> + Clone, TLogger: Logger> WrapFileLogger<TSourceMap, TLogger> {
    pub fn new(source_map: TSourceMap, inner_logger: TLogger) -> Self {
        Self {
            source_map,
            inner_logger,
        }
    }

    pub fn source_map(&self) -> &SourceMap {
        self.source_map.borrow()
    }
}
impl<TSourceMap: Borrow<SourceMap> + Clone, TLogger: Logger> Logger
    for WrapFileLogger<TSourceMap, TLogger>
{
    fn log(&self, message: impl Display) {
        self.inner_logger.log(message);
    }
    fn error(&self, message: impl Display) {
        self.inner_logger.error(message);
    }
    fn warn(&self, message: impl Display) {
        self.inner_logger.warn(message);
    }
}
impl<TSourceMap: Borrow<SourceMap> + Clone, TLogger: Logger> SrcFileLogger
    for WrapFileLogger<TSourceMap, TLogger>
{
    fn src_warn(&self, location: &Span, message: impl Display) {
        self.warn(format!(
            "{} :: {}",
            format_location(self.source_map(), location),
            message
        ));
    }
    fn src_error(&self, location: &Span, message: impl Display) {
        self.error(format!(
            "{} :: {}",
            format_location(self.source_map(), location),
            message
        ));
    }
}

#[cfg(test)]
mod test {
    use logger::VecLogger;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Span};

    use super::{SrcFileLogger, WrapFileLogger};

    #[test]
    fn test_src_warn_reports_line_and_column() {
        let cm = Lrc::<SourceMap>::default();
        let fm = cm.new_source_file(
            Lrc::new(FileName::Real(PathBuf::from("Nav.tsx"))),
            "const a = 1;\nconst Nav = () => <Route />;\n".to_string(),
        );
        // points at the `<` of `<Route />`
        let lo = fm.start_pos + BytePos(31);
        let span = Span {
            lo,
            hi: lo + BytePos(9),
            ..Default::default()
        };

        let sink = VecLogger::new();
        let logger = WrapFileLogger::new(cm, &sink);
        logger.src_warn(&span, "routing element has no target");

        assert_eq!(
            sink.get_logs().unwrap(),
            vec!["WARN: Nav.tsx:2:18 :: routing element has no target".to_string()]
        );
    }
}
