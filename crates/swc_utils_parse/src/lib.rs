use std::path::{Path, PathBuf};

use logger_srcfile::format_location;
use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::sync::Lrc;
use swc_common::{FileName, SourceFile, SourceMap, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, StringInput, Syntax};
use swc_ecma_parser::{Capturing, Parser, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

#[derive(thiserror::Error, Debug)]
#[error("{location} :: {message}")]
pub struct ParseError {
    /// `file:line:col` of the first fatal syntax error
    pub location: String,
    pub message: String,
}

/// A successfully parsed module, along with the source map its spans refer to
pub struct ParsedSource {
    pub source_map: Lrc<SourceMap>,
    pub module: Module,
    /// Errors the parser recovered from. The module is still usable.
    pub recovered_errors: Vec<ParseError>,
}

/// Picks the syntax for a file from its extension.
///
/// `.ts` files are parsed without markup so that `<T>expr` assertions are
/// accepted. Everything else is parsed as TypeScript with markup enabled,
/// which is a superset of plain JavaScript with markup.
pub fn syntax_for_path(path: &Path) -> Syntax {
    let is_plain_ts = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ts"));
    Syntax::Typescript(TsSyntax {
        tsx: !is_plain_ts,
        decorators: true,
        ..Default::default()
    })
}

pub fn create_lexer<'a>(fm: &'a SourceFile, comments: Option<&'a dyn Comments>) -> Lexer<'a> {
    let path = match &*fm.name {
        FileName::Real(path) => path.clone(),
        other => PathBuf::from(other.to_string()),
    };
    Lexer::new(
        syntax_for_path(&path),
        Default::default(),
        StringInput::from(fm),
        comments,
    )
}

pub fn create_parser<'a>(
    fm: &'a Lrc<SourceFile>,
    comments: Option<&'a dyn Comments>,
) -> Parser<Capturing<Lexer<'a>>> {
    let lexer = create_lexer(fm, comments);
    let capturing = Capturing::new(lexer);

    Parser::new_from(capturing)
}

fn to_parse_error(source_map: &SourceMap, err: swc_ecma_parser::error::Error) -> ParseError {
    ParseError {
        location: format_location(source_map, &err.span()),
        message: err.kind().msg().to_string(),
    }
}

/// Parses one source file.
///
/// A fatal syntax error is returned as `Err`; errors the parser was able to
/// recover from are kept on the returned [ParsedSource].
pub fn parse_source_file(path: &Path, body: impl Into<String>) -> Result<ParsedSource, ParseError> {
    let cm = Lrc::<SourceMap>::default();
    let fname: Lrc<FileName> = Lrc::new(FileName::Real(path.to_path_buf()));
    let fm = cm.new_source_file(fname, body.into());

    let comments = SingleThreadedComments::default();
    let mut parser = create_parser(&fm, Some(&comments));
    let parsed = parser.parse_module();
    let recovered_errors = parser
        .take_errors()
        .into_iter()
        .map(|err| to_parse_error(&cm, err))
        .collect::<Vec<_>>();

    match parsed {
        Ok(module) => Ok(ParsedSource {
            source_map: cm,
            module,
            recovered_errors,
        }),
        Err(err) => Err(to_parse_error(&cm, err)),
    }
}

/// Parses `src` as if it were a `.tsx` file and runs `visitor` over it.
pub fn parse_and_visit(src: &str, visitor: &mut impl Visit) -> Result<(), ParseError> {
    let parsed = parse_source_file(Path::new("test.tsx"), src)?;
    parsed.module.visit_with(visitor);
    Ok(())
}
