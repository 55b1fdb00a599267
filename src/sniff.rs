use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use swc_core::ecma::parser::{EsSyntax, Syntax, TsSyntax};

static OPENING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[A-Za-z]").unwrap());
static REACT_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import[^;]*from\s+['"]react['"]"#).unwrap());
static COMPONENT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:default\s+)?function\s+\w+|const\s+[A-Z]\w*\s*=\s*\(").unwrap()
});

fn extension(file_path: &str) -> Option<String> {
    Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Cheap check that a file may contain markup worth parsing.
pub fn looks_like_markup(source: &str, file_path: &str) -> bool {
    matches!(extension(file_path).as_deref(), Some("jsx" | "tsx"))
        || OPENING_TAG.is_match(source)
        || REACT_IMPORT.is_match(source)
        || COMPONENT_DECL.is_match(source)
}

/// Parser dialect for `file_path`: plain TypeScript for `.ts`, ECMAScript
/// with JSX for JavaScript extensions, TSX for everything else.
pub fn syntax_for(file_path: &str) -> Syntax {
    match extension(file_path).as_deref() {
        Some("ts" | "mts" | "cts") => Syntax::Typescript(TsSyntax {
            tsx: false,
            dts: file_path.ends_with(".d.ts"),
            ..Default::default()
        }),
        Some("js" | "jsx" | "mjs" | "cjs") => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
        _ => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
    }
}
