use crate::{config::Config, eligibility::is_path_excluded, scope::ScopeStack};

/// Literal segment standing for one repeated item.
pub const ITEM_SEGMENT: &str = "item";

/// Segments collected for one element before they are joined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdPath {
    pub segments: Vec<String>,
    /// Produced inside an iteration callback.
    pub repeated: bool,
}

/// A finished identifier. `H` is whatever stands for the interpolated
/// expression: source text in tests and rendering, an AST node while
/// rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestId<H = String> {
    Static(String),
    Dynamic { prefix: String, hole: H },
}

impl IdPath {
    /// Join the segments. A repeated path becomes dynamic only when there is
    /// something in scope to interpolate; otherwise it stays static.
    pub fn finish<H>(self, separator: &str, hole: Option<H>) -> Option<TestId<H>> {
        if self.segments.is_empty() {
            return None;
        }
        let joined = self.segments.join(separator);
        match hole {
            Some(hole) if self.repeated => Some(TestId::Dynamic {
                prefix: format!("{joined}{separator}"),
                hole,
            }),
            _ => Some(TestId::Static(joined)),
        }
    }
}

impl<H> TestId<H> {
    pub fn map_hole<T>(self, f: impl FnOnce(H) -> T) -> TestId<T> {
        match self {
            TestId::Static(s) => TestId::Static(s),
            TestId::Dynamic { prefix, hole } => TestId::Dynamic { prefix, hole: f(hole) },
        }
    }
}

impl TestId<String> {
    /// Attribute value as it appears in source: a quoted literal, or an
    /// expression container holding a template literal.
    pub fn to_attr_value(&self) -> String {
        match self {
            TestId::Static(s) if needs_expression_literal(s) => {
                // JSON strings are valid JS string literals
                let quoted = serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"));
                format!("{{{quoted}}}")
            }
            TestId::Static(s) => format!("\"{s}\""),
            TestId::Dynamic { prefix, hole } => {
                format!("{{`{}${{{hole}}}`}}", escape_template(prefix))
            }
        }
    }
}

// JSX string attributes have no escapes and decode HTML entities.
fn needs_expression_literal(s: &str) -> bool {
    s.contains(['"', '&', '\n', '\r', '{', '}'])
}

pub fn escape_template(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the path for `element` at the current position of `scope`.
pub fn synthesize(element: &str, scope: &ScopeStack, config: &Config) -> IdPath {
    let mut path = IdPath::default();
    let owner = scope.innermost_owner();

    if config.use_hierarchy {
        path.segments.extend(scope.owners().map(str::to_string));
        if let Some(parent) = scope.parent_element() {
            if !is_path_excluded(parent) && Some(parent) != owner {
                path.segments.push(parent.to_string());
            }
        }
    }

    if let Some(frame) = scope.active_loop() {
        if let Some(collection) = &frame.collection {
            path.segments.push(collection.clone());
        }
        path.segments.push(ITEM_SEGMENT.to_string());
        path.repeated = true;
    } else if config.include_element && !is_path_excluded(element) && Some(element) != owner {
        path.segments.push(element.to_string());
    }

    path
}
