use swc_core::{
    common::{BytePos, Span, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{
    config::Config,
    eligibility::is_eligible,
    error::TransformError,
    scope::{self, Hole, LoopFrame, ScopeStack},
    synth::{escape_template, synthesize, TestId},
};

// -----------------------------------------------------------------------------
// Edits
// -----------------------------------------------------------------------------

/// Text-level counterpart of one attribute change, applied by [`splice`].
#[derive(Debug, Clone)]
pub enum Edit {
    /// Append a new attribute to the opening tag spanning `opening`.
    Insert { opening: Span, id: TestId<Span> },
    /// Overwrite the attribute spanning `attr`.
    Replace { attr: Span, id: TestId<Span> },
}

impl Edit {
    fn anchor(&self) -> BytePos {
        match self {
            Edit::Insert { opening, .. } => opening.hi,
            Edit::Replace { attr, .. } => attr.lo,
        }
    }
}

// -----------------------------------------------------------------------------
// Transform state
// -----------------------------------------------------------------------------

/// Single-pass visitor: tracks owners/loops/elements and tags every eligible
/// element. The AST is updated in place and each change is also recorded as an
/// [`Edit`] so callers holding the original text can splice instead of
/// re-printing.
pub struct TestIdTransform<'a> {
    config: &'a Config,
    scope: ScopeStack,
    // Function that the enclosing declarator/property/assignment names.
    pending_owner: Option<(Span, String)>,
    edits: Vec<Edit>,
}

impl<'a> TestIdTransform<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            scope: ScopeStack::new(),
            pending_owner: None,
            edits: vec![],
        }
    }

    pub fn into_edits(self) -> Vec<Edit> {
        self.edits
    }

    // ---------- owner helpers ----------

    fn with_owner(&mut self, name: Option<String>, f: impl FnOnce(&mut Self)) {
        match scope::owner_name(name) {
            Some(name) => {
                self.scope.enter_owner(name);
                f(self);
                self.scope.exit_owner();
            }
            None => f(self),
        }
    }

    /// Remember that the function at `target` is called `name` while `f`
    /// visits the initializer.
    fn with_pending(&mut self, named: Option<(Span, String)>, f: impl FnOnce(&mut Self)) {
        let prev = std::mem::replace(&mut self.pending_owner, named);
        f(self);
        self.pending_owner = prev;
    }

    fn take_pending(&mut self, span: Span) -> Option<String> {
        match &self.pending_owner {
            Some((target, _)) if *target == span && !span.is_dummy() => {
                self.pending_owner.take().map(|(_, name)| name)
            }
            _ => None,
        }
    }

    /// Only the callback runs per item; the receiver and any seed value are
    /// evaluated once.
    fn visit_callback_args(&mut self, frame: LoopFrame, args: &mut [ExprOrSpread]) {
        let mut args = args.iter_mut();
        if let Some(callback) = args.next() {
            self.scope.enter_loop(frame);
            callback.visit_mut_with(self);
            self.scope.exit_loop();
        }
        for arg in args {
            arg.visit_mut_with(self);
        }
    }

    // ---------- tagging ----------

    fn tag(&mut self, opening: &mut JSXOpeningElement, element: &str) {
        let existing = find_attr(&opening.attrs, &self.config.attribute_name);
        let names = opening.attrs.iter().filter_map(attr_name);
        if !is_eligible(element, names, self.config) {
            tracing::trace!(element, "not eligible");
            return;
        }

        let path = synthesize(element, &self.scope, self.config);
        let hole = if path.repeated {
            self.scope
                .active_loop()
                .and_then(|frame| frame.index.clone())
                .or_else(|| scope::key_hole(&opening.attrs))
        } else {
            None
        };
        let Some(id) = path.finish(&self.config.separator, hole) else {
            tracing::debug!(element, "empty identifier path, leaving element untagged");
            return;
        };

        let text_id = id.clone().map_hole(|h| h.span);
        let value = attr_value(id);
        match existing {
            Some(idx) => {
                if let JSXAttrOrSpread::JSXAttr(attr) = &mut opening.attrs[idx] {
                    self.edits.push(Edit::Replace { attr: attr.span, id: text_id });
                    attr.value = Some(value);
                }
            }
            None => {
                self.edits.push(Edit::Insert { opening: opening.span, id: text_id });
                opening.attrs.push(JSXAttrOrSpread::JSXAttr(JSXAttr {
                    span: DUMMY_SP,
                    name: JSXAttrName::Ident(IdentName::new(
                        self.config.attribute_name.clone().into(),
                        DUMMY_SP,
                    )),
                    value: Some(value),
                }));
            }
        }
    }
}

fn attr_name(attr: &JSXAttrOrSpread) -> Option<&str> {
    match attr {
        JSXAttrOrSpread::JSXAttr(JSXAttr {
            name: JSXAttrName::Ident(ident),
            ..
        }) => Some(ident.sym.as_ref()),
        _ => None,
    }
}

fn find_attr(attrs: &[JSXAttrOrSpread], key: &str) -> Option<usize> {
    attrs.iter().position(|a| attr_name(a) == Some(key))
}

fn element_name(name: &JSXElementName) -> Option<String> {
    match name {
        JSXElementName::Ident(ident) => Some(ident.sym.to_string()),
        JSXElementName::JSXMemberExpr(_) | JSXElementName::JSXNamespacedName(_) => None,
    }
}

fn attr_value(id: TestId<Hole>) -> JSXAttrValue {
    match id {
        TestId::Static(value) => JSXAttrValue::Lit(Lit::Str(Str {
            span: DUMMY_SP,
            value: value.into(),
            raw: None,
        })),
        TestId::Dynamic { prefix, hole } => JSXAttrValue::JSXExprContainer(JSXExprContainer {
            span: DUMMY_SP,
            expr: JSXExpr::Expr(Box::new(Expr::Tpl(Tpl {
                span: DUMMY_SP,
                exprs: vec![hole.expr],
                quasis: vec![
                    TplElement {
                        span: DUMMY_SP,
                        tail: false,
                        cooked: Some(prefix.clone().into()),
                        raw: escape_template(&prefix).into(),
                    },
                    TplElement {
                        span: DUMMY_SP,
                        tail: true,
                        cooked: Some("".into()),
                        raw: "".into(),
                    },
                ],
            }))),
        }),
    }
}

impl VisitMut for TestIdTransform<'_> {
    fn visit_mut_fn_decl(&mut self, n: &mut FnDecl) {
        let name = Some(n.ident.sym.to_string());
        self.with_owner(name, |this| n.visit_mut_children_with(this));
    }

    fn visit_mut_fn_expr(&mut self, n: &mut FnExpr) {
        let pending = self.take_pending(n.function.span);
        let name = n.ident.as_ref().map(|i| i.sym.to_string()).or(pending);
        self.with_owner(name, |this| n.visit_mut_children_with(this));
    }

    fn visit_mut_arrow_expr(&mut self, n: &mut ArrowExpr) {
        let name = self.take_pending(n.span);
        self.with_owner(name, |this| n.visit_mut_children_with(this));
    }

    fn visit_mut_var_declarator(&mut self, n: &mut VarDeclarator) {
        let named = match (&n.name, n.init.as_deref()) {
            (Pat::Ident(b), Some(init)) => {
                scope::function_target(init).map(|span| (span, b.id.sym.to_string()))
            }
            _ => None,
        };
        self.with_pending(named, |this| n.visit_mut_children_with(this));
    }

    fn visit_mut_key_value_prop(&mut self, n: &mut KeyValueProp) {
        let named = scope::prop_name(&n.key)
            .and_then(|name| scope::function_target(&n.value).map(|span| (span, name)));
        self.with_pending(named, |this| n.visit_mut_children_with(this));
    }

    fn visit_mut_method_prop(&mut self, n: &mut MethodProp) {
        let name = scope::prop_name(&n.key);
        self.with_owner(name, |this| n.visit_mut_children_with(this));
    }

    fn visit_mut_assign_expr(&mut self, n: &mut AssignExpr) {
        let named = match &n.left {
            AssignTarget::Simple(SimpleAssignTarget::Ident(b)) if n.op == AssignOp::Assign => {
                scope::function_target(&n.right).map(|span| (span, b.id.sym.to_string()))
            }
            _ => None,
        };
        self.with_pending(named, |this| n.visit_mut_children_with(this));
    }

    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        let Some(frame) = scope::repetition_frame(n) else {
            n.visit_mut_children_with(self);
            return;
        };

        n.callee.visit_mut_with(self);
        self.visit_callback_args(frame, &mut n.args);
    }

    fn visit_mut_opt_call(&mut self, n: &mut OptCall) {
        let Some(frame) = scope::opt_repetition_frame(n) else {
            n.visit_mut_children_with(self);
            return;
        };

        n.callee.visit_mut_with(self);
        self.visit_callback_args(frame, &mut n.args);
    }

    fn visit_mut_jsx_element(&mut self, node: &mut JSXElement) {
        let name = element_name(&node.opening.name);
        if let Some(name) = &name {
            self.tag(&mut node.opening, name);
        }

        self.scope.enter_element(name);
        node.visit_mut_children_with(self);
        self.scope.exit_element();
    }
}

// -----------------------------------------------------------------------------
// Splicing
// -----------------------------------------------------------------------------

/// Apply `edits` to `source`, whose first byte sits at `start` in the source
/// map. Edits that cannot be applied safely are dropped one by one; the rest
/// still go through.
pub fn splice(
    source: &str,
    start: BytePos,
    attribute_name: &str,
    mut edits: Vec<Edit>,
) -> Result<String, TransformError> {
    edits.sort_by_key(Edit::anchor);

    let mut out = String::with_capacity(source.len() + edits.len() * 32);
    let mut cursor = 0usize;
    for edit in &edits {
        match plan(source, start, attribute_name, edit) {
            Ok((lo, hi, text)) if lo >= cursor => {
                out.push_str(&source[cursor..lo]);
                out.push_str(&text);
                cursor = hi;
            }
            Ok(_) => tracing::debug!(?edit, "overlapping edit skipped"),
            Err(err) => tracing::debug!(%err, "element left untagged"),
        }
    }
    if cursor > source.len() {
        return Err(TransformError::Splice("edit past end of source".into()));
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

fn offset(source: &str, start: BytePos, pos: BytePos) -> Result<usize, TransformError> {
    let off = pos
        .0
        .checked_sub(start.0)
        .map(|o| o as usize)
        .ok_or_else(|| TransformError::Splice(format!("position {} before file start", pos.0)))?;
    if off > source.len() || !source.is_char_boundary(off) {
        return Err(TransformError::Splice(format!("position {off} outside source")));
    }
    Ok(off)
}

fn slice(source: &str, start: BytePos, span: Span) -> Result<&str, TransformError> {
    if span.is_dummy() {
        return Err(TransformError::Splice("synthetic span".into()));
    }
    let lo = offset(source, start, span.lo)?;
    let hi = offset(source, start, span.hi)?;
    source
        .get(lo..hi)
        .ok_or_else(|| TransformError::Splice(format!("invalid range {lo}..{hi}")))
}

/// Byte range to replace and the text to put there.
fn plan(
    source: &str,
    start: BytePos,
    attribute_name: &str,
    edit: &Edit,
) -> Result<(usize, usize, String), TransformError> {
    match edit {
        Edit::Insert { opening, id } => {
            let tag = slice(source, start, *opening)?;
            let at = offset(source, start, opening.lo)? + insertion_point(tag)?;
            let value = render(source, start, id)?;
            Ok((at, at, format!(" {attribute_name}={value}")))
        }
        Edit::Replace { attr, id } => {
            slice(source, start, *attr)?;
            let lo = offset(source, start, attr.lo)?;
            let hi = offset(source, start, attr.hi)?;
            let value = render(source, start, id)?;
            Ok((lo, hi, format!("{attribute_name}={value}")))
        }
    }
}

/// Offset inside an opening tag right after its last attribute (or name):
/// before the closing `>` or `/>`, ahead of any whitespace.
fn insertion_point(tag: &str) -> Result<usize, TransformError> {
    let body = tag
        .strip_suffix('>')
        .ok_or_else(|| TransformError::Splice("opening tag does not end with '>'".into()))?;
    let body = body.trim_end();
    let body = match body.strip_suffix('/') {
        Some(rest) => rest.trim_end(),
        None => body,
    };
    Ok(body.len())
}

fn render(source: &str, start: BytePos, id: &TestId<Span>) -> Result<String, TransformError> {
    let id = match id {
        TestId::Static(s) => TestId::Static(s.clone()),
        TestId::Dynamic { prefix, hole } => TestId::Dynamic {
            prefix: prefix.clone(),
            hole: slice(source, start, *hole)?.to_string(),
        },
    };
    Ok(id.to_attr_value())
}
