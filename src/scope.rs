//! Lexical context for the rewriter: enclosing component owners, active
//! iteration callbacks and the element chain inside the innermost owner.
//!
//! The stacks live inside one [`ScopeStack`] that belongs to a single
//! traversal, so nothing here is shared between files.

use swc_core::{
    common::{BytePos, Span, Spanned},
    ecma::ast::*,
};

use crate::eligibility::is_component_name;

/// Iteration methods whose callback is treated as a repetition context.
pub const REPETITION_METHODS: [&str; 5] = ["map", "forEach", "filter", "reduce", "flatMap"];

// -----------------------------------------------------------------------------
// Stack entries
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub name: String,
    /// Element depth when the owner was entered; elements below it belong to
    /// an enclosing owner and are not parents here.
    element_base: usize,
}

/// An in-scope expression that can fill the interpolation hole of a dynamic
/// identifier.
#[derive(Debug, Clone)]
pub struct Hole {
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct LoopFrame {
    pub collection: Option<String>,
    pub index: Option<Hole>,
}

impl LoopFrame {
    pub fn new(collection: Option<&str>) -> Self {
        Self {
            collection: collection.map(str::to_string),
            index: None,
        }
    }
}

// -----------------------------------------------------------------------------
// Scope stack
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScopeStack {
    owners: Vec<Owner>,
    loops: Vec<LoopFrame>,
    // `None` for elements whose name is not a plain identifier.
    elements: Vec<Option<String>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_owner(&mut self, name: impl Into<String>) {
        self.owners.push(Owner {
            name: name.into(),
            element_base: self.elements.len(),
        });
    }

    pub fn exit_owner(&mut self) {
        self.owners.pop();
    }

    pub fn enter_loop(&mut self, frame: LoopFrame) {
        self.loops.push(frame);
    }

    pub fn exit_loop(&mut self) {
        self.loops.pop();
    }

    pub fn enter_element(&mut self, name: Option<String>) {
        self.elements.push(name);
    }

    pub fn exit_element(&mut self) {
        self.elements.pop();
    }

    /// Owner names, outermost first.
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.owners.iter().map(|o| o.name.as_str())
    }

    pub fn innermost_owner(&self) -> Option<&str> {
        self.owners.last().map(|o| o.name.as_str())
    }

    pub fn active_loop(&self) -> Option<&LoopFrame> {
        self.loops.last()
    }

    /// Nearest enclosing element inside the innermost owner.
    pub fn parent_element(&self) -> Option<&str> {
        let base = self.owners.last().map_or(0, |o| o.element_base);
        if self.elements.len() <= base {
            return None;
        }
        self.elements.last().and_then(|e| e.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty() && self.loops.is_empty() && self.elements.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Owner name resolution
// -----------------------------------------------------------------------------

/// Names that open an owner: they must look like a component.
pub fn owner_name(name: Option<String>) -> Option<String> {
    name.filter(|n| is_component_name(n))
}

/// Span of the function an initializer defines, looking through parentheses,
/// TypeScript wrappers and wrapper calls such as `memo(...)`/`forwardRef(...)`.
/// Iteration calls are not wrappers.
pub fn function_target(expr: &Expr) -> Option<Span> {
    match expr {
        Expr::Arrow(a) => Some(a.span),
        Expr::Fn(f) => Some(f.function.span),
        Expr::Paren(p) => function_target(&p.expr),
        Expr::TsAs(e) => function_target(&e.expr),
        Expr::TsSatisfies(e) => function_target(&e.expr),
        Expr::TsNonNull(e) => function_target(&e.expr),
        Expr::TsTypeAssertion(e) => function_target(&e.expr),
        Expr::Call(c) if repetition_method(c).is_none() => c
            .args
            .iter()
            .filter(|a| a.spread.is_none())
            .find_map(|a| function_target(&a.expr)),
        _ => None,
    }
}

pub fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(i) => Some(i.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string()),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Repetition detection
// -----------------------------------------------------------------------------

fn repetition_method(call: &CallExpr) -> Option<(&Expr, &'static str)> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    repetition_callee(callee)
}

/// Receiver and method name of `recv.map`, `recv?.map` and friends.
fn repetition_callee(callee: &Expr) -> Option<(&Expr, &'static str)> {
    let member = match callee {
        Expr::Member(m) => m,
        Expr::OptChain(chain) => match &*chain.base {
            OptChainBase::Member(m) => m,
            OptChainBase::Call(_) => return None,
        },
        _ => return None,
    };
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };
    let method = prop.sym.as_ref();
    REPETITION_METHODS
        .iter()
        .find(|&&name| name == method)
        .map(|&name| (&*member.obj, name))
}

fn collection_name(receiver: &Expr) -> Option<String> {
    match receiver {
        Expr::Ident(i) => Some(i.sym.to_string()),
        Expr::Member(m) => member_name(m),
        Expr::OptChain(chain) => match &*chain.base {
            OptChainBase::Member(m) => member_name(m),
            OptChainBase::Call(_) => None,
        },
        Expr::Paren(p) => collection_name(&p.expr),
        _ => None,
    }
}

fn member_name(m: &MemberExpr) -> Option<String> {
    match &m.prop {
        MemberProp::Ident(p) => Some(p.sym.to_string()),
        _ => None,
    }
}

fn param_hole(pat: &Pat) -> Option<Hole> {
    match pat {
        // An annotated param's span also covers `: Type`, and `i?: number`
        // binds plain `i`.
        Pat::Ident(b) => Some(Hole {
            expr: Box::new(Expr::Ident(Ident {
                optional: false,
                ..b.id.clone()
            })),
            span: Span::new(b.id.span.lo, b.id.span.lo + BytePos(b.id.sym.len() as u32)),
        }),
        _ => None,
    }
}

/// Loop context opened by `call`, when it is an iteration call whose first
/// argument is a callback taking at least one parameter.
pub fn repetition_frame(call: &CallExpr) -> Option<LoopFrame> {
    let (receiver, method) = repetition_method(call)?;
    frame_for(receiver, method, &call.args)
}

/// Same as [`repetition_frame`] for the call link of an optional chain,
/// e.g. `items?.map(cb)`.
pub fn opt_repetition_frame(call: &OptCall) -> Option<LoopFrame> {
    let (receiver, method) = repetition_callee(&call.callee)?;
    frame_for(receiver, method, &call.args)
}

fn frame_for(receiver: &Expr, method: &str, args: &[ExprOrSpread]) -> Option<LoopFrame> {
    let callback = args.first().filter(|a| a.spread.is_none())?;
    // reduce(acc, item, index)
    let index_position = if method == "reduce" { 2 } else { 1 };

    let params: Vec<&Pat> = match &*callback.expr {
        Expr::Arrow(a) => a.params.iter().collect(),
        Expr::Fn(f) => f.function.params.iter().map(|p| &p.pat).collect(),
        _ => return None,
    };
    if params.is_empty() {
        return None;
    }

    Some(LoopFrame {
        collection: collection_name(receiver),
        index: params.get(index_position).and_then(|p| param_hole(p)),
    })
}

// -----------------------------------------------------------------------------
// Key fallback
// -----------------------------------------------------------------------------

fn is_static_member_chain(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) => true,
        Expr::Member(m) => matches!(m.prop, MemberProp::Ident(_)) && is_static_member_chain(&m.obj),
        _ => false,
    }
}

/// `key={expr}` on the element itself, when `expr` is an identifier or a
/// plain member chain such as `item.id`.
pub fn key_hole(attrs: &[JSXAttrOrSpread]) -> Option<Hole> {
    attrs.iter().find_map(|attr| {
        let JSXAttrOrSpread::JSXAttr(attr) = attr else {
            return None;
        };
        let JSXAttrName::Ident(name) = &attr.name else {
            return None;
        };
        if name.sym.as_ref() != "key" {
            return None;
        }
        let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value else {
            return None;
        };
        let JSXExpr::Expr(expr) = &container.expr else {
            return None;
        };
        is_static_member_chain(expr).then(|| Hole {
            expr: expr.clone(),
            span: expr.span(),
        })
    })
}
