//! Runtime helper: derive a component's label from the label its caller
//! passed in, e.g. `form` + `Button` → `form.Button`.

use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError};

use crate::config::{DEFAULT_ATTRIBUTE_NAME, DEFAULT_SEPARATOR};

/// Name used when a component has none.
pub const FALLBACK_NAME: &str = "Component";

/// `{ "data-testid": id }` as a single attribute pair.
pub fn test_id_attr(test_id: impl Into<String>) -> (&'static str, String) {
    (DEFAULT_ATTRIBUTE_NAME, test_id.into())
}

// -----------------------------------------------------------------------------
// Memo
// -----------------------------------------------------------------------------

/// Caches the last value and recomputes only when the key changes.
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> V {
        if let Some((cached, value)) = &self.slot {
            if *cached == key {
                return value.clone();
            }
        }
        let value = compute(&key);
        self.slot = Some((key, value.clone()));
        value
    }
}

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

/// Props that carry an optional label.
pub trait TestIdProps {
    fn test_id(&self) -> Option<&str>;
    fn set_test_id(&mut self, test_id: String);
}

pub trait Component {
    type Props: TestIdProps;
    type Output;

    fn name(&self) -> Option<&str> {
        None
    }

    fn render(&self, props: Self::Props) -> Self::Output;
}

/// A render function with an optional name.
pub struct FnComponent<P, O, F> {
    name: Option<String>,
    render: F,
    _props: PhantomData<fn(P) -> O>,
}

pub fn component<P, O, F>(name: impl Into<String>, render: F) -> FnComponent<P, O, F>
where
    F: Fn(P) -> O,
{
    FnComponent {
        name: Some(name.into()),
        render,
        _props: PhantomData,
    }
}

pub fn anonymous<P, O, F>(render: F) -> FnComponent<P, O, F>
where
    F: Fn(P) -> O,
{
    FnComponent {
        name: None,
        render,
        _props: PhantomData,
    }
}

impl<P: TestIdProps, O, F: Fn(P) -> O> Component for FnComponent<P, O, F> {
    type Props = P;
    type Output = O;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn render(&self, props: P) -> O {
        (self.render)(props)
    }
}

// -----------------------------------------------------------------------------
// Wrapper
// -----------------------------------------------------------------------------

pub struct WithTestId<C> {
    inner: C,
    separator: String,
    label: Mutex<Memo<(Option<String>, String), String>>,
}

pub fn with_test_id<C: Component>(inner: C) -> WithTestId<C> {
    WithTestId::with_separator(inner, DEFAULT_SEPARATOR)
}

impl<C: Component> WithTestId<C> {
    pub fn with_separator(inner: C, separator: impl Into<String>) -> Self {
        Self {
            inner,
            separator: separator.into(),
            label: Mutex::new(Memo::new()),
        }
    }

    /// Label for an incoming `test_id`, memoized on it and the inner name.
    pub fn label_for(&self, test_id: Option<&str>) -> String {
        let name = self.inner.name().unwrap_or(FALLBACK_NAME).to_string();
        let key = (test_id.map(str::to_string), name);
        let mut memo = self.label.lock().unwrap_or_else(PoisonError::into_inner);
        memo.get_or_compute(key, |(parent, name)| match parent {
            Some(parent) if !parent.is_empty() => format!("{parent}{}{name}", self.separator),
            _ => name.clone(),
        })
    }
}

impl<C: Component> Component for WithTestId<C> {
    type Props = C::Props;
    type Output = C::Output;

    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn render(&self, mut props: C::Props) -> C::Output {
        let label = self.label_for(props.test_id());
        props.set_test_id(label);
        self.inner.render(props)
    }
}
