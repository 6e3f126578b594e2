// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::EditContext;
use std::{fmt::{Debug, Formatter},
          sync::Arc};

/// A function supplied by the embedding program, bound to a key. It runs synchronously
/// on the read loop and must not wait for input.
pub trait UserCallable: Send + Sync + Debug {
    /// # Errors
    ///
    /// Any error is shown to the user as a notification, the read goes on.
    fn call(&self, ctx: &mut EditContext<'_>) -> miette::Result<()>;

    fn repr(&self) -> String;
}

pub type SafeUserCallable = Arc<dyn UserCallable>;

/// [`UserCallable`] backed by a closure.
pub struct FnCallable<F> {
    name: String,
    f: F,
}

impl<F> FnCallable<F>
where
    F: Fn(&mut EditContext<'_>) -> miette::Result<()> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Debug for FnCallable<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnCallable({})", self.name)
    }
}

impl<F> UserCallable for FnCallable<F>
where
    F: Fn(&mut EditContext<'_>) -> miette::Result<()> + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut EditContext<'_>) -> miette::Result<()> { (self.f)(ctx) }

    fn repr(&self) -> String { format!("<fn {}>", self.name) }
}

/// The values the scripting surface passes in and out of binding tables and builtins.
#[derive(Clone, Debug)]
pub enum ScriptValue {
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<ScriptValue>),
    Callable(SafeUserCallable),
}

impl ScriptValue {
    /// Wrap a closure as a [`ScriptValue::Callable`].
    pub fn callable<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut EditContext<'_>) -> miette::Result<()> + Send + Sync + 'static,
    {
        ScriptValue::Callable(Arc::new(FnCallable::new(name, f)))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ScriptValue::Str(_) => "string",
            ScriptValue::Num(_) => "number",
            ScriptValue::Bool(_) => "bool",
            ScriptValue::List(_) => "list",
            ScriptValue::Callable(_) => "fn",
        }
    }

    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            ScriptValue::Str(it) => quote(it),
            ScriptValue::Num(it) => it.to_string(),
            ScriptValue::Bool(true) => "$true".to_string(),
            ScriptValue::Bool(false) => "$false".to_string(),
            ScriptValue::List(items) => {
                let items: Vec<_> = items.iter().map(ScriptValue::repr).collect();
                format!("[{}]", items.join(" "))
            }
            ScriptValue::Callable(it) => it.repr(),
        }
    }
}

/// Barewords stay as they are, anything else is single quoted.
#[must_use]
pub fn quote(text: &str) -> String {
    let is_bareword = !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_alphanumeric() || "-_./:~+@%,".contains(ch));
    if is_bareword {
        text.to_string()
    } else {
        format!("'{}'", text.replace('\'', "''"))
    }
}

/// Callables are equal when they are the same object.
impl PartialEq for ScriptValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScriptValue::Str(a), ScriptValue::Str(b)) => a == b,
            (ScriptValue::Num(a), ScriptValue::Num(b)) => a == b,
            (ScriptValue::Bool(a), ScriptValue::Bool(b)) => a == b,
            (ScriptValue::List(a), ScriptValue::List(b)) => a == b,
            (ScriptValue::Callable(a), ScriptValue::Callable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for ScriptValue {
    fn from(it: &str) -> Self { ScriptValue::Str(it.to_string()) }
}

impl From<String> for ScriptValue {
    fn from(it: String) -> Self { ScriptValue::Str(it) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repr() {
        assert_eq!(ScriptValue::from("move-dot-left").repr(), "move-dot-left");
        assert_eq!(ScriptValue::from("it's").repr(), "'it''s'");
        assert_eq!(ScriptValue::from("").repr(), "''");
        assert_eq!(
            ScriptValue::List(vec![ScriptValue::Num(1.5), ScriptValue::Bool(true)]).repr(),
            "[1.5 $true]"
        );
        assert_eq!(ScriptValue::callable("greet", |_| Ok(())).repr(), "<fn greet>");
    }

    #[test]
    fn test_callables_compare_by_identity() {
        let it = ScriptValue::callable("f", |_| Ok(()));
        let same = it.clone();
        let other = ScriptValue::callable("f", |_| Ok(()));
        assert_eq!(it, same);
        assert_ne!(it, other);
        assert_eq!(it.kind(), "fn");
    }
}
