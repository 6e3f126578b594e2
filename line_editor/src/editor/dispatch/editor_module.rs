// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{BUILTINS, Binding, BuiltinError, SafeBindingTables, ScriptValue, find_builtin,
            quote};
use crate::{BindingKey, Mode, lock_or_panic};
use std::str::FromStr;

/// The editor as seen from a scripting environment: the builtin names, plus one
/// [`BindingMap`] per mode.
#[derive(Debug, Clone)]
pub struct EditorModule {
    tables: SafeBindingTables,
}

impl EditorModule {
    #[must_use]
    pub fn new(tables: SafeBindingTables) -> Self { Self { tables } }

    #[must_use]
    pub fn binding(&self, mode: Mode) -> BindingMap {
        BindingMap {
            tables: self.tables.clone(),
            mode,
        }
    }

    /// The map for a mode name such as `insert` or `history_listing`.
    ///
    /// # Errors
    ///
    /// [`BuiltinError::UnknownBindingTable`] if there is no such mode.
    pub fn binding_by_name(&self, name: &str) -> Result<BindingMap, BuiltinError> {
        let mode = Mode::from_str(name)
            .map_err(|_| BuiltinError::UnknownBindingTable(name.to_string()))?;
        Ok(self.binding(mode))
    }

    pub fn builtin_names(&self) -> impl Iterator<Item = &'static str> {
        BUILTINS.iter().map(|it| it.name)
    }
}

/// A mode's [`crate::BindingTable`] as a map from key descriptor strings to builtin names
/// or callables. Writes are visible to every editor right away.
#[derive(Debug, Clone)]
pub struct BindingMap {
    tables: SafeBindingTables,
    mode: Mode,
}

impl BindingMap {
    #[must_use]
    pub fn mode(&self) -> Mode { self.mode }

    /// # Errors
    ///
    /// - [`BuiltinError::KeyMustBeString`] or [`BuiltinError::MalformedKey`] for a bad
    ///   key.
    /// - [`BuiltinError::NoSuchKey`] if the key is not bound.
    pub fn get(&self, key: &ScriptValue) -> Result<ScriptValue, BuiltinError> {
        let key = key_index(key)?;
        let tables = lock_or_panic!(self.tables);
        tables
            .table(self.mode)
            .and_then(|table| table.get(&key))
            .map(Binding::to_script_value)
            .ok_or_else(|| BuiltinError::NoSuchKey(key.to_string()))
    }

    /// Bind `key` to a builtin name or a callable. The table is left untouched when
    /// anything is wrong.
    ///
    /// # Errors
    ///
    /// - [`BuiltinError::KeyMustBeString`] or [`BuiltinError::MalformedKey`] for a bad
    ///   key.
    /// - [`BuiltinError::UnknownBuiltin`] for a string that names no builtin.
    /// - [`BuiltinError::BadBindingValue`] for any other kind of value.
    pub fn set(&self, key: &ScriptValue, value: ScriptValue) -> Result<(), BuiltinError> {
        let key = key_index(key)?;
        let binding = match value {
            ScriptValue::Str(name) => find_builtin(&name)
                .map(Binding::Builtin)
                .ok_or_else(|| BuiltinError::UnknownBuiltin(quote(&name)))?,
            ScriptValue::Callable(callable) => Binding::User(callable),
            other => return Err(BuiltinError::BadBindingValue(other.kind())),
        };
        tracing::debug!(message = "rebinding key", mode = %self.mode, key = %key);
        lock_or_panic!(self.tables)
            .table_mut(self.mode)
            .set(key, binding);
        Ok(())
    }

    /// Bound key descriptors, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let tables = lock_or_panic!(self.tables);
        tables
            .table(self.mode)
            .map(|table| table.keys().iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    /// Map literal syntax, eg: `[&Enter=return-line &Default=default-history]`.
    #[must_use]
    pub fn repr(&self) -> String {
        let tables = lock_or_panic!(self.tables);
        let Some(table) = tables.table(self.mode) else {
            return "[&]".to_string();
        };
        let pairs: Vec<_> = table
            .keys()
            .iter()
            .filter_map(|key| {
                table.get(key).map(|binding| {
                    format!(
                        "&{}={}",
                        quote(&key.to_string()),
                        binding.to_script_value().repr()
                    )
                })
            })
            .collect();
        if pairs.is_empty() {
            "[&]".to_string()
        } else {
            format!("[{}]", pairs.join(" "))
        }
    }
}

fn key_index(key: &ScriptValue) -> Result<BindingKey, BuiltinError> {
    match key {
        ScriptValue::Str(descriptor) => Ok(BindingKey::from_str(descriptor)?),
        _ => Err(BuiltinError::KeyMustBeString),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindingTables, KeyDescriptorError};

    fn module() -> EditorModule { EditorModule::new(BindingTables::with_defaults().into_shared()) }

    #[test]
    fn test_set_then_get_user_callable() {
        let insert = module().binding(Mode::Insert);
        let callable = ScriptValue::callable("my-fn", |_| Ok(()));

        insert.set(&"Ctrl-A".into(), callable.clone()).unwrap();

        assert_eq!(insert.get(&"Ctrl-A".into()).unwrap(), callable);
        assert_eq!(insert.get(&"C-a".into()).unwrap(), callable);
    }

    #[test]
    fn test_unknown_builtin_leaves_binding_unchanged() {
        let insert = module().binding(Mode::Insert);

        let result = insert.set(&"Ctrl-A".into(), "no-such-builtin".into());

        assert_eq!(
            result,
            Err(BuiltinError::UnknownBuiltin("no-such-builtin".into()))
        );
        assert_eq!(insert.get(&"Ctrl-A".into()).unwrap(), "move-dot-sol".into());
    }

    #[test]
    fn test_bad_keys_and_values() {
        let insert = module().binding(Mode::Insert);

        assert_eq!(
            insert.set(&ScriptValue::Num(1.0), "redraw".into()),
            Err(BuiltinError::KeyMustBeString)
        );
        assert_eq!(
            insert.set(&"Hyper-x".into(), "redraw".into()),
            Err(BuiltinError::MalformedKey(KeyDescriptorError::BadModifier(
                "Hyper".into()
            )))
        );
        assert_eq!(
            insert.set(&"x".into(), ScriptValue::Bool(true)),
            Err(BuiltinError::BadBindingValue("bool"))
        );
        assert_eq!(
            insert.get(&"F9".into()),
            Err(BuiltinError::NoSuchKey("F9".into()))
        );
    }

    #[test]
    fn test_rebinding_is_shared() {
        let module = module();
        let from_module = module.binding_by_name("command").unwrap();
        from_module.set(&"q".into(), "return-eof".into()).unwrap();

        let again = module.binding(Mode::Command);
        assert_eq!(again.get(&"q".into()).unwrap(), "return-eof".into());
        assert!(again.keys().contains(&"q".to_string()));
        assert!(module.binding_by_name("visual").is_err());
    }

    #[test]
    fn test_repr() {
        let module = module();
        let history = module.binding(Mode::History);
        assert_eq!(
            history.repr(),
            "[&Default=default-history &Down=select-history-next &Up=select-history-prev]"
        );
        assert!(module.builtin_names().any(|it| it == "accept-histlist"));
    }
}
