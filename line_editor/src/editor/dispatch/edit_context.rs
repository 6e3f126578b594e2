// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{BuiltinError, ScriptValue, find_builtin};
use crate::{Completer, EditorState, HistoryStore};

/// What a builtin or a [`crate::UserCallable`] gets to work with: the state of the read
/// in progress and the collaborators some builtins need.
pub struct EditContext<'a> {
    pub state: &'a mut EditorState,
    pub history: &'a dyn HistoryStore,
    pub completer: &'a dyn Completer,
}

impl std::fmt::Debug for EditContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditContext")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl EditContext<'_> {
    /// Run the builtin called `name`.
    ///
    /// # Errors
    ///
    /// - [`BuiltinError::UnknownBuiltin`] if there is no such builtin.
    /// - [`BuiltinError::Arity`] if `args` is not empty.
    /// - [`BuiltinError::EditorInactive`] if no line is being read.
    pub fn call_builtin(
        &mut self,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<(), BuiltinError> {
        let builtin = find_builtin(name)
            .ok_or_else(|| BuiltinError::UnknownBuiltin(name.to_string()))?;
        if !args.is_empty() {
            return Err(BuiltinError::Arity(args.len()));
        }
        if !self.state.active {
            return Err(BuiltinError::EditorInactive);
        }
        (builtin.imp)(self);
        Ok(())
    }
}
