// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words histlist

use super::{Builtin, SafeUserCallable, ScriptValue, find_builtin};
use crate::{BindingKey, KeyPress, Mode, StdMutex};
use std::{collections::HashMap, str::FromStr, sync::Arc};

/// What a key is bound to.
#[derive(Debug, Clone)]
pub enum Binding {
    Builtin(&'static Builtin),
    User(SafeUserCallable),
}

impl Binding {
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> { find_builtin(name).map(Binding::Builtin) }

    /// Builtins are shown by name, user callables as themselves.
    #[must_use]
    pub fn to_script_value(&self) -> ScriptValue {
        match self {
            Binding::Builtin(builtin) => ScriptValue::Str(builtin.name.to_string()),
            Binding::User(callable) => ScriptValue::Callable(callable.clone()),
        }
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Binding::Builtin(a), Binding::Builtin(b)) => a == b,
            (Binding::User(a), Binding::User(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The bindings of one mode. The [`BindingKey::Default`] entry is used for keys that
/// have no entry of their own.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: HashMap<BindingKey, Binding>,
}

impl BindingTable {
    #[must_use]
    pub fn get(&self, key: &BindingKey) -> Option<&Binding> { self.entries.get(key) }

    /// Returns the binding that was replaced, if any.
    pub fn set(&mut self, key: BindingKey, binding: Binding) -> Option<Binding> {
        self.entries.insert(key, binding)
    }

    pub fn remove(&mut self, key: &BindingKey) -> Option<Binding> {
        self.entries.remove(key)
    }

    /// The binding for `key`, falling back to the default binding.
    #[must_use]
    pub fn lookup(&self, key: KeyPress) -> Option<&Binding> {
        self.entries
            .get(&BindingKey::Key(key))
            .or_else(|| self.entries.get(&BindingKey::Default))
    }

    /// Bound keys, sorted by their descriptor.
    #[must_use]
    pub fn keys(&self) -> Vec<BindingKey> {
        let mut acc: Vec<_> = self.entries.keys().copied().collect();
        acc.sort_by_key(ToString::to_string);
        acc
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Outcome of looking a key up for the current mode.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyLookup {
    /// The mode has no table at all.
    NoTable,
    /// Neither the key nor [`BindingKey::Default`] is bound.
    Unbound,
    Found(Binding),
}

/// One [`BindingTable`] per mode.
#[derive(Debug, Clone, Default)]
pub struct BindingTables {
    tables: HashMap<Mode, BindingTable>,
}

/// Shared by every editor in the process and by [`crate::EditorModule`].
pub type SafeBindingTables = Arc<StdMutex<BindingTables>>;

/// `(mode, key descriptor, builtin name)`.
pub const DEFAULT_KEY_BINDINGS: &[(Mode, &str, &str)] = &[
    // Insert.
    (Mode::Insert, "Esc", "start-command"),
    (Mode::Insert, "Backspace", "kill-rune-left"),
    (Mode::Insert, "Delete", "kill-rune-right"),
    (Mode::Insert, "Left", "move-dot-left"),
    (Mode::Insert, "Right", "move-dot-right"),
    (Mode::Insert, "Ctrl-Left", "move-dot-left-word"),
    (Mode::Insert, "Ctrl-Right", "move-dot-right-word"),
    (Mode::Insert, "Alt-b", "move-dot-left-word"),
    (Mode::Insert, "Alt-f", "move-dot-right-word"),
    (Mode::Insert, "Home", "move-dot-sol"),
    (Mode::Insert, "Ctrl-A", "move-dot-sol"),
    (Mode::Insert, "End", "move-dot-eol"),
    (Mode::Insert, "Ctrl-E", "move-dot-eol"),
    (Mode::Insert, "Ctrl-U", "kill-line-left"),
    (Mode::Insert, "Ctrl-K", "kill-line-right"),
    (Mode::Insert, "Ctrl-W", "kill-word-left"),
    (Mode::Insert, "Enter", "return-line"),
    (Mode::Insert, "Ctrl-D", "return-eof-or-kill-rune-right"),
    (Mode::Insert, "Tab", "start-completion"),
    (Mode::Insert, "Up", "start-history"),
    (Mode::Insert, "Ctrl-N", "start-navigation"),
    (Mode::Insert, "Ctrl-R", "start-history-listing"),
    (Mode::Insert, "Ctrl-L", "redraw"),
    (Mode::Insert, "Default", "default-insert"),
    // Command.
    (Mode::Command, "i", "start-insert"),
    (Mode::Command, "h", "move-dot-left"),
    (Mode::Command, "l", "move-dot-right"),
    (Mode::Command, "b", "move-dot-left-word"),
    (Mode::Command, "w", "move-dot-right-word"),
    (Mode::Command, "0", "move-dot-sol"),
    (Mode::Command, "$", "move-dot-eol"),
    (Mode::Command, "x", "kill-rune-right"),
    (Mode::Command, "D", "kill-line-right"),
    (Mode::Command, "Enter", "return-line"),
    (Mode::Command, "Default", "default-command"),
    // Completion.
    (Mode::Completion, "Up", "select-cand-prev"),
    (Mode::Completion, "Shift-Tab", "select-cand-prev"),
    (Mode::Completion, "Down", "select-cand-next"),
    (Mode::Completion, "Tab", "select-cand-next"),
    (Mode::Completion, "Enter", "accept-completion"),
    (Mode::Completion, "Esc", "cancel-completion"),
    (Mode::Completion, "Default", "default-completion"),
    // Navigation.
    (Mode::Navigation, "Up", "select-nav-prev"),
    (Mode::Navigation, "Down", "select-nav-next"),
    (Mode::Navigation, "Left", "ascend-nav"),
    (Mode::Navigation, "Right", "descend-nav"),
    (Mode::Navigation, "Tab", "navigation-insert-selected"),
    (Mode::Navigation, "Esc", "quit-navigation"),
    (Mode::Navigation, "Default", "default-navigation"),
    // History.
    (Mode::History, "Up", "select-history-prev"),
    (Mode::History, "Down", "select-history-next"),
    (Mode::History, "Default", "default-history"),
    // History listing.
    (Mode::HistoryListing, "Up", "select-histlist-prev"),
    (Mode::HistoryListing, "Down", "select-histlist-next"),
    (Mode::HistoryListing, "Enter", "accept-histlist"),
    (Mode::HistoryListing, "Esc", "cancel-histlist"),
    (Mode::HistoryListing, "Backspace", "histlist-backspace"),
    (Mode::HistoryListing, "Default", "histlist-append-filter"),
];

impl BindingTables {
    /// No tables at all.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A table for every mode, filled from [`DEFAULT_KEY_BINDINGS`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut it = Self::new();
        for (mode, descriptor, builtin_name) in DEFAULT_KEY_BINDINGS {
            let key = match BindingKey::from_str(descriptor) {
                Ok(key) => key,
                Err(err) => {
                    tracing::error!(message = "bad default key", descriptor, ?err);
                    continue;
                }
            };
            let Some(binding) = Binding::builtin(builtin_name) else {
                tracing::error!(message = "bad default builtin", builtin_name);
                continue;
            };
            it.table_mut(*mode).set(key, binding);
        }
        it
    }

    #[must_use]
    pub fn into_shared(self) -> SafeBindingTables { Arc::new(StdMutex::new(self)) }

    #[must_use]
    pub fn table(&self, mode: Mode) -> Option<&BindingTable> { self.tables.get(&mode) }

    /// The table of `mode`, created empty if missing.
    pub fn table_mut(&mut self, mode: Mode) -> &mut BindingTable {
        self.tables.entry(mode).or_default()
    }

    pub fn remove_table(&mut self, mode: Mode) -> Option<BindingTable> {
        self.tables.remove(&mode)
    }

    #[must_use]
    pub fn lookup(&self, mode: Mode, key: KeyPress) -> KeyLookup {
        let Some(table) = self.table(mode) else {
            return KeyLookup::NoTable;
        };
        match table.lookup(key) {
            Some(binding) => KeyLookup::Found(binding.clone()),
            None => KeyLookup::Unbound,
        }
    }
}
