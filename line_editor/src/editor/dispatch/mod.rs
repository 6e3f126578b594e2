// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Keys to actions. Every [`crate::Mode`] has a [`BindingTable`] mapping keys to either
//! a named [`Builtin`] or a [`UserCallable`]. The tables are shared by all editors and
//! can be changed at any time through [`EditorModule`]; changes apply to the next key.

// Attach.
pub mod binding_table;
pub mod builtin_error;
pub mod builtins;
pub mod edit_context;
pub mod editor_module;
pub mod script_value;

// Re-export.
pub use binding_table::*;
pub use builtin_error::*;
pub use builtins::*;
pub use edit_context::*;
pub use editor_module::*;
pub use script_value::*;
