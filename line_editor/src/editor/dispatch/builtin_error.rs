// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::KeyDescriptorError;

/// Errors handed back to the code calling builtins or editing binding tables. They never
/// reach the terminal session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum BuiltinError {
    #[error("editor builtins take no arguments, got {0}")]
    #[diagnostic(code(r3bl_line_editor::builtin::arity))]
    Arity(usize),

    #[error("editor inactive")]
    #[diagnostic(
        code(r3bl_line_editor::builtin::editor_inactive),
        help("Builtins can only be called while a line is being read")
    )]
    EditorInactive,

    #[error("no builtin named {0}")]
    #[diagnostic(code(r3bl_line_editor::builtin::unknown))]
    UnknownBuiltin(String),

    #[error("malformed key: {0}")]
    #[diagnostic(code(r3bl_line_editor::builtin::malformed_key))]
    MalformedKey(#[from] KeyDescriptorError),

    #[error("key must be string")]
    #[diagnostic(code(r3bl_line_editor::builtin::key_must_be_string))]
    KeyMustBeString,

    #[error("bad function type {0}")]
    #[diagnostic(
        code(r3bl_line_editor::builtin::bad_binding_value),
        help("Bind a builtin name (string) or a callable")
    )]
    BadBindingValue(&'static str),

    #[error("no binding for {0}")]
    #[diagnostic(code(r3bl_line_editor::builtin::no_such_key))]
    NoSuchKey(String),

    #[error("no binding table named {0}")]
    #[diagnostic(code(r3bl_line_editor::builtin::unknown_binding_table))]
    UnknownBindingTable(String),
}
