// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{AnalysisError, Compiler, NodeKind, SyntaxTree};
use std::collections::HashSet;

/// Checks that every `$variable` in the tree can be resolved, either from the process
/// environment or from [`Self::known_variables`].
#[derive(Debug, Clone, Default)]
pub struct ShellCompiler {
    pub known_variables: HashSet<String>,
}

impl ShellCompiler {
    #[must_use]
    pub fn with_variables(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            known_variables: names.into_iter().map(Into::into).collect(),
        }
    }

    fn is_defined(&self, name: &str) -> bool {
        self.known_variables.contains(name) || std::env::var_os(name).is_some()
    }
}

impl Compiler for ShellCompiler {
    fn compile(&self, tree: &SyntaxTree) -> Result<(), AnalysisError> {
        let mut errors: Vec<AnalysisError> = tree
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Variable)
            .filter_map(|node| {
                let name = tree.text_of(node).trim_start_matches('$');
                (!self.is_defined(name))
                    .then(|| AnalysisError::at(format!("variable ${name} not found"), node.span))
            })
            .collect();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(AnalysisError::Many(errors)),
        }
    }
}
