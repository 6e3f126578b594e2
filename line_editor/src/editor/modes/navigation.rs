// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditContext, ModeState, NextAction};
use miette::IntoDiagnostic;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Sub-state of navigation mode: a directory listing with a selection. Moving around
/// does not change the process working directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub dir: PathBuf,
    /// Sorted by name, hidden entries left out.
    pub entries: Vec<NavigationEntry>,
    pub selected: usize,
    /// Where navigation started. Names inserted from here are left relative.
    pub start_dir: PathBuf,
}

/// # Errors
///
/// Returns an error if `dir` can't be read.
fn list_dir(dir: &Path) -> miette::Result<Vec<NavigationEntry>> {
    let mut acc = vec![];
    for entry in std::fs::read_dir(dir).into_diagnostic()? {
        let entry = entry.into_diagnostic()?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        acc.push(NavigationEntry {
            is_dir: entry.path().is_dir(),
            name,
        });
    }
    acc.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(acc)
}

impl NavigationState {
    /// # Errors
    ///
    /// Returns an error if `dir` can't be read.
    pub fn try_new(dir: impl Into<PathBuf>) -> miette::Result<Self> {
        let dir = dir.into();
        Ok(Self {
            entries: list_dir(&dir)?,
            selected: 0,
            start_dir: dir.clone(),
            dir,
        })
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&NavigationEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_prev(&mut self) { self.selected = self.selected.saturating_sub(1); }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    /// Show the parent directory with the directory we came from selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent can't be read. The state is unchanged then.
    pub fn ascend(&mut self) -> miette::Result<()> {
        let Some(parent) = self.dir.parent().map(Path::to_path_buf) else {
            return Ok(());
        };
        let entries = list_dir(&parent)?;
        let child_name = self
            .dir
            .file_name()
            .map(|it| it.to_string_lossy().to_string());
        self.selected = entries
            .iter()
            .position(|it| Some(&it.name) == child_name.as_ref())
            .unwrap_or(0);
        self.entries = entries;
        self.dir = parent;
        Ok(())
    }

    /// Show the selected directory. Does nothing when a file is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory can't be read. The state is unchanged then.
    pub fn descend(&mut self) -> miette::Result<()> {
        let Some(entry) = self.selected_entry().filter(|it| it.is_dir) else {
            return Ok(());
        };
        let dir = self.dir.join(&entry.name);
        self.entries = list_dir(&dir)?;
        self.dir = dir;
        self.selected = 0;
        Ok(())
    }

    /// Text to insert for the selected entry: its name in the starting directory, the
    /// joined path anywhere else.
    #[must_use]
    pub fn insert_text(&self) -> Option<String> {
        let entry = self.selected_entry()?;
        if self.dir == self.start_dir {
            Some(entry.name.clone())
        } else {
            Some(self.dir.join(&entry.name).to_string_lossy().to_string())
        }
    }
}

pub(crate) fn start_navigation(ctx: &mut EditContext<'_>) {
    let result = std::env::current_dir()
        .into_diagnostic()
        .and_then(NavigationState::try_new);
    match result {
        Ok(navigation) => ctx.state.mode = ModeState::Navigation(navigation),
        Err(err) => ctx.state.add_tip(format!("navigation error: {err}")),
    }
}

/// Run `f` on the navigation sub-state, turning a failure into a tip.
fn with_navigation(
    ctx: &mut EditContext<'_>,
    f: impl FnOnce(&mut NavigationState) -> miette::Result<()>,
) {
    let ModeState::Navigation(navigation) = &mut ctx.state.mode else {
        return;
    };
    if let Err(err) = f(navigation) {
        ctx.state.add_tip(format!("navigation error: {err}"));
    }
}

pub(crate) fn select_nav_prev(ctx: &mut EditContext<'_>) {
    with_navigation(ctx, |it| {
        it.select_prev();
        Ok(())
    });
}

pub(crate) fn select_nav_next(ctx: &mut EditContext<'_>) {
    with_navigation(ctx, |it| {
        it.select_next();
        Ok(())
    });
}

pub(crate) fn ascend_nav(ctx: &mut EditContext<'_>) {
    with_navigation(ctx, NavigationState::ascend);
}

pub(crate) fn descend_nav(ctx: &mut EditContext<'_>) {
    with_navigation(ctx, NavigationState::descend);
}

pub(crate) fn navigation_insert_selected(ctx: &mut EditContext<'_>) {
    let text = match &ctx.state.mode {
        ModeState::Navigation(navigation) => navigation.insert_text(),
        _ => None,
    };
    if let Some(text) = text {
        let needs_space = ctx.state.buffer[..ctx.state.dot]
            .chars()
            .next_back()
            .is_some_and(|ch| !ch.is_whitespace());
        if needs_space {
            ctx.state.insert_at_dot(" ");
        }
        ctx.state.insert_at_dot(&text);
    }
}

pub(crate) fn quit_navigation(ctx: &mut EditContext<'_>) {
    ctx.state.mode = ModeState::Insert;
}

pub(crate) fn default_navigation(ctx: &mut EditContext<'_>) {
    quit_navigation(ctx);
    ctx.state.set_next_action(NextAction::ReprocessKey);
}
