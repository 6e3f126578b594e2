// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashSet, path::PathBuf, sync::Arc};
use tokio::sync::oneshot;

/// Lists the names of external commands, to tell good command names from bad ones.
pub trait ExternalCommandLookup: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the names can't be listed at all. Unreadable parts of the
    /// search path are skipped instead.
    fn external_commands(&self) -> miette::Result<HashSet<String>>;
}

pub type SafeExternalCommandLookup = Arc<dyn ExternalCommandLookup>;

/// Executable files in a list of directories, `$PATH` by default.
#[derive(Debug, Clone, Default)]
pub struct PathLookup {
    pub dirs: Option<Vec<PathBuf>>,
}

impl PathLookup {
    #[must_use]
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self { Self { dirs: Some(dirs) } }

    fn search_dirs(&self) -> Vec<PathBuf> {
        match &self.dirs {
            Some(dirs) => dirs.clone(),
            None => std::env::var_os("PATH")
                .map(|it| std::env::split_paths(&it).collect())
                .unwrap_or_default(),
        }
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(metadata: &std::fs::Metadata) -> bool { metadata.is_file() }

impl ExternalCommandLookup for PathLookup {
    fn external_commands(&self) -> miette::Result<HashSet<String>> {
        let mut acc = HashSet::new();
        for dir in self.search_dirs() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                tracing::debug!(message = "skipping unreadable dir", dir = %dir.display());
                continue;
            };
            for entry in entries.flatten() {
                // Follows symlinks.
                let Ok(metadata) = std::fs::metadata(entry.path()) else {
                    continue;
                };
                if is_executable(&metadata) {
                    acc.insert(entry.file_name().to_string_lossy().to_string());
                }
            }
        }
        Ok(acc)
    }
}

/// Run `lookup` on the blocking pool. The receiver gets the names once, or is closed
/// without a value if the lookup fails.
#[must_use]
pub fn spawn_lookup(lookup: SafeExternalCommandLookup) -> oneshot::Receiver<HashSet<String>> {
    let (sender, receiver) = oneshot::channel();
    tokio::task::spawn_blocking(move || match lookup.external_commands() {
        Ok(names) => {
            // The read may already be over.
            sender.send(names).ok();
        }
        Err(err) => {
            tracing::warn!(message = "external command lookup failed", ?err);
        }
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::try_create_temp_dir;

    #[cfg(unix)]
    fn write_file(path: &std::path::Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_only_executables_are_listed() {
        let dir = try_create_temp_dir().unwrap();
        write_file(&dir.join("runme"), 0o755);
        write_file(&dir.join("readme"), 0o644);
        std::fs::create_dir(dir.join("subdir")).unwrap();
        let lookup = PathLookup::with_dirs(vec![dir.inner.clone(), dir.join("missing")]);

        let names = spawn_lookup(Arc::new(lookup)).await.unwrap();

        assert_eq!(names, HashSet::from(["runme".to_string()]));
    }
}
