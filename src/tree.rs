//! Recursive directory removal without recursion.

use crate::error::ShellError;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

enum Pending {
    /// Directory whose entries have not been listed yet.
    Visit(PathBuf),
    /// Directory whose entries have all been removed.
    Remove(PathBuf),
}

/// Remove the directory tree rooted at `root`, returning the number of
/// filesystem entries removed (the root included).
///
/// Traversal uses an explicit stack of pending directories, so depth is bounded
/// by heap rather than call stack. Entries are classified without following
/// symbolic links: a link is unlinked like a file and its target is never
/// visited, which rules out cycles and removal outside the tree.
///
/// The first failure aborts the walk and is returned; entries already removed
/// stay removed.
pub fn remove_tree(root: &Path) -> Result<usize> {
    let meta = fs::symlink_metadata(root)
        .with_context(|| format!("delete: {}", root.display()))?;
    if !meta.is_dir() {
        return Err(ShellError::NotADirectory(root.to_path_buf()).into());
    }

    let mut removed = 0;
    let mut pending = vec![Pending::Visit(root.to_path_buf())];
    while let Some(next) = pending.pop() {
        match next {
            Pending::Visit(dir) => {
                let entries = fs::read_dir(&dir)
                    .with_context(|| format!("delete: can't open {}", dir.display()))?;
                pending.push(Pending::Remove(dir.clone()));
                for entry in entries {
                    let entry =
                        entry.with_context(|| format!("delete: can't read {}", dir.display()))?;
                    let path = entry.path();
                    let file_type = entry
                        .file_type()
                        .with_context(|| format!("delete: can't stat {}", path.display()))?;
                    if file_type.is_dir() {
                        pending.push(Pending::Visit(path));
                    } else {
                        fs::remove_file(&path)
                            .with_context(|| format!("delete: can't remove {}", path.display()))?;
                        debug!("removed file {}", path.display());
                        removed += 1;
                    }
                }
            }
            Pending::Remove(dir) => {
                fs::remove_dir(&dir)
                    .with_context(|| format!("delete: can't remove {}", dir.display()))?;
                debug!("removed directory {}", dir.display());
                removed += 1;
            }
        }
    }
    Ok(removed)
}
