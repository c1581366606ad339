// src/store/links.rs
// =============================================================================
// Loading and saving a link set.
//
// - load: non-empty trimmed lines of the file; a missing file is an empty set
// - save: overwrites the file with the set sorted lexicographically, one URL
//   per newline-terminated line, so reruns produce clean diffs
//
// The in-memory HashSet guarantees there are never duplicate lines.
// =============================================================================

use crate::error::StoreError;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

pub type LinkSet = HashSet<String>;

pub fn load(path: &Path) -> Result<LinkSet, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet, starting empty", path.display());
            return Ok(LinkSet::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let links: LinkSet = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    debug!("loaded {} link(s) from {}", links.len(), path.display());
    Ok(links)
}

pub fn save(path: &Path, links: &LinkSet) -> Result<(), StoreError> {
    let write_error = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
    }

    let mut sorted: Vec<&String> = links.iter().collect();
    sorted.sort();

    let mut content = String::new();
    for link in sorted {
        content.push_str(link);
        content.push('\n');
    }

    fs::write(path, content).map_err(write_error)?;

    debug!("saved {} link(s) to {}", links.len(), path.display());
    Ok(())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. HashSet in memory, sorted on disk
//    - Membership is checked once per attempt
//    - Sorting happens only in save(), once per run
//
// 2. Missing file vs. unreadable file
//    - ErrorKind::NotFound means "nothing seen yet" and yields an empty set
//    - Any other kind (permissions, a directory) is a StoreError::Read
//
// 3. No appends
//    - Files are rewritten wholesale at the end of a run
//    - A killed run leaves the previous run's files untouched
// -----------------------------------------------------------------------------
