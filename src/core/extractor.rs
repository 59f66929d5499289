use std::fs;
use std::path::Path;

use log::warn;

use crate::models::ArchiveError;

/// One node of a virtual archive entry tree
#[derive(Debug)]
pub enum EntryNode {
    File { name: String, data: Vec<u8> },
    Dir { name: String, children: Vec<EntryNode> },
}

impl EntryNode {
    pub fn name(&self) -> &str {
        match self {
            EntryNode::File { name, .. } => name,
            EntryNode::Dir { name, .. } => name,
        }
    }
}

/// Virtual file tree assembled from flat archive entry names
///
/// Archive backends expose entries as flat slash-separated names; the tree
/// restores the hierarchy so extraction can mirror it recursively.
/// Intermediate directories are created on demand, so archives that omit
/// explicit directory entries still extract correctly.
#[derive(Debug, Default)]
pub struct EntryTree {
    roots: Vec<EntryNode>,
}

impl EntryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[EntryNode] {
        &self.roots
    }

    /// Record a directory entry, creating intermediate directories as needed
    pub fn insert_dir(&mut self, path: &str) -> Result<(), ArchiveError> {
        let Some(components) = safe_components(path) else {
            return Ok(());
        };

        let mut nodes = &mut self.roots;
        for component in components {
            nodes = ensure_dir(nodes, component)?;
        }

        Ok(())
    }

    /// Record a file entry with its content, creating parent directories as needed
    pub fn insert_file(&mut self, path: &str, data: Vec<u8>) -> Result<(), ArchiveError> {
        let Some(components) = safe_components(path) else {
            return Ok(());
        };
        let Some((file_name, dirs)) = components.split_last() else {
            return Ok(());
        };

        let mut nodes = &mut self.roots;
        for component in dirs {
            nodes = ensure_dir(nodes, component)?;
        }

        if let Some(existing) = nodes.iter_mut().find(|n| n.name() == *file_name) {
            match existing {
                // Duplicate file entry: last one wins
                EntryNode::File { data: existing_data, .. } => {
                    *existing_data = data;
                    return Ok(());
                }
                EntryNode::Dir { .. } => {
                    return Err(ArchiveError::Extraction(format!(
                        "Entry {} is recorded as both a file and a directory",
                        path
                    )));
                }
            }
        }

        nodes.push(EntryNode::File {
            name: (*file_name).to_string(),
            data,
        });

        Ok(())
    }
}

/// Split an entry name into components, refusing names that could escape the
/// destination. Returns None (and logs) for unsafe names; they are skipped.
fn safe_components(path: &str) -> Option<Vec<&str>> {
    let components: Vec<&str> = path
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();

    if components.is_empty() {
        return None;
    }

    if components.iter().any(|c| *c == "..") {
        warn!("Skipping archive entry with unsafe name: {}", path);
        return None;
    }

    Some(components)
}

/// Find or create the directory `name` in `nodes`, returning its child list
fn ensure_dir<'a>(
    nodes: &'a mut Vec<EntryNode>,
    name: &str,
) -> Result<&'a mut Vec<EntryNode>, ArchiveError> {
    let index = match nodes.iter().position(|n| n.name() == name) {
        Some(index) => index,
        None => {
            nodes.push(EntryNode::Dir {
                name: name.to_string(),
                children: Vec::new(),
            });
            nodes.len() - 1
        }
    };

    match &mut nodes[index] {
        EntryNode::Dir { children, .. } => Ok(children),
        EntryNode::File { name, .. } => Err(ArchiveError::Extraction(format!(
            "Entry {} is recorded as both a file and a directory",
            name
        ))),
    }
}

/// Materialize a virtual entry tree under `destination`
///
/// Creates `destination` (with parents) even when `entries` is empty, so an
/// empty-directory marker extracts to an empty directory. Extraction is
/// best-effort: on failure, files already written stay on disk.
pub fn extract(entries: &[EntryNode], destination: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(destination).map_err(|e| {
        ArchiveError::Extraction(format!(
            "Failed to create directory {}: {}",
            destination.display(),
            e
        ))
    })?;

    for entry in entries {
        let target = destination.join(entry.name());

        match entry {
            EntryNode::Dir { children, .. } => extract(children, &target)?,
            EntryNode::File { data, .. } => {
                fs::write(&target, data).map_err(|e| {
                    ArchiveError::Extraction(format!(
                        "Failed to write file {}: {}",
                        target.display(),
                        e
                    ))
                })?;
            }
        }
    }

    Ok(())
}
