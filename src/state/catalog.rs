use crate::error::{GalleryError, Result};

/// Separator between path segments in manifest keys
pub const SEPARATOR: char = '/';

/// A node of the catalog tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node<R> {
    Leaf(R),
    Folder(Folder<R>),
}

/// A folder whose entries keep the order they were inserted in
#[derive(Debug, Clone, PartialEq)]
pub struct Folder<R> {
    entries: Vec<(String, Node<R>)>,
}

impl<R> Default for Folder<R> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<R> Folder<R> {
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node<R>)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn get(&self, key: &str) -> Option<&Node<R>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, node)| node)
    }

    /// Direct leaves, in insertion order
    pub fn images(&self) -> impl Iterator<Item = (&str, &R)> {
        self.entries().filter_map(|(key, node)| match node {
            Node::Leaf(image) => Some((key, image)),
            Node::Folder(_) => None,
        })
    }

    /// Direct subfolders, in insertion order
    pub fn subfolders(&self) -> impl Iterator<Item = (&str, &Folder<R>)> {
        self.entries().filter_map(|(key, node)| match node {
            Node::Folder(folder) => Some((key, folder)),
            Node::Leaf(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Node<R>> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, node)| node)
    }
}

/// The nested folder/image tree built from the flat asset manifest
///
/// The root is always a folder. Building is pure: the same manifest always
/// produces the same tree, and no state is shared between builds.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<R> {
    root: Folder<R>,
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Self { root: Folder::default() }
    }
}

impl<R> Catalog<R> {
    /// Build the tree from `(path, reference)` entries
    ///
    /// Folder entries appear in the order their keys first appear in `entries`.
    /// Empty paths, empty segments and leaf/folder collisions are rejected.
    pub fn build<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, R)>,
    {
        let mut root = Folder::default();
        for (path, reference) in entries {
            insert(&mut root, &path, reference)?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Folder<R> {
        &self.root
    }

    /// Every leaf with its full path, depth-first in insertion order
    pub fn leaves(&self) -> Vec<(String, &R)> {
        let mut out = Vec::new();
        collect_leaves(&self.root, "", &mut out);
        out
    }

    pub fn len(&self) -> usize {
        count_leaves(&self.root)
    }
}

fn insert<R>(root: &mut Folder<R>, path: &str, reference: R) -> Result<()> {
    if path.is_empty() {
        return Err(GalleryError::MalformedPath {
            path: path.to_string(),
            reason: "path is empty",
        });
    }

    let segments: Vec<&str> = path.split(SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(GalleryError::MalformedPath {
            path: path.to_string(),
            reason: "path contains an empty segment",
        });
    }

    let (file_name, folders) = match segments.split_last() {
        Some(split) => split,
        None => {
            return Err(GalleryError::MalformedPath {
                path: path.to_string(),
                reason: "path has no segments",
            })
        }
    };

    let mut current = root;
    for segment in folders {
        if current.get(segment).is_none() {
            current
                .entries
                .push((segment.to_string(), Node::Folder(Folder::default())));
        }
        current = match current.entry_mut(segment) {
            Some(Node::Folder(folder)) => folder,
            _ => {
                return Err(GalleryError::PathConflict {
                    path: path.to_string(),
                    existing: "image",
                })
            }
        };
    }

    let existing = match current.get(file_name) {
        Some(Node::Folder(_)) => Some("folder"),
        Some(Node::Leaf(_)) => Some("image"),
        None => None,
    };
    if let Some(existing) = existing {
        return Err(GalleryError::PathConflict {
            path: path.to_string(),
            existing,
        });
    }

    current
        .entries
        .push((file_name.to_string(), Node::Leaf(reference)));
    Ok(())
}

fn count_leaves<R>(folder: &Folder<R>) -> usize {
    folder
        .entries()
        .map(|(_, node)| match node {
            Node::Leaf(_) => 1,
            Node::Folder(child) => count_leaves(child),
        })
        .sum()
}

fn collect_leaves<'a, R>(folder: &'a Folder<R>, prefix: &str, out: &mut Vec<(String, &'a R)>) {
    for (key, node) in folder.entries() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}{SEPARATOR}{key}")
        };
        match node {
            Node::Leaf(reference) => out.push((path, reference)),
            Node::Folder(child) => collect_leaves(child, &path, out),
        }
    }
}
