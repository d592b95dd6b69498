//! Source locations.
//!
//! A [`Location`] is a slice of a named source: the file it came from plus a
//! byte offset and length. Two locations are equal when their *content*
//! matches, not when they point at the same bytes — this is what gives
//! identifiers with the same spelling structural equality across distinct
//! nodes, per the data model's location-as-identity rule.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Interned source text for one input file, shared by every [`Location`] that
/// slices into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            contents: contents.into(),
        })
    }
}

/// A source slice: file, byte offset, and byte length.
///
/// `PartialEq`/`Hash` compare the *text* the location denotes, not the file
/// or offset, matching the spec's "locations compare by content" invariant.
#[derive(Debug, Clone)]
pub struct Location {
    file: Arc<SourceFile>,
    offset: u32,
    len: u32,
}

impl Location {
    pub fn new(file: Arc<SourceFile>, offset: u32, len: u32) -> Self {
        debug_assert!((offset as usize + len as usize) <= file.contents.len());
        Self { file, offset, len }
    }

    /// A zero-length location at the start of `file`, used for synthesized
    /// nodes that have no concrete-syntax counterpart (e.g. fresh type
    /// variables, lifted closure classes).
    pub fn synthetic(file: Arc<SourceFile>) -> Self {
        Self {
            file,
            offset: 0,
            len: 0,
        }
    }

    pub fn file(&self) -> &str {
        &self.file.name
    }

    /// The full text of the file this location slices into, for rendering
    /// source-annotated diagnostics.
    pub fn file_contents(&self) -> &str {
        &self.file.contents
    }

    /// The byte range this location denotes within its file's contents.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.offset as usize..(self.offset as usize + self.len as usize)
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The text this location slices out of its source file.
    pub fn text(&self) -> &str {
        let start = self.offset as usize;
        let end = start + self.len as usize;
        &self.file.contents[start..end]
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl Eq for Location {}

impl std::hash::Hash for Location {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text().hash(state);
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
