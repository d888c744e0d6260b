//! The portfolio document and its merge engine.
//!
//! A document is an ordered sequence of sections with at most one section per
//! kind. Every mutation path re-establishes that invariant: same-kind
//! sections are replaced in place, new kinds are appended.

use serde::{Deserialize, Serialize};

use crate::portfolio::section::{Section, SectionKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioDocument(Vec<Section>);

impl PortfolioDocument {
    /// Builds a document from raw sections, folding duplicates by kind
    /// (last occurrence wins, first occurrence keeps the position).
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        PortfolioDocument::default().merge(sections)
    }

    pub fn sections(&self) -> &[Section] {
        &self.0
    }

    pub fn get(&self, kind: SectionKind) -> Option<&Section> {
        self.0.iter().find(|s| s.kind() == kind)
    }

    /// Merges incoming sections into this document.
    ///
    /// A section whose kind is already present replaces the existing one in
    /// place (full replacement, not a field-level merge); a new kind is
    /// appended after all pre-existing kinds. Relative order of kinds is the
    /// order of first appearance across `self` then `incoming`. Idempotent:
    /// merging the same sections twice equals merging them once.
    pub fn merge(&self, incoming: impl IntoIterator<Item = Section>) -> Self {
        let mut next = self.0.clone();
        for section in incoming {
            match next.iter_mut().find(|s| s.kind() == section.kind()) {
                Some(slot) => *slot = section,
                None => next.push(section),
            }
        }
        PortfolioDocument(next)
    }

    /// Replaces (or appends) a single section. Used by every per-section save.
    pub fn replace(&self, section: Section) -> Self {
        self.merge([section])
    }
}

impl IntoIterator for PortfolioDocument {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
