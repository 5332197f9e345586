//! Group keys and candidate ranking.
//!
//! Fonts are bucketed by family name. In fuzzy mode every font of the same
//! family (compared case-insensitively, surrounding whitespace ignored)
//! qualifies for a query and is ranked by how many of the remaining fields
//! (slant, weight, foundry) it shares with the query. In exact mode a font
//! qualifies only when it is field-equal to the query.

use std::hash::{Hash, Hasher};

use crate::properties::FontProperties;

/// Normalized family name used as the coarse bucket.
pub(crate) fn family_key(family: &str) -> String {
    family.trim().to_lowercase()
}

/// Whether `candidate` belongs to the group built for `query`.
pub(crate) fn accepts(query: &FontProperties, candidate: &FontProperties, exact: bool) -> bool {
    if exact {
        query == candidate
    } else {
        family_key(query.family()) == family_key(candidate.family())
    }
}

/// Number of non-family fields `candidate` shares with `query` (0 to 3).
pub(crate) fn match_score(query: &FontProperties, candidate: &FontProperties) -> u8 {
    u8::from(query.is_italic() == candidate.is_italic())
        + u8::from(query.font_weight() == candidate.font_weight())
        + u8::from(query.foundry_name() == candidate.foundry_name())
}

/// Identifies a font group: the query properties plus the match mode.
///
/// Equality follows [`FontProperties`] field-equality, so field-equal
/// queries with the same mode map to the same group.
#[derive(Debug, Clone)]
pub(crate) struct GroupKey {
    pub(crate) properties: FontProperties,
    pub(crate) exact: bool,
}

impl GroupKey {
    pub(crate) fn new(properties: &FontProperties, exact: bool) -> Self {
        // The label is dropped so a group never reports the label of
        // whichever query happened to create it.
        let properties = properties.clone().source_label("");
        Self { properties, exact }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.exact == other.exact && self.properties == other.properties
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.properties.hash(state);
        self.exact.hash(state);
    }
}

/// Position at which an entry scoring `score` is inserted into a ranked
/// member list, given the scores of the current members in order. `None`
/// means append.
///
/// Members are kept in descending score order and a newcomer goes after
/// every member with an equal or higher score, preserving registration
/// order among ties.
pub(crate) fn insertion_point(scores: impl IntoIterator<Item = u8>, score: u8) -> Option<usize> {
    scores.into_iter().position(|existing| existing < score)
}
