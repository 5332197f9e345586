//! Lock-protected selector state.
//!
//! Everything here runs with the selector's mutex held; the public entry
//! points in [`selector`](crate::selector) take the lock once and call in.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::cache::GlyphCache;
use crate::descriptor::FontDescriptor;
use crate::font::{FontId, FontRef};
use crate::glyph::{Glyph, GlyphRender};
use crate::logging::targets;
use crate::matching::{GroupKey, accepts, insertion_point, match_score};
use crate::properties::FontProperties;

/// Index of a group in the registry's group arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct GroupId(pub(crate) usize);

/// A group's query and its ranked members.
#[derive(Debug)]
pub(crate) struct GroupState {
    pub(crate) key: GroupKey,
    /// Indices into `Registry::entries`, best match first.
    pub(crate) members: Vec<usize>,
    /// `scores[i]` is the match score of `members[i]`.
    scores: Vec<u8>,
}

/// Candidate ordering for one lookup, resolved once per call or batch.
pub(crate) struct Plan {
    /// Font tried before the group, for explicit-font lookups.
    pub(crate) first: Option<FontRef>,
    pub(crate) group: Option<GroupId>,
    /// Skip group members that are not field-equal to the group query.
    pub(crate) exact_filter: bool,
}

impl Plan {
    pub(crate) fn single(font: FontRef) -> Self {
        Self {
            first: Some(font),
            group: None,
            exact_filter: false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    /// Append-only; indices are stable for the selector's lifetime.
    entries: Vec<FontDescriptor>,
    groups: Vec<GroupState>,
    lookup: HashMap<GroupKey, GroupId>,
}

impl Registry {
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn group_state(&self, id: GroupId) -> &GroupState {
        &self.groups[id.0]
    }

    pub(crate) fn entry(&self, index: usize) -> &FontDescriptor {
        &self.entries[index]
    }

    /// Register a descriptor and insert it into every existing group that
    /// accepts it. Returns the number of groups updated.
    pub(crate) fn add(&mut self, descriptor: FontDescriptor) -> usize {
        let index = self.entries.len();
        let mut updated = 0;

        for group in &mut self.groups {
            let properties = descriptor.properties();
            if !accepts(&group.key.properties, properties, group.key.exact) {
                continue;
            }
            let score = match_score(&group.key.properties, properties);
            let at = insertion_point(group.scores.iter().copied(), score).unwrap_or(group.members.len());
            group.members.insert(at, index);
            group.scores.insert(at, score);
            updated += 1;
        }

        self.entries.push(descriptor);
        updated
    }

    /// Find or create the group for `(properties, exact)`.
    pub(crate) fn group(&mut self, properties: &FontProperties, exact: bool) -> GroupId {
        let key = GroupKey::new(properties, exact);
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }

        let mut ranked: Vec<(usize, u8)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| accepts(&key.properties, entry.properties(), exact))
            .map(|(index, entry)| (index, match_score(&key.properties, entry.properties())))
            .collect();
        // Stable: equal scores keep registration order.
        ranked.sort_by_key(|&(_, score)| Reverse(score));

        let id = GroupId(self.groups.len());
        tracing::debug!(
            target: targets::REGISTRY,
            query = %key.properties,
            exact,
            members = ranked.len(),
            "created font group"
        );
        self.groups.push(GroupState {
            key: key.clone(),
            members: ranked.iter().map(|&(index, _)| index).collect(),
            scores: ranked.iter().map(|&(_, score)| score).collect(),
        });
        self.lookup.insert(key, id);
        id
    }

    /// First member of the group that is loaded or realizes successfully.
    pub(crate) fn best_font(&mut self, group: GroupId) -> Option<FontRef> {
        for position in 0..self.groups[group.0].members.len() {
            let entry = self.groups[group.0].members[position];
            if let Some(font) = self.entries[entry].realize() {
                return Some(font);
            }
        }
        None
    }

    /// Resolve `code` against the plan's candidates, in order.
    pub(crate) fn fetch_glyph(
        &mut self,
        cache: &dyn GlyphCache,
        render: GlyphRender,
        plan: &Plan,
        code: u32,
    ) -> Glyph {
        let mut skip: Option<FontId> = None;

        if let Some(font) = &plan.first {
            if let Some(index) = font.glyph_index(code) {
                return cache.fetch_or_generate(font, render, index);
            }
            skip = Some(font.id());
        }

        if let Some(group) = plan.group {
            for position in 0..self.groups[group.0].members.len() {
                let state = &self.groups[group.0];
                let entry = state.members[position];
                if plan.exact_filter && self.entries[entry].properties() != &state.key.properties {
                    continue;
                }

                let Some(font) = self.entries[entry].realize() else {
                    continue;
                };
                if Some(font.id()) == skip {
                    continue;
                }
                if let Some(index) = font.glyph_index(code) {
                    return cache.fetch_or_generate(&font, render, index);
                }
            }
        }

        tracing::trace!(target: targets::FETCH, code, "no candidate font maps character");
        Glyph::invalid()
    }
}
