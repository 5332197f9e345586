//! Font group handles.

use std::fmt;
use std::sync::Arc;

use crate::font::{FontGenerator, FontRef};
use crate::properties::FontProperties;
use crate::registry::GroupId;
use crate::selector::GlyphSelector;

/// A group of fonts selected from a [`FontProperties`] query.
///
/// A `FontGroup` is a cheap, copyable handle into the [`GlyphSelector`]
/// that created it; it borrows the selector and cannot outlive it. The
/// handle is a live view: fonts and generators registered after the group
/// was created show up in it if they match its query.
///
/// Inspecting a group never realizes its generators.
///
/// # Example
///
/// ```
/// use glyph_selector::{FontProperties, GlyphSelector};
///
/// let selector = GlyphSelector::default();
/// let group = selector.fetch_group(&FontProperties::new("Sans"), false);
///
/// assert!(group.is_empty());
/// assert_eq!(group, selector.fetch_group(&FontProperties::new("Sans"), false));
/// ```
#[derive(Clone, Copy)]
pub struct FontGroup<'a> {
    selector: &'a GlyphSelector,
    id: GroupId,
}

impl<'a> FontGroup<'a> {
    pub(crate) fn new(selector: &'a GlyphSelector, id: GroupId) -> Self {
        Self { selector, id }
    }

    pub(crate) fn id(&self) -> GroupId {
        self.id
    }

    pub(crate) fn selector(&self) -> &'a GlyphSelector {
        self.selector
    }

    /// Fonts of this group that are loaded, best match first.
    ///
    /// Includes generators that have already been realized.
    pub fn loaded_fonts(&self) -> Vec<FontRef> {
        let registry = self.selector.registry().lock();
        registry
            .group_state(self.id)
            .members
            .iter()
            .filter_map(|&entry| registry.entry(entry).loaded().cloned())
            .collect()
    }

    /// Generators of this group that have not loaded their font yet, best
    /// match first.
    pub fn font_generators(&self) -> Vec<Arc<dyn FontGenerator>> {
        let registry = self.selector.registry().lock();
        registry
            .group_state(self.id)
            .members
            .iter()
            .filter_map(|&entry| registry.entry(entry).pending_generator().cloned())
            .collect()
    }

    /// Number of registered entries in this group, including generators
    /// that failed to load.
    pub fn len(&self) -> usize {
        self.selector.registry().lock().group_state(self.id).members.len()
    }

    /// Check if no registered entry matches this group's query.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The query this group was created from (without source label).
    pub fn properties(&self) -> FontProperties {
        self.selector.registry().lock().group_state(self.id).key.properties.clone()
    }

    /// Check if this group only admits field-equal fonts.
    pub fn is_exact(&self) -> bool {
        self.selector.registry().lock().group_state(self.id).key.exact
    }
}

impl PartialEq for FontGroup<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.selector, other.selector) && self.id == other.id
    }
}

impl Eq for FontGroup<'_> {}

impl fmt::Debug for FontGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontGroup")
            .field("id", &self.id.0)
            .finish_non_exhaustive()
    }
}
