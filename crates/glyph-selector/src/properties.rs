//! Font identity description.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Font weight, typically ranging from 100 (thin) to 900 (black).
///
/// Common weight constants are provided for convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Thin weight (100).
    pub const THIN: Self = Self(100);
    /// Extra-light weight (200).
    pub const EXTRA_LIGHT: Self = Self(200);
    /// Light weight (300).
    pub const LIGHT: Self = Self(300);
    /// Normal/regular weight (400).
    pub const NORMAL: Self = Self(400);
    /// Medium weight (500).
    pub const MEDIUM: Self = Self(500);
    /// Semi-bold weight (600).
    pub const SEMI_BOLD: Self = Self(600);
    /// Bold weight (700).
    pub const BOLD: Self = Self(700);
    /// Extra-bold weight (800).
    pub const EXTRA_BOLD: Self = Self(800);
    /// Black/heavy weight (900).
    pub const BLACK: Self = Self(900);

    /// Create a font weight from a numeric value (100-900).
    pub fn new(weight: u16) -> Self {
        Self(weight.clamp(100, 900))
    }

    /// Get the numeric weight value.
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<u16> for FontWeight {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

/// The identity of a font: family, slant, weight and foundry.
///
/// The source label records where the font came from (a path, a URL, a
/// database name). It is informational only: equality and hashing ignore
/// it, so two values that differ only in their source label compare equal.
///
/// # Example
///
/// ```
/// use glyph_selector::{FontProperties, FontWeight};
///
/// let props = FontProperties::new("DejaVu Sans")
///     .weight(FontWeight::BOLD)
///     .italic(true)
///     .source_label("/usr/share/fonts/DejaVuSans-BoldOblique.ttf");
///
/// assert_eq!(props.family(), "DejaVu Sans");
/// assert!(props.is_italic());
/// assert_eq!(props, FontProperties::new("DejaVu Sans").weight(FontWeight::BOLD).italic(true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FontProperties {
    family: String,
    italic: bool,
    weight: FontWeight,
    foundry: Option<String>,
    source_label: String,
}

impl FontProperties {
    /// Create properties for an upright, normal-weight font of `family`.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            ..Default::default()
        }
    }

    /// Set whether the font is italic.
    #[must_use]
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set the font weight, clamped to 100-900.
    #[must_use]
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = FontWeight::new(weight.0);
        self
    }

    /// Set the foundry (vendor) name.
    #[must_use]
    pub fn foundry(mut self, foundry: impl Into<String>) -> Self {
        self.foundry = Some(foundry.into());
        self
    }

    /// Set the informational source label.
    #[must_use]
    pub fn source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Get the family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Check if the font is italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Get the font weight.
    pub fn font_weight(&self) -> FontWeight {
        self.weight
    }

    /// Get the foundry name, if known.
    pub fn foundry_name(&self) -> Option<&str> {
        self.foundry.as_deref()
    }

    /// Get the source label.
    pub fn label(&self) -> &str {
        &self.source_label
    }
}

impl PartialEq for FontProperties {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.italic == other.italic
            && self.weight == other.weight
            && self.foundry == other.foundry
    }
}

impl Eq for FontProperties {}

impl Hash for FontProperties {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.italic.hash(state);
        self.weight.hash(state);
        self.foundry.hash(state);
    }
}

impl fmt::Display for FontProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.weight.0)?;
        if self.italic {
            write!(f, " italic")?;
        }
        if let Some(foundry) = &self.foundry {
            write!(f, " ({foundry})")?;
        }
        Ok(())
    }
}
