//! Registry entries: a loaded font or a lazily realized generator.

use std::sync::Arc;

use crate::font::{FontGenerator, FontRef};
use crate::logging::targets;
use crate::properties::FontProperties;

/// Realization state of a registered generator.
#[derive(Debug, Clone)]
pub(crate) enum Realization {
    /// `generate` has not been called yet.
    Pending,
    /// `generate` succeeded; the font is reused from now on.
    Realized(FontRef),
    /// `generate` failed. Never retried.
    Failed,
}

/// One registered font source.
///
/// Descriptors live in the selector's append-only arena and are referenced
/// by index from every group they belong to, so realizing a generator once
/// is seen by all of those groups.
#[derive(Debug)]
pub(crate) enum FontDescriptor {
    Loaded(FontRef),
    Generator {
        generator: Arc<dyn FontGenerator>,
        state: Realization,
    },
}

impl FontDescriptor {
    pub(crate) fn generator(generator: Arc<dyn FontGenerator>) -> Self {
        Self::Generator {
            generator,
            state: Realization::Pending,
        }
    }

    /// Properties used for matching: the font's own, or the generator's
    /// advertised ones.
    pub(crate) fn properties(&self) -> &FontProperties {
        match self {
            Self::Loaded(font) => font.properties(),
            Self::Generator { generator, .. } => generator.properties(),
        }
    }

    /// The font, if it is available without running a generator.
    pub(crate) fn loaded(&self) -> Option<&FontRef> {
        match self {
            Self::Loaded(font) => Some(font),
            Self::Generator {
                state: Realization::Realized(font),
                ..
            } => Some(font),
            Self::Generator { .. } => None,
        }
    }

    /// The generator, if it still has to be run.
    pub(crate) fn pending_generator(&self) -> Option<&Arc<dyn FontGenerator>> {
        match self {
            Self::Generator {
                generator,
                state: Realization::Pending,
            } => Some(generator),
            _ => None,
        }
    }

    /// The font, running the generator first if needed.
    ///
    /// Returns `None` when the generator fails, now or on an earlier call.
    pub(crate) fn realize(&mut self) -> Option<FontRef> {
        let (generator, state) = match self {
            Self::Loaded(font) => return Some(font.clone()),
            Self::Generator { generator, state } => (generator, state),
        };

        match state {
            Realization::Realized(font) => Some(font.clone()),
            Realization::Failed => None,
            Realization::Pending => match generator.generate() {
                Ok(font) => {
                    tracing::debug!(
                        target: targets::REGISTRY,
                        properties = %generator.properties(),
                        font = %font.id(),
                        "realized font generator"
                    );
                    *state = Realization::Realized(font.clone());
                    Some(font)
                }
                Err(err) => {
                    tracing::warn!(
                        target: targets::REGISTRY,
                        properties = %generator.properties(),
                        error = %err,
                        "font generator failed; entry disabled"
                    );
                    *state = Realization::Failed;
                    None
                }
            },
        }
    }
}
