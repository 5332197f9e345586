//! Tracing targets used by this crate.
//!
//! The crate emits events through the `tracing` macros and never installs a
//! subscriber. To see them, install one in the application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("glyph_selector::registry=debug,glyph_selector::fetch=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Root target. Selector construction logs here; the other targets
    /// nest under it, so a directive on the root enables all of them.
    pub const ROOT: &str = "glyph_selector";
    /// Font and generator registration, group creation, generator realization.
    pub const REGISTRY: &str = "glyph_selector::registry";
    /// Glyph resolution.
    pub const FETCH: &str = "glyph_selector::fetch";
    /// Glyph store generation and flushes.
    pub const CACHE: &str = "glyph_selector::cache";
}
