//! Modal overlays drawn above the results list.

/// Active overlay, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    /// No overlay.
    #[default]
    None,
    /// Detail screen of a ready sample.
    Detail {
        /// Identifier of the presented sample.
        sample_id: String,
        /// Title line (sample name).
        title: String,
        /// Readme text or a fallback description.
        body: String,
        /// Scroll offset in lines.
        scroll: u16,
    },
    /// User-visible failure message.
    Alert { message: String },
}
