//! Whole-image edits: parameter sets and the non-destructive session.

pub mod params;
pub mod session;

pub use params::{Adjustments, EditParams, apply_edit};
pub use session::EditSession;
