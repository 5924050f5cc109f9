//! Deck assembly and serialization.
//!
//! [`builder`] owns the growing slide list as a guarded state machine;
//! [`pptx`] turns the finished list into a PresentationML package using the
//! part templates in [`template`].

pub mod builder;
pub mod pptx;
pub mod template;

pub use builder::{DeckBuilder, DeckPhase, DeckProperties, Slide};
