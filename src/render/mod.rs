//! Output for exported scenes.
//!
//! `writer` implements the property-text grammar, `gui` lays scenes out in
//! it and `atlas` measures how large an atlas would pack.

pub mod atlas;
pub mod gui;
pub mod writer;

pub use atlas::{atlas_footprint, Footprint, ShelfPacker};
pub use gui::{render_gui, GuiSettings};
pub use writer::{PropertyWriter, VectorMode, CONSTANT_KEYS};
