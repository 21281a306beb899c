//! Core domain types for guiport.
//!
//! - `DesignNode` - input nodes read from the design document
//! - `NodeOverrides` - typed export metadata attached to a design node
//! - `SceneNode` - output nodes of the exported GUI scene
//! - `Vector4`, `Pivot`, `Colour` - shared value types

mod colour;
mod design;
mod geometry;
mod overrides;
mod scene;

pub use colour::Colour;
pub use design::{DesignNode, Metadata, NodeId, NodeKind, TextAlign, TextPayload};
pub(crate) use design::finite_or_zero;
pub use geometry::{round_value, Pivot, Vector4, PRECISION};
pub use overrides::{keys, AdjustMode, BlendMode, NodeOverrides, SizeMode, VariantSpec};
pub use scene::{BoxVisual, SceneKind, SceneNode, TemplateRef, TextVisual, TextureRef};
