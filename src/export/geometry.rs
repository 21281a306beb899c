//! Conversion from design-space boxes to pivot-relative scene coordinates.
//!
//! Design boxes are parent-local with a top-left origin and Y pointing down.
//! Scene positions are measured from the parent's pivot point to the node's
//! own pivot point with Y pointing up.

use crate::types::{finite_or_zero, Pivot, Vector4};

/// A node's box in its parent's design space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub size: Vector4,
    pub pivot: Pivot,
}

impl Placement {
    pub fn new(x: f64, y: f64, size: Vector4, pivot: Pivot) -> Self {
        Self {
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            size,
            pivot,
        }
    }
}

/// The frame a node is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParentFrame {
    pub pivot: Pivot,
    /// Parent size in scene units.
    pub size: Vector4,
    /// Offset accumulated from ancestors that were elided from the output.
    pub shift: Vector4,
}

/// Resolve a node's scene position.
///
/// At root there is no parent frame: the node's centre sits at the origin
/// and the result is the offset of its own pivot.
pub fn resolve_position(placement: &Placement, frame: &ParentFrame, at_root: bool) -> Vector4 {
    let own = placement.pivot.offset(placement.size);
    if at_root {
        return own.rounded();
    }

    let (w, h) = (placement.size.x, placement.size.y);
    let (pw, ph) = (finite_or_zero(frame.size.x), finite_or_zero(frame.size.y));

    // Centre of the node relative to the centre of the parent, Y flipped.
    let centred = Vector4::xy(placement.x + w / 2.0 - pw / 2.0, ph / 2.0 - placement.y - h / 2.0);

    // Measure from the parent's pivot point instead of its centre.
    let anchored = centred - frame.pivot.offset(frame.size);

    (anchored + own + shift_xy(frame.shift)).rounded()
}

/// Shift contributed by an elided container at `(x, y)` in design space.
pub fn elided_shift(x: f64, y: f64) -> Vector4 {
    Vector4::xy(finite_or_zero(x), -finite_or_zero(y))
}

/// Copy a design rotation (degrees) into the scene's Z rotation channel.
pub fn resolve_rotation(degrees: f64) -> Vector4 {
    Vector4::new(0.0, 0.0, finite_or_zero(degrees), 0.0).rounded()
}

/// Uniform scale that maps the base font size onto the requested one.
pub fn text_scale(font_size: f64, base_font_size: f64) -> f64 {
    if font_size > 0.0 && base_font_size > 0.0 && font_size.is_finite() && base_font_size.is_finite() {
        font_size / base_font_size
    } else {
        1.0
    }
}

/// Scale vector for a text node.
pub fn resolve_text_scale(font_size: f64, base_font_size: f64) -> Vector4 {
    Vector4::uniform(text_scale(font_size, base_font_size)).rounded()
}

/// Size of a text node: the design box expressed in unscaled font units.
pub fn resolve_text_size(size: Vector4, scale: f64) -> Vector4 {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    Vector4::xy(size.x / scale, size.y / scale).rounded()
}

fn shift_xy(shift: Vector4) -> Vector4 {
    Vector4::xy(finite_or_zero(shift.x), finite_or_zero(shift.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pivot: Pivot, w: f64, h: f64) -> ParentFrame {
        ParentFrame {
            pivot,
            size: Vector4::xy(w, h),
            shift: Vector4::ZERO,
        }
    }

    #[test]
    fn test_centred_child_is_origin_for_any_parent_size() {
        for (pw, ph) in [(100.0, 100.0), (960.0, 640.0), (33.0, 7.0)] {
            let size = Vector4::xy(20.0, 10.0);
            let placement = Placement::new((pw - 20.0) / 2.0, (ph - 10.0) / 2.0, size, Pivot::Center);
            let pos = resolve_position(&placement, &frame(Pivot::Center, pw, ph), false);
            assert!(pos.approx_eq_xy(&Vector4::ZERO), "{:?} for {}x{}", pos, pw, ph);
        }
    }

    #[test]
    fn test_nw_and_se_pivots_mirror() {
        let parent = frame(Pivot::Center, 200.0, 120.0);
        let size = Vector4::xy(30.0, 20.0);

        let nw = Placement::new(15.0, 25.0, size, Pivot::NW);
        let se = Placement::new(200.0 - 15.0 - 30.0, 120.0 - 25.0 - 20.0, size, Pivot::SE);

        let a = resolve_position(&nw, &parent, false);
        let b = resolve_position(&se, &parent, false);

        assert!(a.approx_eq_xy(&-b));
        assert_eq!(a, Vector4::xy(-85.0, 35.0));
    }

    #[test]
    fn test_y_axis_flips() {
        // A box in the top-left corner of its parent ends up left and up.
        let placement = Placement::new(0.0, 0.0, Vector4::xy(10.0, 10.0), Pivot::Center);
        let pos = resolve_position(&placement, &frame(Pivot::Center, 100.0, 100.0), false);
        assert_eq!(pos, Vector4::xy(-45.0, 45.0));
    }

    #[test]
    fn test_parent_pivot_reanchors() {
        let placement = Placement::new(45.0, 45.0, Vector4::xy(10.0, 10.0), Pivot::Center);

        let north = resolve_position(&placement, &frame(Pivot::N, 100.0, 100.0), false);
        assert_eq!(north, Vector4::xy(0.0, -50.0));

        let west = resolve_position(&placement, &frame(Pivot::W, 100.0, 100.0), false);
        assert_eq!(west, Vector4::xy(50.0, 0.0));

        let south_east = resolve_position(&placement, &frame(Pivot::SE, 100.0, 100.0), false);
        assert_eq!(south_east, Vector4::xy(-50.0, 50.0));
    }

    #[test]
    fn test_own_pivot_shifts_to_edge() {
        let placement = Placement::new(45.0, 45.0, Vector4::xy(10.0, 10.0), Pivot::NE);
        let pos = resolve_position(&placement, &frame(Pivot::Center, 100.0, 100.0), false);
        assert_eq!(pos, Vector4::xy(5.0, 5.0));
    }

    #[test]
    fn test_shift_is_added() {
        let placement = Placement::new(0.0, 0.0, Vector4::xy(10.0, 10.0), Pivot::Center);
        let parent = ParentFrame {
            shift: elided_shift(20.0, 30.0),
            ..frame(Pivot::Center, 100.0, 100.0)
        };
        let pos = resolve_position(&placement, &parent, false);
        assert_eq!(pos, Vector4::xy(-25.0, 15.0));
    }

    #[test]
    fn test_root_uses_own_pivot_only() {
        let size = Vector4::xy(100.0, 60.0);
        let parent = frame(Pivot::NW, 999.0, 999.0);

        let centre = resolve_position(&Placement::new(300.0, 200.0, size, Pivot::Center), &parent, true);
        assert_eq!(centre, Vector4::ZERO);

        let sw = resolve_position(&Placement::new(300.0, 200.0, size, Pivot::SW), &parent, true);
        assert_eq!(sw, Vector4::xy(-50.0, -30.0));
    }

    #[test]
    fn test_missing_inputs_default_to_zero() {
        let placement = Placement::new(f64::NAN, f64::INFINITY, Vector4::xy(10.0, 10.0), Pivot::Center);
        let pos = resolve_position(&placement, &frame(Pivot::Center, 10.0, 10.0), false);
        assert_eq!(pos, Vector4::ZERO);
    }

    #[test]
    fn test_text_scale_and_size() {
        assert_eq!(text_scale(20.0, 40.0), 0.5);
        assert_eq!(text_scale(0.0, 40.0), 1.0);
        assert_eq!(resolve_text_scale(60.0, 40.0), Vector4::new(1.5, 1.5, 1.5, 1.0));
        assert_eq!(resolve_text_size(Vector4::xy(100.0, 20.0), 0.5), Vector4::xy(200.0, 40.0));
    }

    #[test]
    fn test_rotation_goes_to_z() {
        assert_eq!(resolve_rotation(45.0), Vector4::new(0.0, 0.0, 45.0, 0.0));
    }
}
