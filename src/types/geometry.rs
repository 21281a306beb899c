//! Vector and pivot types shared by the export pipeline.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Number of decimal places kept in exported numbers.
pub const PRECISION: i32 = 3;

/// Round a value to [`PRECISION`] decimal places, mapping non-finite input
/// and negative zero to `0.0`.
pub fn round_value(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(PRECISION);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// A four-component vector, the engine's universal value shape for
/// position, rotation, scale, size, colour and slice-9 margins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Unit scale (`w` is unused by the engine and stays at 1).
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// A planar vector with `z` and `w` at zero.
    pub const fn xy(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// A uniform scale vector.
    pub const fn uniform(s: f64) -> Self {
        Self::new(s, s, s, 1.0)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0 && self.w == 0.0
    }

    /// Component-wise rounding to the export precision.
    pub fn rounded(self) -> Self {
        Self::new(
            round_value(self.x),
            round_value(self.y),
            round_value(self.z),
            round_value(self.w),
        )
    }

    /// Compare the planar components within the export precision.
    pub fn approx_eq_xy(&self, other: &Vector4) -> bool {
        let tolerance = 0.5 * 10f64.powi(-PRECISION);
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    pub fn components(&self) -> [(&'static str, f64); 4] {
        [("x", self.x), ("y", self.y), ("z", self.z), ("w", self.w)]
    }
}

impl Add for Vector4 {
    type Output = Vector4;

    fn add(self, rhs: Vector4) -> Vector4 {
        Vector4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Vector4 {
    type Output = Vector4;

    fn sub(self, rhs: Vector4) -> Vector4 {
        Vector4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Vector4 {
    type Output = Vector4;

    fn neg(self) -> Vector4 {
        Vector4::new(-self.x, -self.y, -self.z, -self.w)
    }
}

/// One of the nine anchor positions of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pivot {
    #[default]
    #[serde(rename = "PIVOT_CENTER", alias = "center", alias = "c")]
    Center,
    #[serde(rename = "PIVOT_N", alias = "n", alias = "north")]
    N,
    #[serde(rename = "PIVOT_NE", alias = "ne", alias = "northeast")]
    NE,
    #[serde(rename = "PIVOT_E", alias = "e", alias = "east")]
    E,
    #[serde(rename = "PIVOT_SE", alias = "se", alias = "southeast")]
    SE,
    #[serde(rename = "PIVOT_S", alias = "s", alias = "south")]
    S,
    #[serde(rename = "PIVOT_SW", alias = "sw", alias = "southwest")]
    SW,
    #[serde(rename = "PIVOT_W", alias = "w", alias = "west")]
    W,
    #[serde(rename = "PIVOT_NW", alias = "nw", alias = "northwest")]
    NW,
}

impl Pivot {
    pub const ALL: [Pivot; 9] = [
        Pivot::Center,
        Pivot::N,
        Pivot::NE,
        Pivot::E,
        Pivot::SE,
        Pivot::S,
        Pivot::SW,
        Pivot::W,
        Pivot::NW,
    ];

    /// Unit direction of the pivot from the box centre in the engine's
    /// Y-up convention: east is `+x`, north is `+y`.
    pub fn direction(self) -> (f64, f64) {
        match self {
            Pivot::Center => (0.0, 0.0),
            Pivot::N => (0.0, 1.0),
            Pivot::NE => (1.0, 1.0),
            Pivot::E => (1.0, 0.0),
            Pivot::SE => (1.0, -1.0),
            Pivot::S => (0.0, -1.0),
            Pivot::SW => (-1.0, -1.0),
            Pivot::W => (-1.0, 0.0),
            Pivot::NW => (-1.0, 1.0),
        }
    }

    /// Offset of the pivot point from the centre of a box of `size`.
    pub fn offset(self, size: Vector4) -> Vector4 {
        let (dx, dy) = self.direction();
        Vector4::xy(dx * size.x / 2.0, dy * size.y / 2.0)
    }

    /// The pivot's constant name in the engine's text format.
    pub fn as_str(self) -> &'static str {
        match self {
            Pivot::Center => "PIVOT_CENTER",
            Pivot::N => "PIVOT_N",
            Pivot::NE => "PIVOT_NE",
            Pivot::E => "PIVOT_E",
            Pivot::SE => "PIVOT_SE",
            Pivot::S => "PIVOT_S",
            Pivot::SW => "PIVOT_SW",
            Pivot::W => "PIVOT_W",
            Pivot::NW => "PIVOT_NW",
        }
    }
}

impl fmt::Display for Pivot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
