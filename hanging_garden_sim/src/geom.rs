// 2D geometry kernel.
//
// `Vec2` is the workhorse: positions, velocities, and forces are all plain
// f32 pairs with value semantics. Also provides angle helpers (the plant
// growth code works in radians throughout, y-up, angles measured
// counterclockwise from +x), segment projection for the pathway force field,
// and OKLCH color interpolation for the day-cycle palette.
//
// See also: `forces.rs` for the main consumer of `project_onto_segment`,
// `growth.rs` for the angle-gap arithmetic built on `wrap_angle`.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D vector / point. Copy-semantics value type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector at the given angle (radians, counterclockwise from +x).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length. The zero vector stays zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// The angle of this vector in radians. Zero vector returns 0.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotate counterclockwise by `angle` radians.
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Perpendicular vector (90° counterclockwise).
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Clamp the length to at most `max`. Shorter vectors pass through.
    pub fn clamp_length(self, max: f32) -> Self {
        let len = self.length();
        if len > max { self * (max / len) } else { self }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Angle helpers
// ---------------------------------------------------------------------------

/// Wrap an angle into (-PI, PI].
pub fn wrap_angle(mut a: f32) -> f32 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Signed smallest difference `a - b`, wrapped into (-PI, PI].
pub fn angle_diff(a: f32, b: f32) -> f32 {
    wrap_angle(a - b)
}

// ---------------------------------------------------------------------------
// Segment projection
// ---------------------------------------------------------------------------

/// Result of projecting a point onto a line segment.
#[derive(Clone, Copy, Debug)]
pub struct SegmentProjection {
    /// Closest point on the segment.
    pub point: Vec2,
    /// Parametric position along the segment, clamped to [0, 1].
    pub t: f32,
    /// Distance from the query point to `point`.
    pub distance: f32,
}

/// Project `p` onto the segment `a`–`b`.
///
/// Degenerate segments (`a == b`) project everything onto `a` with `t = 0`.
pub fn project_onto_segment(p: Vec2, a: Vec2, b: Vec2) -> SegmentProjection {
    let ab = b - a;
    let len_sq = ab.length_sq();
    let t = if len_sq > f32::EPSILON {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let point = a + ab * t;
    SegmentProjection {
        point,
        t,
        distance: p.distance(point),
    }
}

// ---------------------------------------------------------------------------
// OKLCH color
// ---------------------------------------------------------------------------

/// A color in OKLCH: perceptual lightness, chroma, hue (degrees).
///
/// Used by the day-cycle palette. Interpolation takes the shortest arc
/// around the hue circle, so dusk oranges blend into night blues without
/// sweeping through green.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oklch {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

impl Oklch {
    pub const fn new(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h }
    }

    /// Interpolate toward `other`. Hue takes the shortest arc; the result
    /// hue is normalized into [0, 360).
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let mut dh = (other.h - self.h) % 360.0;
        if dh > 180.0 {
            dh -= 360.0;
        } else if dh < -180.0 {
            dh += 360.0;
        }
        Self {
            l: self.l + (other.l - self.l) * t,
            c: self.c + (other.c - self.c) * t,
            h: (self.h + dh * t).rem_euclid(360.0),
        }
    }
}
