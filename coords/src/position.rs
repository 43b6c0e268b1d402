//! Addressable 3D position with a non-negative Z.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use crate::error::{CoordError, CoordResult};
use crate::key;

/// A location on the grid.
///
/// `x` and `y` are free; `z` only changes through [`set_z`](Self::set_z),
/// which rejects negative values. Equality and hashing look at `x` and `y`
/// only, so positions on different Z levels of the same cell compare equal.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PositionFields"))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    z: i32,
}

impl Position {
    /// Creates a position.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::NegativeZ`] if `z < 0`.
    pub fn new(x: i32, y: i32, z: i32) -> CoordResult<Self> {
        let mut position = Self::flat(x, y);
        position.set_z(z)?;
        Ok(position)
    }

    /// Creates a position on Z level 0.
    #[must_use]
    pub const fn flat(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Rebuilds a position from a key produced by [`key`](Self::key).
    #[must_use]
    pub fn from_key(key: i64) -> Self {
        let (x, y, z) = key::decode(key);
        // decoded z comes from an unsigned 17-bit field
        Self { x, y, z }
    }

    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Sets Z.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::NegativeZ`] if `z < 0`; the position is unchanged.
    pub fn set_z(&mut self, z: i32) -> CoordResult<()> {
        if z < 0 {
            return Err(CoordError::NegativeZ { value: z });
        }
        self.z = z;
        Ok(())
    }

    /// Packed key for this position, see [`key::encode`].
    #[must_use]
    pub fn key(&self) -> i64 {
        key::pack(self.x, self.y, self.z)
    }

    /// Returns `true` if every axis differs from `other` by at most its delta.
    #[must_use]
    pub fn in_range(&self, other: &Self, dx: i32, dy: i32, dz: i32) -> bool {
        let within =
            |a: i32, b: i32, delta: i32| (i64::from(a) - i64::from(b)).abs() <= i64::from(delta);
        within(self.x, other.x, dx)
            && within(self.y, other.y, dy)
            && within(self.z, other.z, dz)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

/// Adds X and Y; the result sits on Z level 0.
impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::flat(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

/// Subtracts X and Y; the result sits on Z level 0.
impl Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::flat(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PositionFields {
    x: i32,
    y: i32,
    #[serde(default)]
    z: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<PositionFields> for Position {
    type Error = CoordError;

    fn try_from(fields: PositionFields) -> CoordResult<Self> {
        Self::new(fields.x, fields.y, fields.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz(p: &Position) -> (i32, i32, i32) {
        (p.x, p.y, p.z())
    }

    #[test]
    fn negative_z_rejected() {
        assert_eq!(
            Position::new(1, 2, -1).unwrap_err(),
            CoordError::NegativeZ { value: -1 }
        );

        let mut position = Position::default();
        assert!(position.set_z(-1).is_err());
        assert_eq!(position.z(), 0);
        position.set_z(4).unwrap();
        assert_eq!(position.z(), 4);
    }

    #[test]
    fn key_roundtrip() {
        for (x, y, z) in [(6543, 5432, 1234), (11, 22, 35), (-50, -256, 13)] {
            let position = Position::new(x, y, z).unwrap();
            let restored = Position::from_key(position.key());
            assert_eq!(xyz(&restored), (x, y, z));
        }
    }

    #[test]
    fn key_matches_codec() {
        let position = Position::new(-3, 9, 2).unwrap();
        assert_eq!(position.key(), key::encode(-3, 9, 2).unwrap());
        assert_eq!(Position::flat(-3, 9).key(), key::encode_2d(-3, 9));
    }

    #[test]
    fn equality_ignores_z() {
        let a = Position::new(1, 2, 3).unwrap();
        let b = Position::new(1, 2, 7).unwrap();
        let c = Position::new(2, 1, 3).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn add_and_sub_drop_z() {
        let a = Position::new(5, -2, 9).unwrap();
        let b = Position::new(1, 3, 4).unwrap();
        assert_eq!(xyz(&(a + b)), (6, 1, 0));
        assert_eq!(xyz(&(a - b)), (4, -5, 0));
    }

    #[test]
    fn in_range_checks_each_axis() {
        let a = Position::new(0, 0, 0).unwrap();
        let b = Position::new(2, -3, 1).unwrap();
        assert!(a.in_range(&b, 2, 3, 1));
        assert!(!a.in_range(&b, 1, 3, 1));
        assert!(!a.in_range(&b, 2, 2, 1));
        assert!(!a.in_range(&b, 2, 3, 0));
    }

    #[test]
    fn in_range_does_not_overflow() {
        let a = Position::flat(i32::MIN, 0);
        let b = Position::flat(i32::MAX, 0);
        assert!(!a.in_range(&b, i32::MAX, 0, 0));
    }

    #[test]
    fn display_format() {
        let position = Position::new(-4, 5, 6).unwrap();
        assert_eq!(position.to_string(), "-4,5,6");
    }
}
