//! Packing of signed coordinates into a single `i64` key.
//!
//! ```text
//!  63      51 50       35  34  33       18  17  16        0
//! | unused  | |x| (16)  | sx | |y| (16)  | sy | z (17)    |
//! ```
//!
//! Signs are stored as flags next to each magnitude, so the layout is stable
//! for persisted and transmitted keys. Magnitudes that do not fit their
//! field are truncated; use [`encode_checked`] to reject them instead.

use crate::error::{Axis, CoordError, CoordResult};

/// Width of the Z field.
pub const Z_BITS: u32 = 17;
/// Width of the X and Y magnitude fields.
pub const MAGNITUDE_BITS: u32 = 16;

/// Bit index of the Y sign flag.
pub const Y_SIGN_SHIFT: u32 = Z_BITS;
/// Lowest bit of the Y magnitude.
pub const Y_SHIFT: u32 = Y_SIGN_SHIFT + 1;
/// Bit index of the X sign flag.
pub const X_SIGN_SHIFT: u32 = Y_SHIFT + MAGNITUDE_BITS;
/// Lowest bit of the X magnitude.
pub const X_SHIFT: u32 = X_SIGN_SHIFT + 1;

/// Mask of the Z field.
pub const Z_MASK: i64 = (1 << Z_BITS) - 1;
/// Mask of an X or Y magnitude.
pub const MAGNITUDE_MASK: i64 = (1 << MAGNITUDE_BITS) - 1;

/// Largest X or Y magnitude that survives a round trip.
pub const MAX_XY_MAGNITUDE: i32 = MAGNITUDE_MASK as i32;
/// Largest Z that survives a round trip.
pub const MAX_Z: i32 = Z_MASK as i32;

/// Packs `(x, y, z)` into a key.
///
/// # Errors
///
/// Returns [`CoordError::NegativeZ`] if `z < 0`.
pub fn encode(x: i32, y: i32, z: i32) -> CoordResult<i64> {
    if z < 0 {
        return Err(CoordError::NegativeZ { value: z });
    }
    Ok(pack(x, y, z))
}

/// Packs `(x, y)` with `z = 0`. Same bits as `encode(x, y, 0)`.
#[must_use]
pub fn encode_2d(x: i32, y: i32) -> i64 {
    pack(x, y, 0)
}

/// Like [`encode`], but rejects components that would be truncated.
///
/// # Errors
///
/// Returns [`CoordError::NegativeZ`] if `z < 0`, or
/// [`CoordError::OutOfRange`] if a component exceeds its field.
pub fn encode_checked(x: i32, y: i32, z: i32) -> CoordResult<i64> {
    if z < 0 {
        return Err(CoordError::NegativeZ { value: z });
    }
    if z > MAX_Z {
        return Err(CoordError::OutOfRange {
            axis: Axis::Z,
            value: z,
            max: MAX_Z,
        });
    }
    for (axis, value) in [(Axis::X, x), (Axis::Y, y)] {
        if i64::from(value).abs() > i64::from(MAX_XY_MAGNITUDE) {
            return Err(CoordError::OutOfRange {
                axis,
                value,
                max: MAX_XY_MAGNITUDE,
            });
        }
    }
    Ok(pack(x, y, z))
}

/// Unpacks a key into `(x, y, z)`.
#[must_use]
pub fn decode(key: i64) -> (i32, i32, i32) {
    let z = (key & Z_MASK) as i32;
    let y = unpack_signed(key, Y_SIGN_SHIFT, Y_SHIFT);
    let x = unpack_signed(key, X_SIGN_SHIFT, X_SHIFT);
    (x, y, z)
}

/// Shared packing routine; `z` must already be non-negative.
pub(crate) fn pack(x: i32, y: i32, z: i32) -> i64 {
    pack_signed(x, X_SIGN_SHIFT, X_SHIFT)
        | pack_signed(y, Y_SIGN_SHIFT, Y_SHIFT)
        | (i64::from(z) & Z_MASK)
}

fn pack_signed(value: i32, sign_shift: u32, shift: u32) -> i64 {
    let value = i64::from(value);
    if value < 0 {
        // !(v - 1) == -v for every negative i32 widened to i64
        (1 << sign_shift) | ((!(value - 1) & MAGNITUDE_MASK) << shift)
    } else {
        (value & MAGNITUDE_MASK) << shift
    }
}

fn unpack_signed(key: i64, sign_shift: u32, shift: u32) -> i32 {
    let magnitude = ((key >> shift) & MAGNITUDE_MASK) as i32;
    if (key >> sign_shift) & 1 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_constants() {
        assert_eq!(Y_SIGN_SHIFT, 17);
        assert_eq!(Y_SHIFT, 18);
        assert_eq!(X_SIGN_SHIFT, 34);
        assert_eq!(X_SHIFT, 35);
        assert_eq!(MAX_XY_MAGNITUDE, 65535);
        assert_eq!(MAX_Z, 131_071);
    }

    #[test]
    fn known_examples_roundtrip() {
        for (x, y, z) in [(11, 22, 35), (-50, -256, 13), (6543, 5432, 1234)] {
            let key = encode(x, y, z).unwrap();
            assert_eq!(decode(key), (x, y, z));
        }
    }

    #[test]
    fn field_placement() {
        assert_eq!(encode(0, 0, 1).unwrap(), 1);
        assert_eq!(encode(0, 1, 0).unwrap(), 1 << 18);
        assert_eq!(encode(0, -1, 0).unwrap(), (1 << 17) | (1 << 18));
        assert_eq!(encode(1, 0, 0).unwrap(), 1 << 35);
        assert_eq!(encode(-1, 0, 0).unwrap(), (1 << 34) | (1 << 35));
    }

    #[test]
    fn extremes_roundtrip() {
        let cases = [
            (MAX_XY_MAGNITUDE, MAX_XY_MAGNITUDE, MAX_Z),
            (-MAX_XY_MAGNITUDE, -MAX_XY_MAGNITUDE, 0),
            (0, 0, 0),
            (-1, 1, 1),
        ];
        for (x, y, z) in cases {
            assert_eq!(decode(encode(x, y, z).unwrap()), (x, y, z));
        }
    }

    #[test]
    fn high_bits_stay_clear() {
        let key = encode(-MAX_XY_MAGNITUDE, -MAX_XY_MAGNITUDE, MAX_Z).unwrap();
        assert!(key > 0);
        assert_eq!(key >> 51, 0);
    }

    #[test]
    fn negative_z_rejected() {
        assert_eq!(encode(0, 0, -1), Err(CoordError::NegativeZ { value: -1 }));
        assert_eq!(
            encode_checked(0, 0, -1),
            Err(CoordError::NegativeZ { value: -1 })
        );
    }

    #[test]
    fn encode_2d_matches_encode() {
        for (x, y) in [(0, 0), (5, -5), (-65535, 65535), (123, 456)] {
            assert_eq!(encode_2d(x, y), encode(x, y, 0).unwrap());
        }
    }

    #[test]
    fn out_of_range_truncates() {
        let (x, y, z) = decode(encode(65536 + 3, -(65536 + 4), MAX_Z + 1 + 5).unwrap());
        assert_eq!((x, y, z), (3, -4, 5));
    }

    #[test]
    fn extreme_i32_does_not_overflow() {
        let key = encode(i32::MIN, i32::MAX, 0).unwrap();
        assert_eq!(key >> 51, 0);
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert_eq!(
            encode_checked(65536, 0, 0),
            Err(CoordError::OutOfRange {
                axis: Axis::X,
                value: 65536,
                max: MAX_XY_MAGNITUDE,
            })
        );
        assert_eq!(
            encode_checked(0, -65536, 0),
            Err(CoordError::OutOfRange {
                axis: Axis::Y,
                value: -65536,
                max: MAX_XY_MAGNITUDE,
            })
        );
        assert!(matches!(
            encode_checked(0, 0, MAX_Z + 1),
            Err(CoordError::OutOfRange { axis: Axis::Z, .. })
        ));
        assert_eq!(encode_checked(-7, 8, 9), encode(-7, 8, 9));
    }
}
