//! Signed grid coordinates packed into sortable 64-bit keys.
//!
//! The [`key`] module packs `(x, y, z)` into an `i64` whose layout is fixed
//! for storage and transmission. [`Position`] and [`TilePoint`] are the
//! mutable values keys are derived from, and [`TileTable`] is a sparse grid
//! that stores cells under their 2D key.
//!
//! # Example
//!
//! ```
//! use coords::{key, Position, TilePoint, TileTable};
//!
//! let position = Position::new(-50, -256, 13).unwrap();
//! assert_eq!(key::decode(position.key()), (-50, -256, 13));
//! assert!(Position::new(0, 0, -1).is_err());
//!
//! let mut table = TileTable::new();
//! table.get_or_insert(4, -2).set_layer(0, "grass");
//! assert_eq!(table.get(4, -2).and_then(|p| p.layer(0)), Some(&"grass"));
//! # let _ = TilePoint::<()>::new(0, 0);
//! ```

mod error;
pub mod key;
mod position;
mod table;
mod tile;

pub use error::{Axis, CoordError, CoordResult};
pub use key::{decode, encode, encode_2d, encode_checked};
pub use position::Position;
pub use table::{Iter, TileTable};
pub use tile::TilePoint;
