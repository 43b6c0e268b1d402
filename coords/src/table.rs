//! Sparse tile table keyed by packed 2D coordinates.

use std::collections::btree_map::{self, BTreeMap};

use crate::key;
use crate::tile::TilePoint;

/// Sparse map of grid cells.
///
/// Cells are stored under [`key::encode_2d`] of their coordinates and iterate
/// in ascending key order, so two tables with the same contents always yield
/// cells in the same sequence. Coordinates beyond the key range alias other
/// cells; keep them within `±MAX_XY_MAGNITUDE`.
///
/// The table does no locking. Share it behind a lock when several threads
/// need it.
#[derive(Debug, Clone)]
pub struct TileTable<L> {
    points: BTreeMap<i64, TilePoint<L>>,
}

impl<L> TileTable<L> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Stores `point`, replacing and returning any cell at the same
    /// coordinates.
    pub fn insert(&mut self, point: TilePoint<L>) -> Option<TilePoint<L>> {
        self.points.insert(point.key(), point)
    }

    pub fn remove(&mut self, x: i32, y: i32) -> Option<TilePoint<L>> {
        self.points.remove(&key::encode_2d(x, y))
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&TilePoint<L>> {
        self.points.get(&key::encode_2d(x, y))
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut TilePoint<L>> {
        self.points.get_mut(&key::encode_2d(x, y))
    }

    /// Returns the cell at `(x, y)`, inserting an empty one if missing.
    pub fn get_or_insert(&mut self, x: i32, y: i32) -> &mut TilePoint<L> {
        self.points
            .entry(key::encode_2d(x, y))
            .or_insert_with(|| TilePoint::new(x, y))
    }

    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.points.contains_key(&key::encode_2d(x, y))
    }

    /// Moves every cell of `other` into this table; cells from `other` win.
    pub fn merge(&mut self, other: Self) {
        self.points.extend(other.points);
    }

    /// Cells in ascending key order.
    pub fn iter(&self) -> Iter<'_, L> {
        Iter {
            inner: self.points.values(),
        }
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.points.keys().copied()
    }
}

impl<L> Default for TileTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Extend<TilePoint<L>> for TileTable<L> {
    fn extend<I: IntoIterator<Item = TilePoint<L>>>(&mut self, iter: I) {
        for point in iter {
            self.insert(point);
        }
    }
}

impl<L> FromIterator<TilePoint<L>> for TileTable<L> {
    fn from_iter<I: IntoIterator<Item = TilePoint<L>>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

/// Iterator over the cells of a [`TileTable`] in key order.
#[derive(Debug, Clone)]
pub struct Iter<'a, L> {
    inner: btree_map::Values<'a, i64, TilePoint<L>>,
}

impl<'a, L> Iterator for Iter<'a, L> {
    type Item = &'a TilePoint<L>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<L> DoubleEndedIterator for Iter<'_, L> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<L> ExactSizeIterator for Iter<'_, L> {}

impl<'a, L> IntoIterator for &'a TileTable<L> {
    type Item = &'a TilePoint<L>;
    type IntoIter = Iter<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
