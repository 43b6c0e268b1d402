//! Grid cell with ordered layers.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::key;

/// A 2D grid cell owning layers keyed by an integer index.
///
/// Layers iterate in ascending index order. Equality and hashing look at the
/// coordinates only. Coordinates are fixed at construction, so a cell stored
/// in a [`TileTable`](crate::TileTable) always matches its key.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePoint<L> {
    x: i32,
    y: i32,
    layers: BTreeMap<i32, L>,
}

impl<L> TilePoint<L> {
    /// Creates a cell with no layers.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            layers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Table key of this cell.
    #[must_use]
    pub fn key(&self) -> i64 {
        key::encode_2d(self.x, self.y)
    }

    #[must_use]
    pub fn layer(&self, index: i32) -> Option<&L> {
        self.layers.get(&index)
    }

    pub fn layer_mut(&mut self, index: i32) -> Option<&mut L> {
        self.layers.get_mut(&index)
    }

    /// Returns the layer at `index`, creating it with `create` if missing.
    pub fn layer_or_insert_with(&mut self, index: i32, create: impl FnOnce() -> L) -> &mut L {
        self.layers.entry(index).or_insert_with(create)
    }

    /// Adds or replaces a layer, returning the previous one.
    pub fn set_layer(&mut self, index: i32, layer: L) -> Option<L> {
        self.layers.insert(index, layer)
    }

    #[must_use]
    pub fn has_layer(&self, index: i32) -> bool {
        self.layers.contains_key(&index)
    }

    pub fn remove_layer(&mut self, index: i32) -> Option<L> {
        self.layers.remove(&index)
    }

    /// Layers in ascending index order.
    pub fn layers(&self) -> impl Iterator<Item = (i32, &L)> + '_ {
        self.layers.iter().map(|(index, layer)| (*index, layer))
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// An empty cell at `a - b`.
    #[must_use]
    pub fn difference<M, N>(a: &TilePoint<M>, b: &TilePoint<N>) -> Self {
        Self::new(a.x.wrapping_sub(b.x), a.y.wrapping_sub(b.y))
    }
}

impl<L> PartialEq for TilePoint<L> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<L> Eq for TilePoint<L> {}

impl<L> Hash for TilePoint<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl<L> fmt::Display for TilePoint<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X = {}, Y = {}", self.x, self.y)
    }
}
