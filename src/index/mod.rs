mod chain;

pub use chain::{build_chains, MonotoneChain};

use rstar::{RTree, RTreeObject, AABB};

use crate::math::Envelope;

#[derive(Debug)]
struct IndexedItem<T> {
    bounds: AABB<[f64; 2]>,
    item: T,
}

impl<T> RTreeObject for IndexedItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

/// Spatial index associating envelopes with items, backed by an R*-tree.
///
/// Queries return every item whose envelope intersects the query envelope
/// (closed boxes, so touching counts).
#[derive(Debug)]
pub struct EnvelopeIndex<T> {
    tree: RTree<IndexedItem<T>>,
}

impl<T> Default for EnvelopeIndex<T> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<T> EnvelopeIndex<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a packed index from all items at once.
    #[must_use]
    pub fn bulk_load(items: Vec<(Envelope, T)>) -> Self {
        let items = items
            .into_iter()
            .map(|(env, item)| IndexedItem {
                bounds: env.to_aabb(),
                item,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn insert(&mut self, env: &Envelope, item: T) {
        self.tree.insert(IndexedItem {
            bounds: env.to_aabb(),
            item,
        });
    }

    /// Items whose envelopes intersect `env`.
    #[must_use]
    pub fn query(&self, env: &Envelope) -> Vec<&T> {
        if env.is_null() {
            return Vec::new();
        }
        self.tree
            .locate_in_envelope_intersecting(&env.to_aabb())
            .map(|entry| &entry.item)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Coordinate;

    fn env(x0: f64, y0: f64, x1: f64, y1: f64) -> Envelope {
        Envelope::from_points(&Coordinate::new(x0, y0), &Coordinate::new(x1, y1))
    }

    #[test]
    fn query_returns_intersecting_items() {
        let index = EnvelopeIndex::bulk_load(vec![
            (env(0.0, 0.0, 1.0, 1.0), "a"),
            (env(1.0, 1.0, 2.0, 2.0), "b"),
            (env(5.0, 5.0, 6.0, 6.0), "c"),
        ]);
        let mut hits: Vec<_> = index.query(&env(0.5, 0.5, 1.0, 1.0)).into_iter().copied().collect();
        hits.sort_unstable();
        assert_eq!(hits, vec!["a", "b"]);
        assert!(index.query(&env(3.0, 3.0, 4.0, 4.0)).is_empty());
        assert!(index.query(&Envelope::null()).is_empty());
    }

    #[test]
    fn incremental_insert() {
        let mut index = EnvelopeIndex::new();
        assert!(index.is_empty());
        index.insert(&env(0.0, 0.0, 10.0, 10.0), 1);
        index.insert(&env(20.0, 0.0, 30.0, 10.0), 2);
        assert_eq!(index.len(), 2);
        assert_eq!(index.query(&env(25.0, 5.0, 25.0, 5.0)), vec![&2]);
    }
}
