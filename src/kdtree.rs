use std::cmp::Ordering;

use indexmap::IndexMap;
use nalgebra::point;
use tracing::{debug, trace};

use crate::{
    util::{distance, Axis, TieBreak},
    Point, P2,
};

/// A 2D k-d tree answering "which stored point is closest to this location?"
///
/// The tree is balanced when built with [`KdTree::build`]. Inserts descend a
/// single path and never rebalance, so a long run of inserts can degrade
/// queries toward a linear scan; [`KdTree::rebuild`] restores the balance.
/// Removal rebuilds the whole tree from the registry.
#[derive(Debug)]
pub struct KdTree<T> {
    root: Option<Box<Node<T>>>,
    registry: IndexMap<String, T>,
    tie_break: TieBreak,
}

impl<T> Default for KdTree<T> {
    fn default() -> Self {
        Self {
            root: None,
            registry: IndexMap::new(),
            tie_break: TieBreak::default(),
        }
    }
}

impl<T: Point + Clone> KdTree<T> {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty tree resolving equidistant matches with `tie_break`
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            ..Self::default()
        }
    }

    /// Create a tree and [`build`](Self::build) it from `points`
    pub fn from_points(points: impl IntoIterator<Item = T>) -> Self {
        let mut tree = Self::new();
        tree.build(points);
        tree
    }

    /// Replace the contents of the tree with `points`.
    ///
    /// When several points share an id the last one wins.
    pub fn build(&mut self, points: impl IntoIterator<Item = T>) {
        self.registry.clear();
        for item in points {
            self.registry.insert(item.id().to_owned(), item);
        }
        self.rebuild();
    }

    /// Rebuild the tree from the registered points, restoring construction-time balance
    pub fn rebuild(&mut self) {
        let items = self.registry.values().cloned().collect::<Vec<_>>();
        self.root = Node::build(items, Axis::X);
        debug!(
            points = self.registry.len(),
            depth = self.depth(),
            "rebuilt k-d tree"
        );
    }

    /// Insert a point into the tree
    ///
    /// A point whose id is already registered replaces the old one, and the
    /// tree is rebuilt so the old position can no longer match a query.
    pub fn insert(&mut self, item: T) {
        let id = item.id().to_owned();
        if let Some(existing) = self.registry.get_mut(&id) {
            trace!(%id, "replacing registered point");
            *existing = item;
            self.rebuild();
            return;
        }

        trace!(%id, "inserting point");
        self.registry.insert(id, item.clone());
        match &mut self.root {
            Some(root) => root.insert(item, Axis::X),
            None => self.root = Some(Box::new(Node::leaf(item))),
        }
    }

    /// Remove the point with `id`
    ///
    /// **Returns** `false` if no such point is registered
    pub fn remove(&mut self, id: &str) -> bool {
        if self.registry.shift_remove(id).is_none() {
            return false;
        }
        debug!(%id, "removed point");
        self.rebuild();
        true
    }

    /// Find the stored point closest to `(x, y)`
    pub fn find_nearest(&self, x: f64, y: f64) -> Option<&T> {
        self.find_nearest_with_distance(x, y).map(|(item, _)| item)
    }

    /// Find the stored point closest to `(x, y)` along with its distance
    pub fn find_nearest_with_distance(&self, x: f64, y: f64) -> Option<(&T, f64)> {
        let root = self.root.as_ref()?;
        let target = point![x, y];
        let mut best = None;
        root.nearest(&target, Axis::X, self.tie_break, &mut best);
        best.map(|nearest| (nearest.item, nearest.distance))
    }

    /// Get the registered point with `id`
    pub fn get(&self, id: &str) -> Option<&T> {
        self.registry.get(id)
    }

    /// Check if a point with `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains_key(id)
    }

    /// Iterate over the registered points in registration order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.registry.values()
    }

    /// Drop every point
    pub fn clear(&mut self) {
        self.registry.clear();
        self.root = None;
    }
}

impl<T> KdTree<T> {
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Number of levels in the tree, 0 when empty
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }
}

impl<T> Node<T> {
    fn depth(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |n| n.depth());
        let right = self.right.as_ref().map_or(0, |n| n.depth());
        1 + left.max(right)
    }
}

/// Best candidate seen so far during a nearest-neighbor search
struct Nearest<'a, T> {
    item: &'a T,
    distance: f64,
}

#[derive(Debug)]
struct Node<T> {
    item: T,
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
}

impl<T: Point> Node<T> {
    fn leaf(item: T) -> Self {
        Self {
            item,
            left: None,
            right: None,
        }
    }

    /// Build a subtree splitting `items` on their median along `axis`
    fn build(mut items: Vec<T>, axis: Axis) -> Option<Box<Self>> {
        if items.is_empty() {
            return None;
        }

        // -0.0 and 0.0 compare equal so the stable sort keeps their input order
        items.sort_by(|a, b| {
            axis.coord(&a.point())
                .partial_cmp(&axis.coord(&b.point()))
                .unwrap_or(Ordering::Equal)
        });
        let median = items.len() / 2;
        let right = items.split_off(median + 1);
        let item = items.pop()?;

        Some(Box::new(Self {
            item,
            left: Self::build(items, axis.next()),
            right: Self::build(right, axis.next()),
        }))
    }

    fn insert(&mut self, item: T, axis: Axis) {
        let child = if axis.coord(&item.point()) < axis.coord(&self.item.point()) {
            &mut self.left
        } else {
            &mut self.right
        };

        match child {
            Some(node) => node.insert(item, axis.next()),
            None => *child = Some(Box::new(Self::leaf(item))),
        }
    }

    fn nearest<'a>(
        &'a self,
        target: &P2,
        axis: Axis,
        tie_break: TieBreak,
        best: &mut Option<Nearest<'a, T>>,
    ) {
        let position = self.item.point();
        let distance = distance(&position, target);
        let replace = match best {
            Some(current) => tie_break.prefers(
                self.item.id(),
                distance,
                current.item.id(),
                current.distance,
            ),
            None => true,
        };
        if replace {
            *best = Some(Nearest {
                item: &self.item,
                distance,
            });
        }

        let offset = axis.coord(target) - axis.coord(&position);
        let (near, far) = if offset < 0.0 {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        if let Some(node) = near {
            node.nearest(target, axis.next(), tie_break, best);
        }

        let best_distance = best.as_ref().map_or(f64::INFINITY, |b| b.distance);
        if tie_break.visits_far(offset.abs(), best_distance) {
            if let Some(node) = far {
                node.nearest(target, axis.next(), tie_break, best);
            }
        }
    }

    /// Collect the ids of every point in this subtree
    #[cfg(test)]
    fn collect_ids(&self, ids: &mut Vec<String>) {
        ids.push(self.item.id().to_owned());
        for child in [&self.left, &self.right].into_iter().flatten() {
            child.collect_ids(ids);
        }
    }
}
