//! A two-dimensional k-d tree for mapping a clicked location to the closest
//! labeled point on a coordinate plane.
//!
//! The index is a query accelerator that mirrors a point list owned elsewhere:
//! build it from the full collection, then [`KdTree::insert`] and
//! [`KdTree::remove`] as the collection changes.
//!
//! ```
//! use kdpick::{KdTree, Marker};
//!
//! let mut tree = KdTree::from_points([
//!     Marker::new("a", 0.0, 0.0),
//!     Marker::new("b", 10.0, 0.0),
//!     Marker::new("c", 0.0, 10.0),
//! ]);
//! assert_eq!(tree.find_nearest(1.0, 1.0).map(|m| m.id()), Some("a"));
//!
//! assert!(tree.remove("a"));
//! assert_eq!(tree.find_nearest(1.0, 1.0).map(|m| m.id()), Some("b"));
//! ```

use nalgebra::Point2;

mod kdtree;
mod marker;
mod util;

pub use kdtree::KdTree;
pub use marker::{Marker, MarkerError};
pub use util::TieBreak;

/// 2D point with `f64` coordinates
pub type P2 = Point2<f64>;

/// Trait for data stored in the [`KdTree`]: a unique id and a 2d position
pub trait Point {
    /// Unique identity of the item
    fn id(&self) -> &str;
    /// Get 2d point position
    fn point(&self) -> P2;
}
