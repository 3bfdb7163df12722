use nalgebra as na;

use crate::P2;

/// Coordinate dimension used to split points at a given tree depth
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Axis used one level further down the tree
    pub fn next(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Coordinate of `point` along this axis
    pub fn coord(self, point: &P2) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }
}

/// Which point a nearest-neighbor query returns when several are equally close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TieBreak {
    /// The point visited first during traversal wins
    #[default]
    FirstFound,
    /// The point with the lexicographically smallest id wins
    LowestId,
}

impl TieBreak {
    /// Should a candidate at `distance` replace the incumbent?
    pub(crate) fn prefers(
        self,
        candidate_id: &str,
        distance: f64,
        best_id: &str,
        best_distance: f64,
    ) -> bool {
        match self {
            Self::FirstFound => distance < best_distance,
            Self::LowestId => {
                distance < best_distance || (distance == best_distance && candidate_id < best_id)
            }
        }
    }

    /// Could the far side of a split `axis_distance` away still hold the answer?
    pub(crate) fn visits_far(self, axis_distance: f64, best_distance: f64) -> bool {
        match self {
            Self::FirstFound => axis_distance < best_distance,
            Self::LowestId => axis_distance <= best_distance,
        }
    }
}

pub(crate) fn distance(a: &P2, b: &P2) -> f64 {
    na::distance(a, b)
}

#[cfg(test)]
pub(crate) mod tests {
    use nalgebra::point;

    use crate::{Marker, Point};

    use super::*;

    pub(crate) fn make_marker(id: &str, x: f64, y: f64) -> Marker {
        Marker::new(id, x, y)
    }

    /// Smallest distance from `(x, y)` to any of `points`, by linear scan
    pub(crate) fn brute_force_distance<T: Point>(points: &[T], x: f64, y: f64) -> Option<f64> {
        let target = point![x, y];
        points
            .iter()
            .map(|p| distance(&p.point(), &target))
            .min_by(f64::total_cmp)
    }

    #[test]
    fn axis_alternates_by_depth() {
        let axes = std::iter::successors(Some(Axis::X), |a| Some(a.next()))
            .take(4)
            .collect::<Vec<_>>();
        assert_eq!(
            axes,
            [Axis::X, Axis::Y, Axis::X, Axis::Y],
            "Even depths should split on x, odd depths on y"
        );
        assert_eq!(Axis::X.next(), Axis::Y, "x should be followed by y");
        assert_eq!(Axis::Y.next(), Axis::X, "y should be followed by x");
    }

    #[test]
    fn axis_coord() {
        let p = point![3.0, -4.0];
        assert_eq!(Axis::X.coord(&p), 3.0);
        assert_eq!(Axis::Y.coord(&p), -4.0);
    }

    #[test]
    fn first_found_keeps_incumbent_on_tie() {
        let policy = TieBreak::FirstFound;
        assert!(policy.prefers("b", 1.0, "a", 2.0), "Closer point should win");
        assert!(
            !policy.prefers("a", 2.0, "b", 2.0),
            "Equal distance should keep the incumbent"
        );
        assert!(
            !policy.visits_far(2.0, 2.0),
            "Far side at exactly the best distance cannot hold a strictly closer point"
        );
    }

    #[test]
    fn lowest_id_prefers_smaller_id_on_tie() {
        let policy = TieBreak::LowestId;
        assert!(policy.prefers("a", 2.0, "b", 2.0), "Smaller id should win a tie");
        assert!(!policy.prefers("c", 2.0, "b", 2.0), "Larger id should lose a tie");
        assert!(!policy.prefers("a", 3.0, "b", 2.0), "Farther point never wins");
        assert!(
            policy.visits_far(2.0, 2.0),
            "Far side at exactly the best distance may hold a tied point"
        );
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(&point![0.0, 0.0], &point![3.0, 4.0]), 5.0);
    }
}
