use thiserror::Error;

use crate::{Point, P2};

/// Reasons a [`Marker`] can be rejected by [`Marker::try_new`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkerError {
    #[error("marker id must not be empty")]
    EmptyId,
    #[error("marker `{id}` has a non-finite position ({x}, {y})")]
    NonFinite { id: String, x: f64, y: f64 },
}

/// A labeled location on the plane.
///
/// `extra` carries whatever the caller attaches to a marker (a label, a color,
/// timestamps). The index never looks at it. With the `serde` feature the
/// payload is flattened next to `id`, `x` and `y`, so `extra` must serialize
/// as a struct or map.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker<E = ()> {
    id: String,
    x: f64,
    y: f64,
    #[cfg_attr(feature = "serde", serde(flatten))]
    extra: E,
}

impl Marker {
    /// Create a marker without extra attributes
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::with_extra(id, x, y, ())
    }
}

impl<E> Marker<E> {
    /// Create a marker carrying a caller payload
    pub fn with_extra(id: impl Into<String>, x: f64, y: f64, extra: E) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            extra,
        }
    }

    /// Create a marker, rejecting an empty id or a NaN/infinite coordinate
    ///
    /// Finite coordinates are not range checked. Distances are computed from
    /// squared differences, so two points more than about `1e154` apart on an
    /// axis measure as infinitely far and can no longer be told apart by a
    /// nearest-neighbor query.
    pub fn try_new(id: impl Into<String>, x: f64, y: f64, extra: E) -> Result<Self, MarkerError> {
        let id = id.into();
        if id.is_empty() {
            return Err(MarkerError::EmptyId);
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(MarkerError::NonFinite { id, x, y });
        }
        Ok(Self::with_extra(id, x, y, extra))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn extra(&self) -> &E {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut E {
        &mut self.extra
    }
}

impl<E> Point for Marker<E> {
    fn id(&self) -> &str {
        &self.id
    }

    fn point(&self) -> P2 {
        P2::new(self.x, self.y)
    }
}
