//! Position-sorted connection lookup for drag-and-drop snapping.
//!
//! A [`ConnectionIndex`] keeps the connections of one kind sorted ascending
//! by y-position, which makes three queries cheap:
//!
//! - `insert` / `remove` via binary search on y,
//! - `neighbors_within_radius` for bump-apart logic,
//! - `closest_compatible` for finding the snap target during a drag.
//!
//! The outward scans short-circuit on y-distance alone, which is valid
//! because y-distance never exceeds Euclidean distance.
//!
//! The index holds non-owning `Rc` references; connections belong to their
//! blocks. Callers remove a connection before moving it and re-insert it
//! afterwards — the index does not track live movement.

use std::rc::Rc;

use tracing::trace;

use crate::connection::{Connection, ConnectionKind, Coordinate};

// ────────────────────────────────────────────────────────────────────────────
// ConnectionIndex
// ────────────────────────────────────────────────────────────────────────────

/// Result of a [`ConnectionIndex::closest_compatible`] search.
#[derive(Debug, Clone)]
pub struct ClosestResult {
    /// The best candidate found, if any qualified.
    pub connection: Option<Rc<Connection>>,
    /// The priority radius of the best candidate, or the original maximum
    /// radius when no candidate qualified.
    pub radius: f64,
}

/// The y-sorted set of all active connections of one kind.
#[derive(Debug)]
pub struct ConnectionIndex {
    kind: ConnectionKind,
    /// Sorted ascending by y at every observable point.
    connections: Vec<Rc<Connection>>,
}

impl ConnectionIndex {
    pub fn new(kind: ConnectionKind) -> Self {
        Self {
            kind,
            connections: Vec::new(),
        }
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// The indexed connections in ascending y order.
    pub fn connections(&self) -> &[Rc<Connection>] {
        &self.connections
    }

    /// First index whose y is strictly greater than `y`; equal-y entries
    /// sort before the returned position, so inserting here lands new
    /// connections after the equal-y run.
    fn search_index(&self, y: f64) -> usize {
        self.connections.partition_point(|c| c.y() <= y)
    }

    /// Whether the entry at `index` lies within `radius` of `y` measured
    /// along the y axis only.
    fn in_y_range(&self, index: usize, y: f64, radius: f64) -> bool {
        (self.connections[index].y() - y).abs() <= radius
    }

    /// Add a connection. The connection must not already be present.
    pub fn insert(&mut self, connection: Rc<Connection>) {
        debug_assert_eq!(connection.kind(), self.kind);
        debug_assert!(
            !self.connections.iter().any(|c| Rc::ptr_eq(c, &connection)),
            "connection inserted twice"
        );
        let at = self.search_index(connection.y());
        trace!(kind = ?self.kind, y = connection.y(), at, "index insert");
        self.connections.insert(at, connection);
    }

    /// Remove a connection previously inserted.
    ///
    /// # Panics
    ///
    /// Panics if the connection is not present. A missing connection means
    /// a caller violated the insert/remove protocol and the index is
    /// corrupt; this is a programming error, not a runtime condition.
    pub fn remove(&mut self, connection: &Rc<Connection>) {
        let y = connection.y();
        let band = self.search_index(y);

        // Several connections can share a y value, so scan outward from the
        // binary-search position through the exact-y run looking for the
        // identity match.
        let mut pointer_min = band;
        while pointer_min > 0 && self.connections[pointer_min - 1].y() == y {
            pointer_min -= 1;
            if Rc::ptr_eq(&self.connections[pointer_min], connection) {
                trace!(kind = ?self.kind, y, at = pointer_min, "index remove");
                self.connections.remove(pointer_min);
                return;
            }
        }
        let mut pointer_max = band;
        while pointer_max < self.connections.len() && self.connections[pointer_max].y() == y {
            if Rc::ptr_eq(&self.connections[pointer_max], connection) {
                trace!(kind = ?self.kind, y, at = pointer_max, "index remove");
                self.connections.remove(pointer_max);
                return;
            }
            pointer_max += 1;
        }
        panic!("unable to remove connection from index: not present");
    }

    /// All indexed connections whose Euclidean distance to `connection` is
    /// at most `max_radius`, regardless of compatibility. Compatibility
    /// filtering is the caller's job; this query backs bump-apart logic,
    /// not connecting.
    pub fn neighbors_within_radius(
        &self,
        connection: &Connection,
        max_radius: f64,
    ) -> Vec<Rc<Connection>> {
        let pos = connection.position();
        let band = self.search_index(pos.y);
        let mut neighbors = Vec::new();

        let mut pointer_min = band;
        while pointer_min > 0 && self.in_y_range(pointer_min - 1, pos.y, max_radius) {
            pointer_min -= 1;
            let candidate = &self.connections[pointer_min];
            if pos.distance_to(candidate.position()) <= max_radius {
                neighbors.push(Rc::clone(candidate));
            }
        }
        let mut pointer_max = band;
        while pointer_max < self.connections.len()
            && self.in_y_range(pointer_max, pos.y, max_radius)
        {
            let candidate = &self.connections[pointer_max];
            if pos.distance_to(candidate.position()) <= max_radius {
                neighbors.push(Rc::clone(candidate));
            }
            pointer_max += 1;
        }
        neighbors
    }

    /// Find the single best candidate for `connection` as if it sat at
    /// `connection.position() + offset`.
    ///
    /// `check` is the caller's combined compatibility-and-distance
    /// predicate: given a candidate, the displaced position, and the best
    /// priority radius seen so far, it returns the candidate's priority
    /// radius if the candidate may connect, or `None`. Once a candidate at
    /// radius `r` is accepted, only candidates strictly closer than `r`
    /// are accepted thereafter.
    ///
    /// The scan continuation deliberately tests against the original
    /// `max_radius` rather than the shrunk best radius; this over-scans
    /// but never changes the result.
    pub fn closest_compatible<F>(
        &self,
        connection: &Connection,
        max_radius: f64,
        offset: Coordinate,
        mut check: F,
    ) -> ClosestResult
    where
        F: FnMut(&Rc<Connection>, Coordinate, f64) -> Option<f64>,
    {
        let pos = connection.position().translated(offset);
        let band = self.search_index(pos.y);

        let mut best: Option<Rc<Connection>> = None;
        let mut best_radius = max_radius;

        let mut pointer_min = band;
        while pointer_min > 0 && self.in_y_range(pointer_min - 1, pos.y, max_radius) {
            pointer_min -= 1;
            let candidate = &self.connections[pointer_min];
            if let Some(radius) = check(candidate, pos, best_radius) {
                if radius < best_radius {
                    best_radius = radius;
                    best = Some(Rc::clone(candidate));
                }
            }
        }
        let mut pointer_max = band;
        while pointer_max < self.connections.len()
            && self.in_y_range(pointer_max, pos.y, max_radius)
        {
            let candidate = &self.connections[pointer_max];
            if let Some(radius) = check(candidate, pos, best_radius) {
                if radius < best_radius {
                    best_radius = radius;
                    best = Some(Rc::clone(candidate));
                }
            }
            pointer_max += 1;
        }

        ClosestResult {
            connection: best,
            radius: best_radius,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ConnectionIndexSet
// ────────────────────────────────────────────────────────────────────────────

/// The four per-kind indexes of a workspace, created together at
/// workspace/renderer initialization.
#[derive(Debug)]
pub struct ConnectionIndexSet {
    indexes: [ConnectionIndex; 4],
}

fn slot(kind: ConnectionKind) -> usize {
    match kind {
        ConnectionKind::InputValue => 0,
        ConnectionKind::OutputValue => 1,
        ConnectionKind::NextStatement => 2,
        ConnectionKind::PreviousStatement => 3,
    }
}

impl ConnectionIndexSet {
    pub fn new() -> Self {
        Self {
            indexes: ConnectionKind::ALL.map(ConnectionIndex::new),
        }
    }

    /// The index holding connections of `kind`.
    pub fn index(&self, kind: ConnectionKind) -> &ConnectionIndex {
        &self.indexes[slot(kind)]
    }

    pub fn index_mut(&mut self, kind: ConnectionKind) -> &mut ConnectionIndex {
        &mut self.indexes[slot(kind)]
    }

    /// The index a connection of `kind` searches when looking for a
    /// partner, i.e. the index of the opposite kind.
    pub fn matching(&self, kind: ConnectionKind) -> &ConnectionIndex {
        self.index(kind.opposite())
    }
}

impl Default for ConnectionIndexSet {
    fn default() -> Self {
        Self::new()
    }
}
