//! Connection endpoints and the coordinate space they live in.
//!
//! A [`Connection`] is an attachment point on a block (value input/output or
//! statement next/previous) that can join to a compatible connection on
//! another block. Connections are owned by blocks; the index layer holds
//! shared [`std::rc::Rc`] references and distinguishes connections by
//! identity (`Rc::ptr_eq`), never by value.
//!
//! Positions are plain `f64` pairs in whatever coordinate space the caller
//! renders in. The core never interprets them as pixels.

use serde::{Deserialize, Serialize};
use std::cell::Cell;

// ────────────────────────────────────────────────────────────────────────────
// Coordinate
// ────────────────────────────────────────────────────────────────────────────

/// A point in the caller's 2D coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// This point displaced by an offset.
    pub fn translated(&self, offset: Coordinate) -> Coordinate {
        Coordinate::new(self.x + offset.x, self.y + offset.y)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ConnectionKind
// ────────────────────────────────────────────────────────────────────────────

/// The four kinds of connection a block can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// A value socket on a block (accepts an output).
    InputValue,
    /// The value plug of an expression block.
    OutputValue,
    /// The bottom of a statement block (continues to the next statement).
    NextStatement,
    /// The top notch of a statement block.
    PreviousStatement,
}

impl ConnectionKind {
    /// All kinds, in the order the per-kind indexes are laid out.
    pub const ALL: [ConnectionKind; 4] = [
        ConnectionKind::InputValue,
        ConnectionKind::OutputValue,
        ConnectionKind::NextStatement,
        ConnectionKind::PreviousStatement,
    ];

    /// The kind this kind connects to: inputs pair with outputs, next
    /// pairs with previous.
    pub fn opposite(self) -> ConnectionKind {
        match self {
            ConnectionKind::InputValue => ConnectionKind::OutputValue,
            ConnectionKind::OutputValue => ConnectionKind::InputValue,
            ConnectionKind::NextStatement => ConnectionKind::PreviousStatement,
            ConnectionKind::PreviousStatement => ConnectionKind::NextStatement,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Connection
// ────────────────────────────────────────────────────────────────────────────

/// An attachment point on a block.
///
/// The position is interior-mutable so that a block can move its endpoints
/// while holding only a shared reference. Callers must follow the
/// remove-before-move / insert-after-move protocol: moving a connection
/// while it sits in a [`crate::connection_index::ConnectionIndex`] breaks
/// the index's sort invariant.
#[derive(Debug)]
pub struct Connection {
    kind: ConnectionKind,
    position: Cell<Coordinate>,
}

impl Connection {
    pub fn new(kind: ConnectionKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Cell::new(Coordinate::new(x, y)),
        }
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn position(&self) -> Coordinate {
        self.position.get()
    }

    pub fn x(&self) -> f64 {
        self.position.get().x
    }

    pub fn y(&self) -> f64 {
        self.position.get().y
    }

    /// Move this connection. Only valid while the connection is not held by
    /// an index.
    pub fn set_position(&self, x: f64, y: f64) {
        self.position.set(Coordinate::new(x, y));
    }

    /// Euclidean distance between this connection and another.
    pub fn distance_from(&self, other: &Connection) -> f64 {
        self.position().distance_to(other.position())
    }

    /// Whether the two kinds are opposites. This is the baseline
    /// compatibility test; callers layer stricter checks (same-block
    /// exclusion, type checks) on top of it.
    pub fn can_connect_kind(&self, other: &Connection) -> bool {
        self.kind.opposite() == other.kind
    }
}
