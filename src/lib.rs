//! Renderer-independent core of a block-based visual programming editor.
//!
//! Two subsystems, both free of any DOM/SVG or pixel concern:
//!
//! - [`connection_index`]: per-kind, y-sorted connection lookup answering
//!   the proximity queries a drag controller needs for snapping and
//!   bump-apart.
//! - [`procedures`]: the authoritative procedure/parameter data model with
//!   change-event emission, consumed by blocks that resynchronize their
//!   shape from events.
//!
//! The integration tests demonstrate usage of both.

pub mod connection;
pub mod connection_index;
pub mod procedures;
pub mod variables;
