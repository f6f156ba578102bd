//! Procedure data model: definitions, parameters, the authoritative map,
//! and change-event emission.
//!
//! Blocks that render a procedure call or definition hold only the
//! procedure id; they subscribe to the map's events and rebuild their shape
//! when a procedure they care about changes. The models themselves are
//! renderer-independent plain data.

pub mod events;
pub mod map;
pub mod model;

pub use events::{ProcedureEvent, ProcedureHistory};
pub use map::{ParameterEdit, ProcedureListener, ProcedureMap};
pub use model::{ParameterModel, ProcedureModel};
