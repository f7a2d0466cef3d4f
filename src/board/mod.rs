pub mod cozy;

pub use cozy::{position_identity, Position, START_FEN};
