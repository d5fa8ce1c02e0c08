pub mod distances2;
pub mod point_sequence;

pub use point_sequence::{PointSequence, Winding};
