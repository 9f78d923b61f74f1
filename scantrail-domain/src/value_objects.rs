// Domain value objects
pub mod box_number;
pub mod event_type;

pub use box_number::*;
pub use event_type::*;
