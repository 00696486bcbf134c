pub mod table;
pub mod types;
pub mod wheel;

pub use table::Table;
pub use types::*;
pub use wheel::{Slot, Wheel, WheelVariant};
