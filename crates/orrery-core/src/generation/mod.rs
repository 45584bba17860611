//! Generation - procedural creation of star systems

mod names;
mod system;

pub use names::*;
pub use system::*;
