pub mod elaborate;
pub mod traits;

pub use elaborate::{Elaboration, elaborate};
pub use traits::{Backend, ConfigBus};
