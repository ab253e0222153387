pub mod config_space;
pub mod error;
pub mod layout;
pub mod registry;

pub use config_space::ConfigSpace;
pub use error::{ConfigError, ConfigResult};
pub use layout::{BinMember, FieldSlot, Layout, RegisterBin};
pub use registry::FieldRegistry;
