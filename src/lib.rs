//! Word-oriented configuration address-space allocator for programmable
//! hardware blocks. Callers declare named bit-fields, a single finalize pass
//! packs them into fixed-width addressable register bins, and the resulting
//! layout drives both per-field write encoding and the elaboration of the
//! shared-bus wiring plan (write enables, field views, read-back selection)
//! through an abstract hardware backend.

pub mod backend;
pub mod space;

pub use backend::{Backend, ConfigBus, Elaboration, elaborate};
pub use space::{
    BinMember, ConfigError, ConfigResult, ConfigSpace, FieldRegistry, FieldSlot, Layout,
    RegisterBin,
};
