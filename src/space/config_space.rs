//! `ConfigSpace` owns the whole allocation lifecycle: declarations accumulate
//! in a [`FieldRegistry`], a single `finalize` call packs them into a
//! [`Layout`], and every later query resolves against that immutable layout.
//! It mirrors the device-registration/resolution split of a system bus: pure
//! bookkeeping up front, deterministic lookups afterwards.

use std::ops::Range;

use super::error::{ConfigError, ConfigResult};
use super::layout::{FieldSlot, Layout, RegisterBin};
use super::registry::FieldRegistry;

/// Allocator for a flat, word-oriented configuration address space.
///
/// Lifecycle: `declare`/`declare_many` any number of times, `finalize`
/// exactly once, then `encode`/`decode`/lookups for the rest of the
/// instance's life. Finalizing twice or querying early fails deterministically
/// rather than returning stale or partial data.
pub struct ConfigSpace {
    addr_width: u32,
    data_width: u32,
    registry: FieldRegistry,
    layout: Option<Layout>,
}

impl ConfigSpace {
    /// Create an allocator for a bus with the given address and data widths.
    ///
    /// Field values travel as `u64`, so `data_width` is capped at 64 bits;
    /// addresses are compared as `u64` constants, capped at 32 bits.
    pub fn new(addr_width: u32, data_width: u32) -> ConfigResult<Self> {
        if addr_width == 0 || addr_width > 32 || data_width == 0 || data_width > 64 {
            return Err(ConfigError::InvalidBusParams {
                addr_width,
                data_width,
            });
        }
        Ok(Self {
            addr_width,
            data_width,
            registry: FieldRegistry::new(),
            layout: None,
        })
    }

    pub fn addr_width(&self) -> u32 {
        self.addr_width
    }

    pub fn data_width(&self) -> u32 {
        self.data_width
    }

    /// Declare one configuration field. Fails on duplicate names (whether
    /// still pending or already finalized), zero widths, and widths beyond
    /// the data bus.
    pub fn declare(&mut self, name: impl Into<String>, width: u32) -> ConfigResult<()> {
        let name = name.into();
        if self
            .layout
            .as_ref()
            .is_some_and(|layout| layout.contains(&name))
        {
            return Err(ConfigError::DuplicateField { name });
        }
        self.registry.declare(name, width, self.data_width)
    }

    /// Declare a batch of fields. Iteration order of `pairs` never affects
    /// the finalized layout; the first failing declaration aborts the batch.
    pub fn declare_many<N>(&mut self, pairs: impl IntoIterator<Item = (N, u32)>) -> ConfigResult<()>
    where
        N: Into<String>,
    {
        for (name, width) in pairs {
            self.declare(name, width)?;
        }
        Ok(())
    }

    /// Pack all declared fields into addressable register bins, draining the
    /// registry. Runs exactly once; a second call fails `AlreadyFinalized`.
    pub fn finalize(&mut self) -> ConfigResult<&Layout> {
        if self.layout.is_some() {
            return Err(ConfigError::AlreadyFinalized);
        }
        let layout = Layout::pack(self.registry.drain(), self.data_width)?;
        Ok(self.layout.insert(layout))
    }

    pub fn is_finalized(&self) -> bool {
        self.layout.is_some()
    }

    /// The finalized layout, or `NotFinalized` before the packing pass.
    pub fn layout(&self) -> ConfigResult<&Layout> {
        self.layout.as_ref().ok_or(ConfigError::NotFinalized)
    }

    pub fn bins(&self) -> ConfigResult<&[RegisterBin]> {
        Ok(self.layout()?.bins())
    }

    /// Address-map entry for a field.
    pub fn slot(&self, name: &str) -> ConfigResult<FieldSlot> {
        self.layout()?.slot(name)
    }

    /// The bus address of the register holding `name`.
    pub fn register_index_of(&self, name: &str) -> ConfigResult<u32> {
        Ok(self.slot(name)?.bin)
    }

    /// The `[lo, hi)` bit range of `name` within its register.
    pub fn bit_range_of(&self, name: &str) -> ConfigResult<Range<u32>> {
        Ok(self.slot(name)?.bit_range())
    }

    /// Position `value` for a bus write to the field's register: returns the
    /// register address and the value shifted into the field's bit range.
    /// The caller drives the shifted word over the shared data bus; the
    /// address match plus write strobe programs exactly that one register.
    pub fn encode(&self, name: &str, value: u64) -> ConfigResult<(u32, u64)> {
        let slot = self.slot(name)?;
        if slot.width() < 64 && value >= 1u64 << slot.width() {
            return Err(ConfigError::ValueOverflow {
                name: name.into(),
                value,
                width: slot.width(),
            });
        }
        Ok((slot.bin, value << slot.lo))
    }

    /// Extract a field's value from its register's full read-back word.
    pub fn decode(&self, name: &str, register_word: u64) -> ConfigResult<u64> {
        let slot = self.slot(name)?;
        let shifted = register_word >> slot.lo;
        if slot.width() == 64 {
            Ok(shifted)
        } else {
            Ok(shifted & ((1u64 << slot.width()) - 1))
        }
    }
}
