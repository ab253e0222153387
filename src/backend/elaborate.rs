//! Turns a finalized [`ConfigSpace`] into backend primitives: one addressed
//! register per bin on the write path, one bit-slice view per field, and the
//! address-selected read-back network on the shared read port.

use ahash::AHashMap;

use crate::space::{ConfigError, ConfigResult, ConfigSpace, RegisterBin};

use super::traits::{Backend, ConfigBus};

/// Handles produced by [`elaborate`], keyed the way callers consume them.
pub struct Elaboration<H> {
    /// Register output per bin, in address order.
    pub bin_outputs: Vec<H>,
    /// Per-field bit-slice view of the owning register's output.
    pub field_views: AHashMap<String, H>,
    /// The signal driven onto `bus.read_data`. `None` only when the layout
    /// has zero bins, in which case the read port is left unconnected and
    /// callers must not rely on its value.
    pub read_data: Option<H>,
}

/// Realize the wiring plan for `space` against `backend`.
///
/// Per bin `i`: write enable is `(config_addr == i) AND write`, further
/// ANDed with `config_en` when one is supplied; the register input is the
/// low `bin.width` bits of the shared data bus. Per field: a `[lo, hi)`
/// slice of the owning register's output, named after the field. The
/// read-back network follows the bin count: nothing for zero bins, a direct
/// zero-extended connection for one, an address-selected multiplexer
/// otherwise.
pub fn elaborate<B: Backend>(
    space: &ConfigSpace,
    backend: &mut B,
    bus: &ConfigBus<B::Handle>,
    config_en: Option<&B::Handle>,
) -> ConfigResult<Elaboration<B::Handle>> {
    let layout = space.layout()?;
    let data_width = space.data_width();
    let addr_width = space.addr_width();

    let num_bins = layout.num_bins();
    if num_bins as u64 > 1u64 << addr_width {
        return Err(ConfigError::AddressSpaceExhausted {
            bins: num_bins,
            addr_width,
        });
    }

    let mut bin_outputs = Vec::with_capacity(num_bins);
    let mut field_views = AHashMap::with_capacity(layout.num_fields());

    for bin in layout.bins() {
        let addr_match = backend.equals(&bus.addr, u64::from(bin.index));
        let mut write_en = backend.and(&addr_match, &bus.write);
        if let Some(enable) = config_en {
            write_en = backend.and(&write_en, enable);
        }

        let data_in = if bin.width < data_width {
            backend.bit_slice(
                &format!("config_data_{}", bin.index),
                &bus.data,
                0,
                bin.width,
            )
        } else {
            bus.data.clone()
        };
        let out = backend.register(
            &format!("config_reg_{}", bin.index),
            bin.width,
            &bus.clock,
            &bus.reset,
            &write_en,
            &data_in,
        );

        for member in &bin.members {
            let view = backend.bit_slice(&member.name, &out, member.lo, member.hi);
            field_views.insert(member.name.clone(), view);
        }
        bin_outputs.push(out);
    }

    let read_data =
        synthesize_read_back(layout.bins(), &bin_outputs, backend, bus, data_width, addr_width);
    if let Some(signal) = &read_data {
        backend.connect(signal, &bus.read_data);
    }

    Ok(Elaboration {
        bin_outputs,
        field_views,
        read_data,
    })
}

/// Build the signal exposing the currently addressed bin on the read bus.
/// Returns `None` when there is nothing to read back.
fn synthesize_read_back<B: Backend>(
    bins: &[RegisterBin],
    bin_outputs: &[B::Handle],
    backend: &mut B,
    bus: &ConfigBus<B::Handle>,
    data_width: u32,
    addr_width: u32,
) -> Option<B::Handle> {
    match bins.len() {
        0 => None,
        1 => {
            let padded = zext_to_bus(backend, &bin_outputs[0], bins[0].width, data_width);
            Some(padded)
        }
        n => {
            let bits = sel_bits(n);
            let select = if bits < addr_width {
                backend.bit_slice("read_sel", &bus.addr, 0, bits)
            } else {
                bus.addr.clone()
            };
            let inputs = bins
                .iter()
                .zip(bin_outputs)
                .map(|(bin, out)| zext_to_bus(backend, out, bin.width, data_width))
                .collect();
            Some(backend.selector(inputs, &select))
        }
    }
}

fn zext_to_bus<B: Backend>(
    backend: &mut B,
    source: &B::Handle,
    width: u32,
    data_width: u32,
) -> B::Handle {
    if width == data_width {
        source.clone()
    } else {
        backend.zero_extend(source, data_width)
    }
}

/// Select width for an `n`-way read-back multiplexer, `n >= 2`.
fn sel_bits(n: usize) -> u32 {
    usize::BITS - (n - 1).leading_zeros()
}
