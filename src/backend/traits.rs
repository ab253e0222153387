//! Defines the `Backend` trait through which the allocator hands its wiring
//! plan to an external hardware-elaboration system, and the `ConfigBus`
//! bundle of shared-bus signal handles the plan is wired against. The
//! backend owns all gate-level meaning; the allocator only asks it to
//! instantiate primitives and connect named ports.

/// Hardware-elaboration capability set consumed by [`elaborate`].
///
/// `Handle` identifies a signal or port in the backend's own universe; the
/// allocator treats handles as opaque and only feeds them back into further
/// backend calls. Every `instantiate_*` method returns the output of the new
/// primitive.
///
/// [`elaborate`]: super::elaborate::elaborate
pub trait Backend {
    type Handle: Clone;

    /// A `width`-bit register with async reset, clock `clock`, and a
    /// write-enable condition. `data` is the register input; the elaborator
    /// passes the low `width` bits of the shared data bus. The returned
    /// handle is the register output `O`.
    fn register(
        &mut self,
        name: &str,
        width: u32,
        clock: &Self::Handle,
        reset: &Self::Handle,
        write_en: &Self::Handle,
        data: &Self::Handle,
    ) -> Self::Handle;

    /// A width-`hi - lo` view of `source[lo..hi)`.
    fn bit_slice(&mut self, name: &str, source: &Self::Handle, lo: u32, hi: u32) -> Self::Handle;

    /// `source` padded with zeros up to `target_width`. Configuration values
    /// are unsigned; the padding is never sign-extended.
    fn zero_extend(&mut self, source: &Self::Handle, target_width: u32) -> Self::Handle;

    /// A multiplexer over `inputs`, driven by `select`. The select handle's
    /// width must equal `ceil(log2(inputs.len()))`.
    fn selector(&mut self, inputs: Vec<Self::Handle>, select: &Self::Handle) -> Self::Handle;

    /// Wire two ports together.
    fn connect(&mut self, a: &Self::Handle, b: &Self::Handle);

    /// A 1-bit signal that is high when `a` equals the constant.
    fn equals(&mut self, a: &Self::Handle, constant: u64) -> Self::Handle;

    /// 1-bit AND of two 1-bit signals.
    fn and(&mut self, a: &Self::Handle, b: &Self::Handle) -> Self::Handle;
}

/// Signal handles for the shared configuration bus an elaborated block hangs
/// off: `addr`/`data`/`write` drive programming, `read_data` is the shared
/// read-back output. `read` is part of the bus bundle shape but unused by
/// the allocator itself (read-back is combinational off the address).
pub struct ConfigBus<H> {
    pub clock: H,
    pub reset: H,
    /// Register address, `addr_width` bits.
    pub addr: H,
    /// Write data, `data_width` bits.
    pub data: H,
    /// Write strobe, 1 bit.
    pub write: H,
    /// Read strobe, 1 bit.
    pub read: H,
    /// Read-back output port, `data_width` bits. Left unconnected when the
    /// finalized layout has zero bins.
    pub read_data: H,
}
