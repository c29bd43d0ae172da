//! Extension points for class, vendor and application traffic.
//!
//! A device is built with one [`ControlHooks`] implementation. Its [`Capabilities`] are read once
//! at construction and decide which hook methods are ever called; a hook whose capability is
//! absent is never invoked, so implementations only override what they declare.

use bitflags::bitflags;

use crate::buffer::{required_capacity, CollectBuffer, CollectError};
use crate::endpoint::{Endpoint, Transfer};
use crate::link::LinkTx;
use crate::setup::SetupPacket;
use crate::stage::SetupStage;
use crate::usb::Pid;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Capabilities: u8 {
        /// Class SET_REPORT (feature/report write start).
        const FEATURE_REPORT_WRITE = 1 << 0;
        /// Class GET_REPORT (feature/report read start).
        const FEATURE_REPORT_READ = 1 << 1;
        /// Control requests the built-in dispatcher does not recognize.
        const OTHER_CONTROL = 1 << 2;
        /// Data packets that are neither a setup payload nor collection data.
        const USER_DATA = 1 << 3;
        /// IN tokens on non-zero endpoints or on claimed control transfers.
        const IN_REQUEST = 1 << 4;

        const HID_FEATURES = Self::FEATURE_REPORT_WRITE.bits() | Self::FEATURE_REPORT_READ.bits();
    }
}

/// The endpoint a hook is acting on, plus the device's control stage.
pub struct ControlContext<'a, 'buf> {
    index: u8,
    endpoint: &'a mut Endpoint<'buf>,
    stage: &'a mut SetupStage,
}

impl<'a, 'buf> ControlContext<'a, 'buf> {
    pub fn new(index: u8, endpoint: &'a mut Endpoint<'buf>, stage: &'a mut SetupStage) -> Self {
        Self {
            index,
            endpoint,
            stage,
        }
    }

    pub fn endpoint_index(&self) -> u8 {
        self.index
    }

    pub fn endpoint(&self) -> &Endpoint<'buf> {
        self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut Endpoint<'buf> {
        self.endpoint
    }

    pub fn stage(&self) -> SetupStage {
        *self.stage
    }

    /// Marks the transfer as owned by the extension (IN tokens go to `in_request`).
    pub fn claim(&mut self) {
        self.endpoint.extension_claimed = true;
    }

    /// Binds device-to-host data; the transfer is bounded by both `requested` and `data`.
    pub fn bind_source(&mut self, data: &'buf [u8], requested: u16) {
        let len = usize::from(requested).min(data.len());
        self.endpoint.transfer = Transfer::Source(data);
        self.endpoint.max_length = len as u32;
    }

    /// Starts a host-to-device data stage of `declared_len` bytes into `buffer`.
    ///
    /// The buffer must hold `declared_len` rounded up to whole 8-byte chunks, since the final
    /// chunk is always written in full. On error nothing changes and the stage stays as it was.
    pub fn collect_into(
        &mut self,
        buffer: CollectBuffer<'buf>,
        declared_len: u16,
    ) -> Result<(), CollectError> {
        let required = required_capacity(usize::from(declared_len));
        if buffer.capacity() < required {
            return Err(CollectError::BufferTooSmall {
                capacity: buffer.capacity(),
                required,
            });
        }
        self.endpoint.transfer = Transfer::Sink(buffer);
        self.endpoint.max_length = u32::from(declared_len);
        self.endpoint.transfer_count = 0;
        *self.stage = SetupStage::CollectingHostToDevice;
        Ok(())
    }
}

/// Class/vendor extension interface. Every method runs synchronously on the packet path.
#[allow(unused_variables)]
pub trait ControlHooks<'buf> {
    fn capabilities(&self) -> Capabilities;

    /// Class SET_REPORT arrived. May call [`ControlContext::collect_into`] to receive the data.
    fn feature_write_start(
        &mut self,
        ctx: &mut ControlContext<'_, 'buf>,
        length: u16,
        value_index: u32,
    ) {
    }

    /// Class GET_REPORT arrived. May call [`ControlContext::bind_source`] to answer it.
    fn feature_read_start(
        &mut self,
        ctx: &mut ControlContext<'_, 'buf>,
        length: u16,
        value_index: u32,
    ) {
    }

    fn other_control(&mut self, ctx: &mut ControlContext<'_, 'buf>, setup: &SetupPacket) {}

    fn user_data(&mut self, ctx: &mut ControlContext<'_, 'buf>, payload: &[u8]) {}

    /// Answers an IN token. `pid` carries the endpoint's current IN toggle. Implementations must
    /// transmit exactly one data packet.
    fn in_request(&mut self, ctx: &mut ControlContext<'_, 'buf>, pid: Pid, tx: &mut dyn LinkTx) {
        tx.send_data(ctx.endpoint_index(), pid, &[]);
    }
}

impl<'buf, H: ControlHooks<'buf> + ?Sized> ControlHooks<'buf> for &mut H {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn feature_write_start(
        &mut self,
        ctx: &mut ControlContext<'_, 'buf>,
        length: u16,
        value_index: u32,
    ) {
        (**self).feature_write_start(ctx, length, value_index);
    }

    fn feature_read_start(
        &mut self,
        ctx: &mut ControlContext<'_, 'buf>,
        length: u16,
        value_index: u32,
    ) {
        (**self).feature_read_start(ctx, length, value_index);
    }

    fn other_control(&mut self, ctx: &mut ControlContext<'_, 'buf>, setup: &SetupPacket) {
        (**self).other_control(ctx, setup);
    }

    fn user_data(&mut self, ctx: &mut ControlContext<'_, 'buf>, payload: &[u8]) {
        (**self).user_data(ctx, payload);
    }

    fn in_request(&mut self, ctx: &mut ControlContext<'_, 'buf>, pid: Pid, tx: &mut dyn LinkTx) {
        (**self).in_request(ctx, pid, tx);
    }
}

/// A device with no extensions: only descriptors and SET_ADDRESS are handled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl<'buf> ControlHooks<'buf> for NoHooks {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }
}
