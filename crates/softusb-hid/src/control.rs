use softusb::{
    Capabilities, CollectBuffer, ControlContext, ControlHooks, DeviceContext, LinkTx, Pid,
};
use tracing::{debug, trace};

use crate::bootloader::{BootloaderEntry, RebootState, ARM_VALUE_INDEX};
use crate::descriptors::{DESCRIPTORS, KEYBOARD_ENDPOINT, MOUSE_ENDPOINT};
use crate::reports::InputReports;

/// EP0 plus the two interrupt IN endpoints.
pub const ENDPOINTS: usize = 3;

pub type CompositeDevice<'buf, B> = DeviceContext<'buf, HidControl<'buf, B>, ENDPOINTS>;

/// Class request handling for the composite device.
///
/// Feature reads are answered from `feature_in`. Feature writes are collected into `feature_out`
/// when one is attached; its owner polls the buffer header for completion.
pub struct HidControl<'buf, B> {
    reports: &'buf InputReports,
    feature_in: &'buf [u8],
    feature_out: Option<CollectBuffer<'buf>>,
    reboot: RebootState,
    bootloader: B,
}

impl<'buf, B: BootloaderEntry> HidControl<'buf, B> {
    pub fn new(reports: &'buf InputReports, bootloader: B) -> Self {
        Self {
            reports,
            feature_in: &[],
            feature_out: None,
            reboot: RebootState::Disarmed,
            bootloader,
        }
    }

    pub fn with_feature_in(mut self, data: &'buf [u8]) -> Self {
        self.feature_in = data;
        self
    }

    pub fn with_feature_out(mut self, buffer: CollectBuffer<'buf>) -> Self {
        self.feature_out = Some(buffer);
        self
    }

    pub fn reboot_state(&self) -> RebootState {
        self.reboot
    }

    pub fn bootloader(&self) -> &B {
        &self.bootloader
    }

    /// A device context serving [`DESCRIPTORS`] with these hooks.
    pub fn into_device(self) -> CompositeDevice<'buf, B> {
        DeviceContext::new(DESCRIPTORS, self)
    }
}

impl<'buf, B: BootloaderEntry> ControlHooks<'buf> for HidControl<'buf, B> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::HID_FEATURES | Capabilities::USER_DATA | Capabilities::IN_REQUEST
    }

    fn feature_write_start(
        &mut self,
        ctx: &mut ControlContext<'_, 'buf>,
        length: u16,
        value_index: u32,
    ) {
        if value_index == ARM_VALUE_INDEX {
            self.reboot.arm();
            return;
        }
        let Some(buffer) = self.feature_out else {
            trace!(value_index, "feature write without a buffer");
            return;
        };
        buffer.arm();
        if let Err(err) = ctx.collect_into(buffer, length) {
            debug!(value_index, %err, "feature write refused");
        }
    }

    fn feature_read_start(
        &mut self,
        ctx: &mut ControlContext<'_, 'buf>,
        length: u16,
        _value_index: u32,
    ) {
        ctx.bind_source(self.feature_in, length);
    }

    fn user_data(&mut self, ctx: &mut ControlContext<'_, 'buf>, payload: &[u8]) {
        if ctx.endpoint_index() != 0 {
            trace!(
                endpoint = ctx.endpoint_index(),
                len = payload.len(),
                "unexpected OUT data"
            );
            return;
        }
        if self.reboot.on_control_data(payload) {
            ctx.claim();
        }
    }

    fn in_request(&mut self, ctx: &mut ControlContext<'_, 'buf>, pid: Pid, tx: &mut dyn LinkTx) {
        let endpoint = ctx.endpoint_index();
        match endpoint {
            0 if self.reboot == RebootState::Pending => {
                tx.send_data(endpoint, pid, &[]);
                self.reboot = RebootState::Disarmed;
                debug!("entering bootloader");
                self.bootloader.enter();
            }
            MOUSE_ENDPOINT => tx.send_data(endpoint, pid, &self.reports.mouse.load()),
            KEYBOARD_ENDPOINT => tx.send_data(endpoint, pid, &self.reports.keyboard.load()),
            _ => tx.send_data(endpoint, pid, &[]),
        }
    }
}

/// Builds the composite device without feature report buffers.
pub fn composite_device<B: BootloaderEntry>(
    reports: &InputReports,
    bootloader: B,
) -> CompositeDevice<'_, B> {
    HidControl::new(reports, bootloader).into_device()
}
