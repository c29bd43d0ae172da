//! Setup request dispatch.
//!
//! Requests are matched on the packed `bmRequestType | bRequest << 8` word with bit 0 of
//! `bmRequestType` masked off. That bit is what separates device from interface recipients, and
//! nothing here behaves differently between the two.

use tracing::{debug, trace};

use crate::descriptor::DescriptorTable;
use crate::hooks::{Capabilities, ControlContext, ControlHooks};
use crate::setup::SetupPacket;
use crate::usb::{REQ_GET_DESCRIPTOR, REQ_HID_GET_REPORT, REQ_HID_SET_REPORT, REQ_SET_ADDRESS};

const RECIPIENT_MASK: u16 = !0x0001;

const fn dispatch_key(request_type: u8, request: u8) -> u16 {
    ((request_type as u16) | ((request as u16) << 8)) & RECIPIENT_MASK
}

const KEY_CLASS_SET_REPORT: u16 = dispatch_key(0x21, REQ_HID_SET_REPORT);
const KEY_CLASS_GET_REPORT: u16 = dispatch_key(0xA1, REQ_HID_GET_REPORT);
const KEY_GET_DESCRIPTOR: u16 = dispatch_key(0x80, REQ_GET_DESCRIPTOR);
const KEY_SET_ADDRESS: u16 = dispatch_key(0x00, REQ_SET_ADDRESS);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Request {
    /// Class, host-to-device SET_REPORT.
    FeatureReportWrite,
    /// Class, device-to-host GET_REPORT.
    FeatureReportRead,
    GetDescriptor,
    SetAddress,
    Other,
}

impl Request {
    pub fn classify(setup: &SetupPacket) -> Self {
        match setup.request_type_and_request & RECIPIENT_MASK {
            KEY_CLASS_SET_REPORT => Request::FeatureReportWrite,
            KEY_CLASS_GET_REPORT => Request::FeatureReportRead,
            KEY_GET_DESCRIPTOR => Request::GetDescriptor,
            KEY_SET_ADDRESS => Request::SetAddress,
            _ => Request::Other,
        }
    }
}

/// What dispatch needs from the device besides the endpoint.
pub(crate) struct DispatchEnv<'d, H> {
    pub descriptors: &'d DescriptorTable,
    pub hooks: &'d mut H,
    pub capabilities: Capabilities,
    pub assigned_address: &'d mut u16,
}

/// Runs every side effect of `setup` before returning; never allocates.
pub(crate) fn dispatch<'buf, H: ControlHooks<'buf>>(
    setup: &SetupPacket,
    ctx: &mut ControlContext<'_, 'buf>,
    env: DispatchEnv<'_, H>,
) -> Request {
    let request = Request::classify(setup);
    let caps = env.capabilities;

    match request {
        Request::FeatureReportWrite => {
            if caps.contains(Capabilities::FEATURE_REPORT_WRITE) {
                env.hooks
                    .feature_write_start(ctx, setup.length, setup.value_index);
            }
        }
        Request::FeatureReportRead => {
            if caps.contains(Capabilities::FEATURE_REPORT_READ) {
                env.hooks
                    .feature_read_start(ctx, setup.length, setup.value_index);
            }
        }
        Request::GetDescriptor => match env.descriptors.resolve(setup.value_index) {
            Some(entry) => {
                ctx.bind_source(entry.bytes(), setup.length);
                trace!(
                    key = setup.value_index,
                    len = ctx.endpoint().max_length,
                    "descriptor bound"
                );
            }
            None => debug!(key = setup.value_index, "no descriptor for key"),
        },
        Request::SetAddress => {
            *env.assigned_address = setup.value();
            debug!(address = setup.value(), "address latched");
        }
        Request::Other => {
            if caps.contains(Capabilities::OTHER_CONTROL) {
                env.hooks.other_control(ctx, setup);
            } else {
                trace!(
                    request = setup.request_type_and_request,
                    "unhandled control request"
                );
            }
        }
    }

    request
}
