#![allow(dead_code)]

use softusb::{DeviceContext, LinkTx, Pid, SetupPacket, Toggle};
use softusb::{ControlHooks, DescriptorEntry, DescriptorTable};

pub const REQ_GET_DESCRIPTOR: u8 = 0x06;
pub const REQ_SET_ADDRESS: u8 = 0x05;
pub const REQ_SET_CONFIGURATION: u8 = 0x09;
pub const REQ_HID_GET_REPORT: u8 = 0x01;
pub const REQ_HID_SET_REPORT: u8 = 0x09;

pub static DEVICE_DESC: [u8; 18] = [
    0x12, 0x01, 0x10, 0x01, 0x00, 0x00, 0x00, 0x08, 0x09, 0x12, 0x03, 0xC0, 0x01, 0x00, 0x01,
    0x02, 0x03, 0x01,
];

pub static CONFIG_DESC: [u8; 9] = [0x09, 0x02, 0x09, 0x00, 0x00, 0x01, 0x00, 0x80, 0x32];

pub static STRING_MFR: [u8; 10] = [0x0A, 0x03, b'T', 0, b'e', 0, b's', 0, b't', 0];

pub static TABLE_ENTRIES: [DescriptorEntry; 3] = [
    DescriptorEntry::new(0x0000_0100, &DEVICE_DESC),
    DescriptorEntry::new(0x0000_0200, &CONFIG_DESC),
    DescriptorEntry::new(0x0409_0301, &STRING_MFR),
];

pub static TABLE: DescriptorTable = DescriptorTable::new(&TABLE_ENTRIES);

/// One packet handed to the link layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sent {
    pub endpoint: u8,
    pub pid: Pid,
    pub data: Vec<u8>,
}

/// Records everything transmitted, in order.
#[derive(Default)]
pub struct RecordingLink {
    pub sent: Vec<Sent>,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &Sent {
        self.sent.last().expect("nothing was transmitted")
    }

    pub fn acks(&self) -> usize {
        self.sent.iter().filter(|s| s.pid == Pid::Ack).count()
    }

    pub fn take(&mut self) -> Vec<Sent> {
        std::mem::take(&mut self.sent)
    }
}

impl LinkTx for RecordingLink {
    fn transmit(&mut self, endpoint: u8, pid: Pid, data: &[u8]) {
        self.sent.push(Sent {
            endpoint,
            pid,
            data: data.to_vec(),
        });
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn get_descriptor(desc_type: u8, desc_index: u8, w_index: u16, length: u16) -> [u8; 8] {
    SetupPacket::new(
        0x80,
        REQ_GET_DESCRIPTOR,
        u16::from_le_bytes([desc_index, desc_type]),
        w_index,
        length,
    )
    .to_bytes()
}

pub fn set_address(address: u16) -> [u8; 8] {
    SetupPacket::new(0x00, REQ_SET_ADDRESS, address, 0, 0).to_bytes()
}

pub fn set_report(value: u16, index: u16, length: u16) -> [u8; 8] {
    SetupPacket::new(0x21, REQ_HID_SET_REPORT, value, index, length).to_bytes()
}

pub fn get_report(value: u16, index: u16, length: u16) -> [u8; 8] {
    SetupPacket::new(0xA1, REQ_HID_GET_REPORT, value, index, length).to_bytes()
}

/// SETUP token followed by its DATA0 payload on EP0.
pub fn send_setup<'buf, H: ControlHooks<'buf>, const EPS: usize>(
    dev: &mut DeviceContext<'buf, H, EPS>,
    link: &mut RecordingLink,
    setup: [u8; 8],
) {
    dev.on_setup_token(0);
    dev.on_data_packet(0, &setup, Toggle::Data0, link);
}

/// OUT token and data packet carrying the endpoint's currently expected toggle.
pub fn send_out<'buf, H: ControlHooks<'buf>, const EPS: usize>(
    dev: &mut DeviceContext<'buf, H, EPS>,
    link: &mut RecordingLink,
    endpoint: u8,
    payload: &[u8],
) {
    let toggle = dev.endpoint(endpoint).expect("endpoint").out_toggle;
    dev.on_out_token(endpoint);
    dev.on_data_packet(endpoint, payload, toggle, link);
}

/// Drives IN tokens on EP0 until a short packet, acknowledging each one.
pub fn read_control_in<'buf, H: ControlHooks<'buf>, const EPS: usize>(
    dev: &mut DeviceContext<'buf, H, EPS>,
    link: &mut RecordingLink,
) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        dev.on_in_token(0, link);
        let sent = link.last().clone();
        assert!(
            matches!(sent.pid, Pid::Data0 | Pid::Data1),
            "expected data, got {:?}",
            sent.pid
        );
        dev.on_ack();
        out.extend_from_slice(&sent.data);
        if sent.data.len() < 8 {
            break;
        }
    }
    out
}
