#![allow(dead_code)]

use softusb::{ControlHooks, DeviceContext, LinkTx, Pid, SetupPacket, Toggle};

#[derive(Default)]
pub struct RecordingLink {
    pub sent: Vec<(u8, Pid, Vec<u8>)>,
}

impl RecordingLink {
    pub fn last(&self) -> &(u8, Pid, Vec<u8>) {
        self.sent.last().expect("nothing was transmitted")
    }
}

impl LinkTx for RecordingLink {
    fn transmit(&mut self, endpoint: u8, pid: Pid, data: &[u8]) {
        self.sent.push((endpoint, pid, data.to_vec()));
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn setup<'buf, H: ControlHooks<'buf>, const EPS: usize>(
    dev: &mut DeviceContext<'buf, H, EPS>,
    link: &mut RecordingLink,
    packet: SetupPacket,
) {
    dev.on_setup_token(0);
    dev.on_data_packet(0, &packet.to_bytes(), Toggle::Data0, link);
}

pub fn out<'buf, H: ControlHooks<'buf>, const EPS: usize>(
    dev: &mut DeviceContext<'buf, H, EPS>,
    link: &mut RecordingLink,
    endpoint: u8,
    payload: &[u8],
) {
    let toggle = dev.endpoint(endpoint).expect("endpoint").out_toggle;
    dev.on_out_token(endpoint);
    dev.on_data_packet(endpoint, payload, toggle, link);
}

/// Full control read: setup, IN data stage until a short packet, OUT status stage.
pub fn control_in<'buf, H: ControlHooks<'buf>, const EPS: usize>(
    dev: &mut DeviceContext<'buf, H, EPS>,
    link: &mut RecordingLink,
    packet: SetupPacket,
) -> Vec<u8> {
    setup(dev, link, packet);
    let mut data = Vec::new();
    loop {
        dev.on_in_token(0, link);
        let (_, _, chunk) = link.last().clone();
        dev.on_ack();
        data.extend_from_slice(&chunk);
        if chunk.len() < 8 {
            break;
        }
    }
    out(dev, link, 0, &[]);
    data
}

pub fn get_descriptor(value: u16, index: u16, length: u16) -> SetupPacket {
    SetupPacket::new(0x80, 0x06, value, index, length)
}
