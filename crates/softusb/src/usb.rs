//! Low-speed USB wire constants and data-packet framing.
//!
//! PID bytes are stored exactly as they travel on the wire: the 4-bit PID in the low nibble and
//! its one's complement in the high nibble.

use thiserror::Error;

use crate::toggle::Toggle;

/// Maximum packet size of the default control pipe on a low-speed device.
pub const ENDPOINT0_SIZE: usize = 8;

pub const REQ_SET_ADDRESS: u8 = 0x05;
pub const REQ_GET_DESCRIPTOR: u8 = 0x06;

pub const REQ_HID_GET_REPORT: u8 = 0x01;
pub const REQ_HID_SET_REPORT: u8 = 0x09;

pub const DESC_DEVICE: u8 = 0x01;
pub const DESC_CONFIGURATION: u8 = 0x02;
pub const DESC_STRING: u8 = 0x03;
pub const DESC_INTERFACE: u8 = 0x04;
pub const DESC_ENDPOINT: u8 = 0x05;
pub const DESC_HID: u8 = 0x21;
pub const DESC_REPORT: u8 = 0x22;

/// Packet identifiers this stack sends or receives.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Pid {
    Ack = 0xD2,
    Nak = 0x5A,
    Stall = 0x1E,
    Data0 = 0xC3,
    Data1 = 0x4B,
}

impl Pid {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xD2 => Some(Pid::Ack),
            0x5A => Some(Pid::Nak),
            0x1E => Some(Pid::Stall),
            0xC3 => Some(Pid::Data0),
            0x4B => Some(Pid::Data1),
            _ => None,
        }
    }

    /// DATA PID that carries the given toggle parity.
    pub fn data(toggle: Toggle) -> Self {
        match toggle {
            Toggle::Data0 => Pid::Data0,
            Toggle::Data1 => Pid::Data1,
        }
    }

    pub fn is_handshake(self) -> bool {
        matches!(self, Pid::Ack | Pid::Nak | Pid::Stall)
    }
}

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum PacketError {
    #[error("empty packet")]
    Empty,

    #[error("PID byte 0x{0:02x} is not DATA0/DATA1")]
    NotData(u8),

    #[error("packet of {len} bytes is too short for PID and CRC16")]
    MissingCrc { len: usize },
}

/// A received DATA0/DATA1 packet, as handed up by the bit-level receiver.
///
/// The CRC16 trailer is stripped but not checked; that belongs to the receiver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DataPacket<'a> {
    pub toggle: Toggle,
    pub payload: &'a [u8],
}

impl<'a> DataPacket<'a> {
    /// Splits `raw` (PID, payload, CRC16) into the toggle parity and payload.
    pub fn parse(raw: &'a [u8]) -> Result<Self, PacketError> {
        let (&pid, rest) = raw.split_first().ok_or(PacketError::Empty)?;
        let toggle = match Pid::from_byte(pid) {
            Some(Pid::Data0) => Toggle::Data0,
            Some(Pid::Data1) => Toggle::Data1,
            _ => return Err(PacketError::NotData(pid)),
        };
        let payload_len = rest
            .len()
            .checked_sub(2)
            .ok_or(PacketError::MissingCrc { len: raw.len() })?;
        Ok(Self {
            toggle,
            payload: &rest[..payload_len],
        })
    }
}
