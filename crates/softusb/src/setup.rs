use thiserror::Error;

pub const SETUP_PACKET_LEN: usize = 8;

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum SetupDecodeError {
    #[error("setup payload is {len} bytes, expected {SETUP_PACKET_LEN}")]
    Truncated { len: usize },
}

/// The 8-byte SETUP payload of a control transfer, kept in the packed little-endian grouping the
/// dispatcher matches on.
///
/// No field is validated; reserved or out-of-range values are passed through as received.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct SetupPacket {
    /// `bmRequestType` in the low byte, `bRequest` in the high byte.
    pub request_type_and_request: u16,
    /// `wValue` in the low half, `wIndex` in the high half.
    pub value_index: u32,
    /// `wLength`: bytes the host expects to move in the data stage.
    pub length: u16,
}

impl SetupPacket {
    pub fn new(request_type: u8, request: u8, value: u16, index: u16, length: u16) -> Self {
        Self {
            request_type_and_request: u16::from_le_bytes([request_type, request]),
            value_index: u32::from(value) | (u32::from(index) << 16),
            length,
        }
    }

    pub fn parse(bytes: &[u8; SETUP_PACKET_LEN]) -> Self {
        Self {
            request_type_and_request: u16::from_le_bytes([bytes[0], bytes[1]]),
            value_index: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
            length: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }

    /// Decodes the leading 8 bytes of `payload`; anything past them is ignored.
    pub fn decode(payload: &[u8]) -> Result<Self, SetupDecodeError> {
        let bytes: &[u8; SETUP_PACKET_LEN] = payload
            .get(..SETUP_PACKET_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or(SetupDecodeError::Truncated { len: payload.len() })?;
        Ok(Self::parse(bytes))
    }

    pub fn to_bytes(&self) -> [u8; SETUP_PACKET_LEN] {
        let [rt, rq] = self.request_type_and_request.to_le_bytes();
        let [v0, v1, i0, i1] = self.value_index.to_le_bytes();
        let [l0, l1] = self.length.to_le_bytes();
        [rt, rq, v0, v1, i0, i1, l0, l1]
    }

    pub fn request_type(&self) -> u8 {
        self.request_type_and_request as u8
    }

    pub fn request(&self) -> u8 {
        (self.request_type_and_request >> 8) as u8
    }

    pub fn value(&self) -> u16 {
        self.value_index as u16
    }

    pub fn index(&self) -> u16 {
        (self.value_index >> 16) as u16
    }

    pub fn is_device_to_host(&self) -> bool {
        self.request_type() & 0x80 != 0
    }
}
