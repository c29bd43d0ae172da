use crate::buffer::CollectBuffer;
use crate::toggle::Toggle;

/// What the current transfer on an endpoint reads from or writes into.
///
/// Neither variant owns its memory: sources are usually static descriptor data, sinks belong to
/// whoever started the host-to-device transfer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Transfer<'buf> {
    #[default]
    None,
    /// Device-to-host data.
    Source(&'buf [u8]),
    /// Host-to-device destination.
    Sink(CollectBuffer<'buf>),
}

impl<'buf> Transfer<'buf> {
    pub fn is_none(&self) -> bool {
        matches!(self, Transfer::None)
    }

    pub fn source(&self) -> Option<&'buf [u8]> {
        match *self {
            Transfer::Source(data) => Some(data),
            _ => None,
        }
    }

    pub fn sink(&self) -> Option<CollectBuffer<'buf>> {
        match *self {
            Transfer::Sink(buf) => Some(buf),
            _ => None,
        }
    }
}

/// Per-endpoint transfer state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Endpoint<'buf> {
    /// Parity the next accepted OUT/SETUP data packet must carry.
    pub out_toggle: Toggle,
    /// Parity of the next IN data packet we send.
    pub in_toggle: Toggle,
    /// 8-byte chunks moved in the current transfer.
    pub transfer_count: u32,
    /// Upper bound on the current transfer in bytes; 0 when nothing is bound.
    pub max_length: u32,
    pub transfer: Transfer<'buf>,
    /// An extension hook owns the semantics of this transfer.
    pub extension_claimed: bool,
}

impl<'buf> Endpoint<'buf> {
    pub const fn new() -> Self {
        Self {
            out_toggle: Toggle::Data0,
            in_toggle: Toggle::Data0,
            transfer_count: 0,
            max_length: 0,
            transfer: Transfer::None,
            extension_claimed: false,
        }
    }

    /// Clears everything a control transfer accumulates; toggles are left alone.
    pub fn reset_transfer(&mut self) {
        self.transfer_count = 0;
        self.max_length = 0;
        self.transfer = Transfer::None;
        self.extension_claimed = false;
    }

    /// Byte offset of the next chunk within the transfer.
    pub fn chunk_offset(&self) -> usize {
        self.transfer_count as usize * crate::usb::ENDPOINT0_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CollectStorage;

    #[test]
    fn reset_transfer_keeps_toggles() {
        static DATA: [u8; 4] = [1, 2, 3, 4];
        let mut ep = Endpoint::new();
        ep.out_toggle = Toggle::Data1;
        ep.in_toggle = Toggle::Data1;
        ep.transfer_count = 3;
        ep.max_length = 4;
        ep.transfer = Transfer::Source(&DATA);
        ep.extension_claimed = true;

        ep.reset_transfer();
        assert_eq!(ep.transfer_count, 0);
        assert_eq!(ep.max_length, 0);
        assert!(ep.transfer.is_none());
        assert!(!ep.extension_claimed);
        assert_eq!(ep.out_toggle, Toggle::Data1);
        assert_eq!(ep.in_toggle, Toggle::Data1);
    }

    #[test]
    fn transfer_accessors() {
        let storage = CollectStorage::<8>::new();
        let sink = Transfer::Sink(storage.buffer());
        assert!(sink.source().is_none());
        assert!(sink.sink().is_some());

        let src = Transfer::Source(&[9, 9]);
        assert_eq!(src.source(), Some(&[9u8, 9][..]));
        assert!(src.sink().is_none());
    }

    #[test]
    fn chunk_offset_is_eight_per_chunk() {
        let mut ep = Endpoint::new();
        ep.transfer_count = 2;
        assert_eq!(ep.chunk_offset(), 16);
    }
}
