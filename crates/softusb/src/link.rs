use crate::usb::Pid;

/// Transmit side of the bit-level link.
///
/// Implementations encode, bit-stuff and drive the bus; everything here is already framed as a
/// PID plus optional payload. Calls happen inside the token turnaround budget and must not block.
pub trait LinkTx {
    /// Sends `pid`, followed by `data` and its CRC16 when `pid` is a DATA PID.
    fn transmit(&mut self, endpoint: u8, pid: Pid, data: &[u8]);

    /// Sends a zero-length handshake packet.
    fn send_handshake(&mut self, endpoint: u8, pid: Pid) {
        self.transmit(endpoint, pid, &[]);
    }

    fn send_data(&mut self, endpoint: u8, pid: Pid, data: &[u8]) {
        self.transmit(endpoint, pid, data);
    }
}

impl<T: LinkTx + ?Sized> LinkTx for &mut T {
    fn transmit(&mut self, endpoint: u8, pid: Pid, data: &[u8]) {
        (**self).transmit(endpoint, pid, data);
    }
}
