//! Host-initiated reboot into the on-chip bootloader.
//!
//! The host first sends a feature report write whose value/index is [`ARM_VALUE_INDEX`], then an
//! EP0 data packet starting with [`REBOOT_MAGIC`]. The IN token that follows is answered with a
//! zero-length packet and the board jumps to its bootloader. Any other EP0 data in between
//! disarms.

use tracing::debug;

/// `wValue | wIndex << 16` of the arming SET_REPORT.
pub const ARM_VALUE_INDEX: u32 = 0x0000_03FD;

pub const REBOOT_MAGIC: [u8; 7] = [0xFD, 0x12, 0x34, 0xAA, 0xBB, 0xCC, 0xDD];

/// Board-specific bootloader jump. On hardware this usually does not return.
pub trait BootloaderEntry {
    fn enter(&mut self);
}

impl<F: FnMut()> BootloaderEntry for F {
    fn enter(&mut self) {
        self()
    }
}

/// For boards without a bootloader: arming still works, the final jump does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBootloader;

impl BootloaderEntry for NoBootloader {
    fn enter(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RebootState {
    #[default]
    Disarmed,
    Armed,
    /// Magic received; the next control IN reboots.
    Pending,
}

impl RebootState {
    pub fn arm(&mut self) {
        debug!("bootloader reboot armed");
        *self = RebootState::Armed;
    }

    /// Feeds one EP0 user data packet. Returns true when it completes the sequence.
    pub fn on_control_data(&mut self, payload: &[u8]) -> bool {
        match self {
            RebootState::Disarmed => false,
            _ if payload.starts_with(&REBOOT_MAGIC) => {
                debug!("bootloader reboot pending");
                *self = RebootState::Pending;
                true
            }
            _ => {
                debug!("bootloader reboot disarmed");
                *self = RebootState::Disarmed;
                false
            }
        }
    }
}
