//! Input reports shared between the main loop and the packet handler.
//!
//! The main loop publishes the latest report with [`ReportSlot::store`]; IN tokens on the
//! interrupt endpoints copy out whatever is current. Byte-wise atomics keep this free of locks.
//! A report can be observed half-updated if an IN token lands mid-store.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::descriptors::{KEYBOARD_REPORT_LEN, MOUSE_REPORT_LEN};

#[derive(Debug)]
pub struct ReportSlot<const N: usize> {
    bytes: [AtomicU8; N],
}

impl<const N: usize> ReportSlot<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const ZERO: AtomicU8 = AtomicU8::new(0);

    pub const fn new() -> Self {
        Self {
            bytes: [Self::ZERO; N],
        }
    }

    pub fn store(&self, report: [u8; N]) {
        for (slot, byte) in self.bytes.iter().zip(report) {
            slot.store(byte, Ordering::Relaxed);
        }
    }

    pub fn load(&self) -> [u8; N] {
        let mut out = [0u8; N];
        for (dst, slot) in out.iter_mut().zip(&self.bytes) {
            *dst = slot.load(Ordering::Relaxed);
        }
        out
    }
}

impl<const N: usize> Default for ReportSlot<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseReport {
    /// Bit 0 left, bit 1 right, bit 2 middle.
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
}

impl MouseReport {
    pub fn to_bytes(self) -> [u8; MOUSE_REPORT_LEN] {
        [
            self.buttons & 0x07,
            self.x as u8,
            self.y as u8,
            self.wheel as u8,
        ]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; 6],
}

impl KeyboardReport {
    pub fn to_bytes(self) -> [u8; KEYBOARD_REPORT_LEN] {
        let mut out = [0u8; KEYBOARD_REPORT_LEN];
        out[0] = self.modifiers;
        out[2..].copy_from_slice(&self.keys);
        out
    }
}

/// Current input state of both interfaces.
#[derive(Debug, Default)]
pub struct InputReports {
    pub mouse: ReportSlot<MOUSE_REPORT_LEN>,
    pub keyboard: ReportSlot<KEYBOARD_REPORT_LEN>,
}

impl InputReports {
    pub const fn new() -> Self {
        Self {
            mouse: ReportSlot::new(),
            keyboard: ReportSlot::new(),
        }
    }

    pub fn set_mouse(&self, report: MouseReport) {
        self.mouse.store(report.to_bytes());
    }

    pub fn set_keyboard(&self, report: KeyboardReport) {
        self.keyboard.store(report.to_bytes());
    }
}
