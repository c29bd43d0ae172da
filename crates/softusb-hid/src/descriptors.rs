//! Static descriptors for a low-speed composite device: a boot-style mouse on interface 0 (EP1 IN)
//! and a keyboard on interface 1 (EP2 IN).

use softusb::usb::{
    DESC_CONFIGURATION, DESC_DEVICE, DESC_ENDPOINT, DESC_HID, DESC_INTERFACE, DESC_REPORT,
    DESC_STRING,
};
use softusb::{descriptor_key, DescriptorEntry, DescriptorTable};

pub const LANGID_EN_US: u16 = 0x0409;

pub const MOUSE_INTERFACE: u16 = 0;
pub const KEYBOARD_INTERFACE: u16 = 1;

pub const MOUSE_ENDPOINT: u8 = 1;
pub const KEYBOARD_ENDPOINT: u8 = 2;

pub const MOUSE_REPORT_LEN: usize = 4;
pub const KEYBOARD_REPORT_LEN: usize = 8;

const MOUSE_REPORT_DESCRIPTOR_LEN: u16 = 52;
const KEYBOARD_REPORT_DESCRIPTOR_LEN: u16 = 63;

pub static DEVICE_DESCRIPTOR: [u8; 18] = [
    18,
    DESC_DEVICE,
    0x10,
    0x01, // bcdUSB 1.10
    0x00,
    0x00,
    0x00, // class comes from the interfaces
    0x08, // bMaxPacketSize0, fixed for low speed
    0x09,
    0x12, // idVendor
    0x03,
    0xC0, // idProduct
    0x02,
    0x00, // bcdDevice
    1,
    2,
    3,
    1,
];

pub static MOUSE_REPORT_DESCRIPTOR: [u8; MOUSE_REPORT_DESCRIPTOR_LEN as usize] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data,Var,Abs) Button bits
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x01, //     Input (Const,Array,Abs) Padding
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x03, //     Report Count (3)
    0x81, 0x06, //     Input (Data,Var,Rel) X,Y,Wheel
    0xC0, //   End Collection
    0xC0, // End Collection
];

pub static KEYBOARD_REPORT_DESCRIPTOR: [u8; KEYBOARD_REPORT_DESCRIPTOR_LEN as usize] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x07, // Usage Page (Keyboard/Keypad)
    0x19, 0xE0, // Usage Minimum (Left Control)
    0x29, 0xE7, // Usage Maximum (Right GUI)
    0x15, 0x00, // Logical Minimum (0)
    0x25, 0x01, // Logical Maximum (1)
    0x75, 0x01, // Report Size (1)
    0x95, 0x08, // Report Count (8)
    0x81, 0x02, // Input (Data,Var,Abs) Modifier byte
    0x95, 0x01, // Report Count (1)
    0x75, 0x08, // Report Size (8)
    0x81, 0x01, // Input (Const,Array,Abs) Reserved byte
    0x95, 0x05, // Report Count (5)
    0x75, 0x01, // Report Size (1)
    0x05, 0x08, // Usage Page (LEDs)
    0x19, 0x01, // Usage Minimum (Num Lock)
    0x29, 0x05, // Usage Maximum (Kana)
    0x91, 0x02, // Output (Data,Var,Abs) LED report
    0x95, 0x01, // Report Count (1)
    0x75, 0x03, // Report Size (3)
    0x91, 0x01, // Output (Const,Array,Abs) LED padding
    0x95, 0x06, // Report Count (6)
    0x75, 0x08, // Report Size (8)
    0x15, 0x00, // Logical Minimum (0)
    0x25, 0x65, // Logical Maximum (101)
    0x05, 0x07, // Usage Page (Keyboard/Keypad)
    0x19, 0x00, // Usage Minimum (0)
    0x29, 0x65, // Usage Maximum (101)
    0x81, 0x00, // Input (Data,Array,Abs) Key arrays (6 bytes)
    0xC0, // End Collection
];

const CONFIG_TOTAL_LEN: u16 = 59;

pub static CONFIGURATION_DESCRIPTOR: [u8; CONFIG_TOTAL_LEN as usize] = {
    let [tl0, tl1] = CONFIG_TOTAL_LEN.to_le_bytes();
    let [ml0, ml1] = MOUSE_REPORT_DESCRIPTOR_LEN.to_le_bytes();
    let [kl0, kl1] = KEYBOARD_REPORT_DESCRIPTOR_LEN.to_le_bytes();
    [
        // Configuration descriptor.
        9,
        DESC_CONFIGURATION,
        tl0,
        tl1,
        2, // bNumInterfaces
        1,
        0,
        0x80, // bus powered
        0x64, // 200 mA
        // Mouse interface.
        9,
        DESC_INTERFACE,
        MOUSE_INTERFACE as u8,
        0,
        1,
        0x03, // HID
        0x01, // boot subclass
        0x02, // mouse
        0,
        9,
        DESC_HID,
        0x10,
        0x01,
        0,
        1,
        DESC_REPORT,
        ml0,
        ml1,
        7,
        DESC_ENDPOINT,
        0x80 | MOUSE_ENDPOINT,
        0x03, // interrupt
        MOUSE_REPORT_LEN as u8,
        0,
        10,
        // Keyboard interface.
        9,
        DESC_INTERFACE,
        KEYBOARD_INTERFACE as u8,
        0,
        1,
        0x03,
        0x01,
        0x01, // keyboard
        0,
        9,
        DESC_HID,
        0x10,
        0x01,
        0,
        1,
        DESC_REPORT,
        kl0,
        kl1,
        7,
        DESC_ENDPOINT,
        0x80 | KEYBOARD_ENDPOINT,
        0x03,
        KEYBOARD_REPORT_LEN as u8,
        0,
        10,
    ]
};

/// Encodes an ASCII string as a USB string descriptor. `N` must be `2 + 2 * s.len()`.
const fn ascii_string_descriptor<const N: usize>(s: &[u8]) -> [u8; N] {
    assert!(N == 2 + 2 * s.len() && N <= u8::MAX as usize);
    let mut out = [0u8; N];
    out[0] = N as u8;
    out[1] = DESC_STRING;
    let mut i = 0;
    while i < s.len() {
        assert!(s[i].is_ascii());
        out[2 + 2 * i] = s[i];
        i += 1;
    }
    out
}

pub static STRING_LANGIDS: [u8; 4] = {
    let [l0, l1] = LANGID_EN_US.to_le_bytes();
    [4, DESC_STRING, l0, l1]
};
pub static STRING_MANUFACTURER: [u8; 16] = ascii_string_descriptor(b"softusb");
pub static STRING_PRODUCT: [u8; 28] = ascii_string_descriptor(b"HID Composite");
pub static STRING_SERIAL: [u8; 8] = ascii_string_descriptor(b"000");

static ENTRIES: [DescriptorEntry; 8] = [
    DescriptorEntry::new(descriptor_key(DESC_DEVICE, 0, 0), &DEVICE_DESCRIPTOR),
    DescriptorEntry::new(
        descriptor_key(DESC_CONFIGURATION, 0, 0),
        &CONFIGURATION_DESCRIPTOR,
    ),
    DescriptorEntry::new(
        descriptor_key(DESC_REPORT, 0, MOUSE_INTERFACE),
        &MOUSE_REPORT_DESCRIPTOR,
    ),
    DescriptorEntry::new(
        descriptor_key(DESC_REPORT, 0, KEYBOARD_INTERFACE),
        &KEYBOARD_REPORT_DESCRIPTOR,
    ),
    DescriptorEntry::new(descriptor_key(DESC_STRING, 0, 0), &STRING_LANGIDS),
    DescriptorEntry::new(
        descriptor_key(DESC_STRING, 1, LANGID_EN_US),
        &STRING_MANUFACTURER,
    ),
    DescriptorEntry::new(
        descriptor_key(DESC_STRING, 2, LANGID_EN_US),
        &STRING_PRODUCT,
    ),
    DescriptorEntry::new(
        descriptor_key(DESC_STRING, 3, LANGID_EN_US),
        &STRING_SERIAL,
    ),
];

pub static DESCRIPTORS: DescriptorTable = DescriptorTable::new(&ENTRIES);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_consistent() {
        assert_eq!(DESCRIPTORS.validate(), Ok(()));
        assert_eq!(DESCRIPTORS.len(), 8);
    }

    #[test]
    fn keys_match_wire_layout() {
        let key = |k: u32| DESCRIPTORS.resolve(k).map(|e| e.data.as_ptr());
        assert_eq!(key(0x0000_0100), Some(DEVICE_DESCRIPTOR.as_ptr()));
        assert_eq!(key(0x0000_0200), Some(CONFIGURATION_DESCRIPTOR.as_ptr()));
        assert_eq!(key(0x0000_2200), Some(MOUSE_REPORT_DESCRIPTOR.as_ptr()));
        assert_eq!(key(0x0001_2200), Some(KEYBOARD_REPORT_DESCRIPTOR.as_ptr()));
        assert_eq!(key(0x0000_0300), Some(STRING_LANGIDS.as_ptr()));
        assert_eq!(key(0x0409_0302), Some(STRING_PRODUCT.as_ptr()));
        assert_eq!(key(0x0409_0304), None);
    }

    #[test]
    fn configuration_embeds_report_lengths() {
        let cfg = &CONFIGURATION_DESCRIPTOR;
        assert_eq!(u16::from_le_bytes([cfg[2], cfg[3]]) as usize, cfg.len());
        // HID descriptors start after config (9) + interface (9), and again 25 bytes later.
        assert_eq!(cfg[18 + 1], DESC_HID);
        assert_eq!(
            u16::from_le_bytes([cfg[18 + 7], cfg[18 + 8]]) as usize,
            MOUSE_REPORT_DESCRIPTOR.len()
        );
        assert_eq!(cfg[43 + 1], DESC_HID);
        assert_eq!(
            u16::from_le_bytes([cfg[43 + 7], cfg[43 + 8]]) as usize,
            KEYBOARD_REPORT_DESCRIPTOR.len()
        );
    }

    #[test]
    fn string_descriptors_are_utf16le() {
        assert_eq!(&STRING_SERIAL, &[8, DESC_STRING, b'0', 0, b'0', 0, b'0', 0]);
        assert_eq!(STRING_MANUFACTURER[0] as usize, STRING_MANUFACTURER.len());
        assert_eq!(&STRING_LANGIDS, &[4, 3, 0x09, 0x04]);
    }
}
