//! Composite HID mouse + keyboard built on `softusb`.
//!
//! ```ignore
//! static REPORTS: InputReports = InputReports::new();
//! let mut dev = composite_device(&REPORTS, NoBootloader);
//! // From the link layer's packet handler:
//! dev.on_setup_token(0);
//! dev.on_data_packet(0, payload, toggle, &mut link);
//! // From the main loop:
//! REPORTS.set_mouse(MouseReport { x: 1, ..Default::default() });
//! ```

pub mod bootloader;
pub mod control;
pub mod descriptors;
pub mod reports;

pub use bootloader::{BootloaderEntry, NoBootloader, RebootState};
pub use control::{composite_device, CompositeDevice, HidControl, ENDPOINTS};
pub use descriptors::DESCRIPTORS;
pub use reports::{InputReports, KeyboardReport, MouseReport, ReportSlot};
