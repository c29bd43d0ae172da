//! Device-side USB control transfer handling for bit-banged low-speed links.
//!
//! The link layer decodes tokens and data packets and calls into a [`DeviceContext`]:
//! [`DeviceContext::on_setup_token`], [`DeviceContext::on_out_token`],
//! [`DeviceContext::on_in_token`], [`DeviceContext::on_ack`] and
//! [`DeviceContext::on_data_packet`]. The context filters retransmissions with the DATA0/DATA1
//! toggle, decodes and dispatches setup requests, collects host-to-device data into caller-owned
//! buffers and answers every accepted or duplicate data packet with ACK.
//!
//! Standard GET_DESCRIPTOR and SET_ADDRESS are handled internally. Class, vendor and application
//! traffic is forwarded to a [`ControlHooks`] implementation, gated by its [`Capabilities`].
//!
//! Nothing on the packet path allocates, so the crate is usable from an interrupt handler.

pub mod buffer;
pub mod descriptor;
pub mod device;
pub mod dispatch;
pub mod endpoint;
pub mod hooks;
pub mod link;
pub mod setup;
pub mod stage;
pub mod toggle;
pub mod usb;

pub use buffer::{required_capacity, CollectBuffer, CollectError, CollectStorage};
pub use descriptor::{descriptor_key, DescriptorEntry, DescriptorError, DescriptorTable};
pub use device::DeviceContext;
pub use dispatch::Request;
pub use endpoint::{Endpoint, Transfer};
pub use hooks::{Capabilities, ControlContext, ControlHooks, NoHooks};
pub use link::LinkTx;
pub use setup::{SetupDecodeError, SetupPacket};
pub use stage::{ChunkOutcome, SetupStage};
pub use toggle::{Toggle, ToggleVerdict};
pub use usb::{DataPacket, PacketError, Pid};
