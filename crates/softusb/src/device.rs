use tracing::{debug, trace, warn};

use crate::descriptor::DescriptorTable;
use crate::dispatch::{dispatch, DispatchEnv, Request};
use crate::endpoint::Endpoint;
use crate::hooks::{Capabilities, ControlContext, ControlHooks, NoHooks};
use crate::link::LinkTx;
use crate::setup::SetupPacket;
use crate::stage::{collect_chunk, route, ChunkOutcome, Route, SetupStage};
use crate::toggle::{self, Toggle, ToggleVerdict};
use crate::usb::{DataPacket, PacketError, Pid, ENDPOINT0_SIZE};

/// State of one USB device function: the endpoint table, the control stage and the latched
/// address, together with the descriptor table and extension hooks it dispatches to.
///
/// `EPS` counts every endpoint including EP0. All entry points run to completion without
/// allocating and are meant to be called from the link layer's packet handler.
pub struct DeviceContext<'buf, H, const EPS: usize> {
    current_endpoint: u8,
    stage: SetupStage,
    assigned_address: u16,
    endpoints: [Endpoint<'buf>; EPS],
    descriptors: DescriptorTable,
    hooks: H,
    capabilities: Capabilities,
}

impl<'buf, const EPS: usize> DeviceContext<'buf, NoHooks, EPS> {
    pub fn without_hooks(descriptors: DescriptorTable) -> Self {
        Self::new(descriptors, NoHooks)
    }
}

impl<'buf, H: ControlHooks<'buf>, const EPS: usize> DeviceContext<'buf, H, EPS> {
    pub fn new(descriptors: DescriptorTable, hooks: H) -> Self {
        assert!(EPS >= 1, "a device needs at least the control endpoint");
        let capabilities = hooks.capabilities();
        debug!(?capabilities, endpoints = EPS, "device context created");
        Self {
            current_endpoint: 0,
            stage: SetupStage::Idle,
            assigned_address: 0,
            endpoints: [Endpoint::new(); EPS],
            descriptors,
            hooks,
            capabilities,
        }
    }

    /// Restricts the hooks that will be called to those in `mask`.
    pub fn with_capabilities(mut self, mask: Capabilities) -> Self {
        self.capabilities &= mask;
        self
    }

    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    pub fn current_endpoint(&self) -> u8 {
        self.current_endpoint
    }

    /// Address requested by the last SET_ADDRESS. Applying it to the address filter is up to the
    /// link layer, after the status stage completes.
    pub fn assigned_address(&self) -> u16 {
        self.assigned_address
    }

    pub fn endpoint(&self, index: u8) -> Option<&Endpoint<'buf>> {
        self.endpoints.get(usize::from(index))
    }

    pub fn endpoint_mut(&mut self, index: u8) -> Option<&mut Endpoint<'buf>> {
        self.endpoints.get_mut(usize::from(index))
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Bus reset: every endpoint back to power-on state, address cleared.
    pub fn reset(&mut self) {
        self.current_endpoint = 0;
        self.stage = SetupStage::Idle;
        self.assigned_address = 0;
        self.endpoints = [Endpoint::new(); EPS];
        debug!("bus reset");
    }

    /// A SETUP token addressed to `endpoint`; the next DATA0 packet is the request.
    pub fn on_setup_token(&mut self, endpoint: u8) {
        let Some(ep) = self.endpoints.get_mut(usize::from(endpoint)) else {
            warn!(endpoint, "SETUP token for unconfigured endpoint");
            return;
        };
        ep.reset_transfer();
        ep.out_toggle = Toggle::Data0;
        ep.in_toggle = Toggle::Data1;
        self.current_endpoint = endpoint;
        self.stage = SetupStage::SetupPayloadPending;
        trace!(endpoint, "SETUP token");
    }

    pub fn on_out_token(&mut self, endpoint: u8) {
        if usize::from(endpoint) >= EPS {
            warn!(endpoint, "OUT token for unconfigured endpoint");
            return;
        }
        self.current_endpoint = endpoint;
    }

    /// The host acknowledged our last IN data packet.
    pub fn on_ack(&mut self) {
        let Some(ep) = self.endpoints.get_mut(usize::from(self.current_endpoint)) else {
            return;
        };
        ep.in_toggle.flip();
        ep.transfer_count = ep.transfer_count.wrapping_add(1);
    }

    /// Answers an IN token with exactly one packet.
    ///
    /// EP0 transfers that no hook has claimed are served from the bound source, one 8-byte chunk
    /// per token; everything else goes to the `in_request` hook. Without data, or without the
    /// hook, a zero-length packet is sent.
    pub fn on_in_token<T: LinkTx>(&mut self, endpoint: u8, tx: &mut T) {
        let Some(ep) = self.endpoints.get_mut(usize::from(endpoint)) else {
            warn!(endpoint, "IN token for unconfigured endpoint");
            tx.send_handshake(endpoint, Pid::Nak);
            return;
        };
        self.current_endpoint = endpoint;
        let pid = Pid::data(ep.in_toggle);

        if endpoint != 0 || ep.extension_claimed {
            if self.capabilities.contains(Capabilities::IN_REQUEST) {
                let mut ctx = ControlContext::new(endpoint, ep, &mut self.stage);
                self.hooks.in_request(&mut ctx, pid, tx);
            } else {
                tx.send_data(endpoint, pid, &[]);
            }
            return;
        }

        let data = ep.transfer.source().unwrap_or(&[]);
        let end = data.len().min(ep.max_length as usize);
        let start = ep.chunk_offset().min(end);
        let chunk = &data[start..end.min(start + ENDPOINT0_SIZE)];
        trace!(offset = start, len = chunk.len(), ?pid, "control IN");
        tx.send_data(endpoint, pid, chunk);
    }

    /// Handles a received data packet for `endpoint` and always answers with ACK.
    ///
    /// A packet whose toggle does not match the endpoint's expected OUT toggle is a retransmission
    /// after a lost handshake: it is acknowledged again and otherwise ignored.
    pub fn on_data_packet<T: LinkTx>(
        &mut self,
        endpoint: u8,
        payload: &[u8],
        toggle: Toggle,
        tx: &mut T,
    ) {
        self.process_data_packet(endpoint, payload, toggle);
        tx.send_handshake(endpoint, Pid::Ack);
    }

    /// Parses a raw DATA0/DATA1 packet and hands it to [`Self::on_data_packet`].
    ///
    /// Framing errors are returned without a handshake; the host times out and retries.
    pub fn on_raw_data_packet<T: LinkTx>(
        &mut self,
        endpoint: u8,
        raw: &[u8],
        tx: &mut T,
    ) -> Result<(), PacketError> {
        let packet = DataPacket::parse(raw)?;
        self.on_data_packet(endpoint, packet.payload, packet.toggle, tx);
        Ok(())
    }

    fn process_data_packet(&mut self, endpoint: u8, payload: &[u8], received: Toggle) {
        let index = usize::from(endpoint);
        if index >= EPS {
            warn!(endpoint, "data packet for unconfigured endpoint");
            return;
        }
        self.current_endpoint = endpoint;

        let ep = &mut self.endpoints[index];
        if toggle::filter(&mut ep.out_toggle, received) == ToggleVerdict::Duplicate {
            trace!(endpoint, ?received, "duplicate data packet");
            return;
        }
        trace!(endpoint, ?received, len = payload.len(), "data packet");

        match route(self.stage, endpoint, ep, payload) {
            Route::Setup => {
                self.handle_setup_payload(endpoint, payload);
            }
            Route::Collect => log_chunk(endpoint, collect_chunk(ep, payload)),
            Route::UserData => {
                if self.capabilities.contains(Capabilities::USER_DATA) {
                    let mut ctx = ControlContext::new(endpoint, ep, &mut self.stage);
                    self.hooks.user_data(&mut ctx, payload);
                } else {
                    trace!(endpoint, len = payload.len(), "user data dropped");
                }
            }
            Route::Ignore => {}
        }
    }

    fn handle_setup_payload(&mut self, endpoint: u8, payload: &[u8]) -> Option<Request> {
        let ep = &mut self.endpoints[usize::from(endpoint)];
        ep.reset_transfer();
        self.stage = SetupStage::Idle;

        let setup = match SetupPacket::decode(payload) {
            Ok(setup) => setup,
            Err(err) => {
                debug!(endpoint, %err, "setup payload dropped");
                return None;
            }
        };

        let mut ctx = ControlContext::new(endpoint, ep, &mut self.stage);
        let request = dispatch(
            &setup,
            &mut ctx,
            DispatchEnv {
                descriptors: &self.descriptors,
                hooks: &mut self.hooks,
                capabilities: self.capabilities,
                assigned_address: &mut self.assigned_address,
            },
        );
        debug!(
            endpoint,
            ?request,
            request_type = setup.request_type(),
            request_code = setup.request(),
            value = setup.value(),
            index = setup.index(),
            length = setup.length,
            "setup"
        );
        Some(request)
    }
}

fn log_chunk(endpoint: u8, outcome: ChunkOutcome) {
    match outcome {
        ChunkOutcome::Appended { offset } => trace!(endpoint, offset, "chunk appended"),
        ChunkOutcome::Completed { offset, len } => {
            debug!(endpoint, offset, len, "host-to-device transfer complete")
        }
        ChunkOutcome::Overflow { offset } => {
            debug!(endpoint, offset, "chunk past declared length dropped")
        }
        ChunkOutcome::NoSink => trace!(endpoint, "no collection buffer bound"),
        ChunkOutcome::Rejected(err) => debug!(endpoint, %err, "chunk rejected"),
    }
}
