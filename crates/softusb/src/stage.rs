//! Control transfer stage tracking and host-to-device data collection.

use crate::buffer::CollectError;
use crate::endpoint::Endpoint;
use crate::usb::ENDPOINT0_SIZE;

/// Where the device is within a control transfer.
///
/// `SetupPayloadPending` is entered by the SETUP token handler; every other transition is made by
/// the data-packet path.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SetupStage {
    #[default]
    Idle,
    /// A SETUP token was seen; the next accepted data packet is the 8-byte request.
    SetupPayloadPending,
    /// Host-to-device data stage; accepted packets are appended to the endpoint's sink.
    CollectingHostToDevice,
}

/// How an accepted data packet is consumed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Route {
    Setup,
    Collect,
    UserData,
    Ignore,
}

pub(crate) fn route(stage: SetupStage, index: u8, ep: &Endpoint<'_>, payload: &[u8]) -> Route {
    match stage {
        SetupStage::SetupPayloadPending => Route::Setup,
        SetupStage::CollectingHostToDevice if ep.transfer.sink().is_some() => Route::Collect,
        _ if index != 0 || !payload.is_empty() => Route::UserData,
        // Zero-length OUT on EP0 is a status stage; nothing to do beyond the ACK.
        _ => Route::Ignore,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChunkOutcome {
    Appended { offset: usize },
    /// The chunk reached the declared length; the buffer header now holds it.
    Completed { offset: usize, len: u32 },
    /// The host sent more than it declared; the chunk was dropped.
    Overflow { offset: usize },
    NoSink,
    Rejected(CollectError),
}

/// Appends one 8-byte chunk of `payload` to the endpoint's sink at `transfer_count * 8`.
pub fn collect_chunk(ep: &mut Endpoint<'_>, payload: &[u8]) -> ChunkOutcome {
    let Some(sink) = ep.transfer.sink() else {
        return ChunkOutcome::NoSink;
    };

    let offset = ep.chunk_offset();
    let max_length = ep.max_length as usize;
    if offset >= max_length {
        return ChunkOutcome::Overflow { offset };
    }

    if let Err(err) = sink.write_chunk(offset, payload) {
        return ChunkOutcome::Rejected(err);
    }
    ep.transfer_count = ep.transfer_count.wrapping_add(1);

    if offset + ENDPOINT0_SIZE >= max_length {
        sink.mark_complete(ep.max_length);
        ChunkOutcome::Completed {
            offset,
            len: ep.max_length,
        }
    } else {
        ChunkOutcome::Appended { offset }
    }
}
