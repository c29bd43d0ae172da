//! Data-toggle synchronization for OUT/SETUP data packets.
//!
//! A host that loses our ACK retransmits the same packet with the same toggle. Accepting only
//! packets whose parity matches the expected toggle (and flipping it on acceptance) filters those
//! retransmissions out while still letting the host see an ACK for them.

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Toggle {
    #[default]
    Data0,
    Data1,
}

impl Toggle {
    pub fn flipped(self) -> Self {
        match self {
            Toggle::Data0 => Toggle::Data1,
            Toggle::Data1 => Toggle::Data0,
        }
    }

    pub fn flip(&mut self) {
        *self = self.flipped();
    }

    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Toggle::Data1
        } else {
            Toggle::Data0
        }
    }

    pub fn bit(self) -> bool {
        self == Toggle::Data1
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToggleVerdict {
    /// Fresh packet; the expected toggle has already been advanced.
    Accept,
    /// Retransmission of the previously accepted packet.
    Duplicate,
}

/// Checks `received` against `expected`, flipping `expected` only on a match.
pub fn filter(expected: &mut Toggle, received: Toggle) -> ToggleVerdict {
    if *expected != received {
        return ToggleVerdict::Duplicate;
    }
    expected.flip();
    ToggleVerdict::Accept
}
