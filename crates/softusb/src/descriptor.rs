//! Static descriptor lookup for GET_DESCRIPTOR.
//!
//! Entries are keyed by the request's packed value/index word (`wValue | wIndex << 16`), so a
//! string descriptor carries its language id in the key while device/configuration/report
//! descriptors usually carry the interface number (or zero).

use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum DescriptorError {
    #[error("descriptor 0x{key:08x} declares {length} bytes but only {available} are present")]
    LengthExceedsData {
        key: u32,
        length: u16,
        available: usize,
    },

    #[error("descriptor 0x{key:08x} is {len} bytes, longer than a control transfer can carry")]
    TooLong { key: u32, len: usize },

    #[error("descriptor 0x{key:08x} at position {position} is shadowed by an earlier entry")]
    Shadowed { key: u32, position: usize },
}

/// Builds a lookup key from the descriptor type/index (`wValue`) and `wIndex`.
pub const fn descriptor_key(desc_type: u8, desc_index: u8, w_index: u16) -> u32 {
    (desc_index as u32) | ((desc_type as u32) << 8) | ((w_index as u32) << 16)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DescriptorEntry {
    pub key: u32,
    pub data: &'static [u8],
    pub length: u16,
}

impl DescriptorEntry {
    /// An entry whose length is the full size of `data`.
    ///
    /// `data` longer than `u16::MAX` is truncated here; [`DescriptorTable::validate`] reports it.
    pub const fn new(key: u32, data: &'static [u8]) -> Self {
        let length = if data.len() > u16::MAX as usize {
            u16::MAX
        } else {
            data.len() as u16
        };
        Self { key, data, length }
    }

    pub const fn with_length(key: u32, data: &'static [u8], length: u16) -> Self {
        Self { key, data, length }
    }

    /// The bytes a GET_DESCRIPTOR for this entry may return.
    pub fn bytes(&self) -> &'static [u8] {
        let len = (self.length as usize).min(self.data.len());
        &self.data[..len]
    }
}

/// An ordered descriptor table; the first entry with a matching key wins.
#[derive(Clone, Copy, Debug)]
pub struct DescriptorTable {
    entries: &'static [DescriptorEntry],
}

impl DescriptorTable {
    pub const EMPTY: Self = Self { entries: &[] };

    pub const fn new(entries: &'static [DescriptorEntry]) -> Self {
        Self { entries }
    }

    pub fn resolve(&self, key: u32) -> Option<&'static DescriptorEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn entries(&self) -> &'static [DescriptorEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Integration-time sanity check; the packet path never calls this.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        for (position, entry) in self.entries.iter().enumerate() {
            if entry.data.len() > u16::MAX as usize {
                return Err(DescriptorError::TooLong {
                    key: entry.key,
                    len: entry.data.len(),
                });
            }
            if entry.length as usize > entry.data.len() {
                return Err(DescriptorError::LengthExceedsData {
                    key: entry.key,
                    length: entry.length,
                    available: entry.data.len(),
                });
            }
            if self.entries[..position].iter().any(|e| e.key == entry.key) {
                return Err(DescriptorError::Shadowed {
                    key: entry.key,
                    position,
                });
            }
        }
        Ok(())
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::EMPTY
    }
}
