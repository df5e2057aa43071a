//! Fixed-size addressed messages.

/// Length of a frame payload, in bytes.
pub const PAYLOAD_LEN: usize = 8;

/// Length of a frame encoded as a wireless datagram, in bytes.
pub const DATAGRAM_LEN: usize = 4 + PAYLOAD_LEN;

/// Highest identifier of the standard (11-bit) format.
pub const STANDARD_ID_MAX: u32 = 0x7ff;

/// An addressed 8-byte message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Identifier of the frame; only standard identifiers are sent on the bus.
    pub identifier: u32,
    /// Payload of the frame.
    pub payload: [u8; PAYLOAD_LEN],
}

impl Frame {
    /// Creates a frame.
    #[must_use]
    pub const fn new(identifier: u32, payload: [u8; PAYLOAD_LEN]) -> Self {
        Self {
            identifier,
            payload,
        }
    }

    /// Returns whether the identifier fits the standard 11-bit format.
    #[must_use]
    pub const fn is_standard(&self) -> bool {
        self.identifier <= STANDARD_ID_MAX
    }

    /// Encodes the frame as a datagram: the identifier as a little-endian `u32`, followed by
    /// the payload.
    #[must_use]
    pub fn to_datagram(&self) -> [u8; DATAGRAM_LEN] {
        let mut datagram = [0; DATAGRAM_LEN];
        let (id, payload) = datagram.split_at_mut(4);
        id.copy_from_slice(&self.identifier.to_le_bytes());
        payload.copy_from_slice(&self.payload);
        datagram
    }

    /// Decodes a datagram produced by [`Frame::to_datagram()`].
    ///
    /// Returns `None` if `datagram` is not exactly [`DATAGRAM_LEN`] bytes long.
    #[must_use]
    pub fn from_datagram(datagram: &[u8]) -> Option<Self> {
        let (id, payload) = datagram.split_first_chunk::<4>()?;
        let payload: [u8; PAYLOAD_LEN] = payload.try_into().ok()?;
        Some(Self::new(u32::from_le_bytes(*id), payload))
    }
}
