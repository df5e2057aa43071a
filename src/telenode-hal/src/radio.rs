use core::future::Future;

use crate::SendError;

/// Hardware address of a wireless peer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerAddress(pub [u8; 6]);

impl PeerAddress {
    /// Broadcast address.
    pub const BROADCAST: Self = Self([0xff; 6]);

    /// Creates an address from its bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Returns the bytes of the address.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 6] {
        self.0
    }
}

impl core::fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Connectionless datagram radio.
///
/// Delivery is best effort: there is no acknowledgement nor retry.
pub trait Radio {
    /// Sends `datagram` to `peer`.
    ///
    /// # Errors
    ///
    /// Returns a [`SendError`] if the datagram could not be handed over to the radio.
    fn send(
        &mut self,
        peer: &PeerAddress,
        datagram: &[u8],
    ) -> impl Future<Output = Result<(), SendError>>;
}
