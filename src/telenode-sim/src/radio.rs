use std::sync::{Arc, Mutex};

use telenode_hal::{PeerAddress, Radio, SendError};
use telenode_log::trace;

use crate::Recorder;

/// Largest datagram the simulated radio accepts, in bytes.
pub const MAX_DATAGRAM_LEN: usize = 250;

/// Simulated datagram radio recording every datagram it sends.
#[derive(Debug, Clone, Default)]
pub struct SimRadio {
    failure: Arc<Mutex<Option<SendError>>>,
    datagrams: Recorder<(PeerAddress, Vec<u8>)>,
}

impl SimRadio {
    /// Creates a radio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send fail with `failure`, or succeed again with `None`.
    pub fn set_failure(&self, failure: Option<SendError>) {
        *crate::lock(&self.failure) = failure;
    }

    /// Returns the datagrams sent so far, with their receiver.
    #[must_use]
    pub fn datagrams(&self) -> &Recorder<(PeerAddress, Vec<u8>)> {
        &self.datagrams
    }
}

impl Radio for SimRadio {
    async fn send(&mut self, peer: &PeerAddress, datagram: &[u8]) -> Result<(), SendError> {
        if datagram.len() > MAX_DATAGRAM_LEN {
            return Err(SendError::InvalidMessage);
        }
        if let Some(err) = *crate::lock(&self.failure) {
            return Err(err);
        }

        trace!("sim radio: {} bytes to {}", datagram.len(), peer);
        self.datagrams.push((*peer, datagram.to_vec()));
        Ok(())
    }
}
