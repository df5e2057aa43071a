use std::sync::{Arc, Mutex};

use embassy_time::{Duration, Timer};
use telenode_hal::{BusController, BusError, Frame, SendError};
use telenode_log::{debug, info};

use crate::Recorder;

#[derive(Debug, Default)]
struct BusState {
    started: bool,
    start_failure: Option<BusError>,
    blocked: bool,
}

/// Simulated bus controller recording every frame it sends.
#[derive(Debug, Clone, Default)]
pub struct SimBus {
    state: Arc<Mutex<BusState>>,
    frames: Recorder<Frame>,
}

impl SimBus {
    /// Creates a controller that starts successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a controller that fails to start with `err`.
    #[must_use]
    pub fn failing_start(err: BusError) -> Self {
        let bus = Self::default();
        crate::lock(&bus.state).start_failure = Some(err);
        bus
    }

    /// Makes the transmit queue full (`true`) or drains it (`false`).
    ///
    /// While the queue is full, every send times out.
    pub fn set_blocked(&self, blocked: bool) {
        crate::lock(&self.state).blocked = blocked;
    }

    /// Returns whether the controller was started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        crate::lock(&self.state).started
    }

    /// Returns the frames sent so far.
    #[must_use]
    pub fn frames(&self) -> &Recorder<Frame> {
        &self.frames
    }
}

impl BusController for SimBus {
    async fn start(&mut self) -> Result<(), BusError> {
        let mut state = crate::lock(&self.state);
        if let Some(err) = state.start_failure {
            return Err(err);
        }
        state.started = true;
        info!("sim bus: started");
        Ok(())
    }

    async fn send(&mut self, frame: &Frame, timeout: Duration) -> Result<(), SendError> {
        let (started, blocked) = {
            let state = crate::lock(&self.state);
            (state.started, state.blocked)
        };

        if !started {
            return Err(SendError::NotStarted);
        }
        if !frame.is_standard() {
            return Err(SendError::InvalidMessage);
        }
        if blocked {
            Timer::after(timeout).await;
            return Err(SendError::Timeout);
        }

        debug!("sim bus: {:#05x} {:02x?}", frame.identifier, frame.payload);
        self.frames.push(*frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;

    #[test]
    fn test_send_requires_start() {
        let mut bus = SimBus::new();
        let frame = Frame::new(0x76c, [1; 8]);

        block_on(async {
            assert_eq!(
                bus.send(&frame, Duration::from_millis(1)).await,
                Err(SendError::NotStarted)
            );
            bus.start().await.unwrap();
            bus.send(&frame, Duration::from_millis(1)).await.unwrap();
            assert_eq!(
                bus.send(&Frame::new(0x1000, [0; 8]), Duration::from_millis(1))
                    .await,
                Err(SendError::InvalidMessage)
            );
        });
        assert_eq!(bus.frames().values(), [frame]);
    }

    #[test]
    fn test_blocked_queue_times_out() {
        let mut bus = SimBus::new();
        bus.set_blocked(true);

        block_on(async {
            bus.start().await.unwrap();
            assert_eq!(
                bus.send(&Frame::new(0x76c, [0; 8]), Duration::from_millis(2))
                    .await,
                Err(SendError::Timeout)
            );
        });
        assert!(bus.frames().is_empty());
    }

    #[test]
    fn test_failing_start() {
        let mut bus = SimBus::failing_start(BusError::Install);
        assert_eq!(block_on(bus.start()), Err(BusError::Install));
        assert!(!bus.is_started());
    }
}
