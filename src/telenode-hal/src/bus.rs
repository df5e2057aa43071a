use core::future::Future;

use embassy_time::Duration;

use crate::{BusError, Frame, SendError};

/// Timeout value for queuing a frame on the bus.
///
/// Controllers are allowed to time out earlier.
pub const SEND_TIMEOUT: Duration = Duration::from_millis(1000);

/// Controller of the wired bus.
pub trait BusController {
    /// Starts the controller.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`] if the controller could not be brought up; the node cannot run
    /// without its bus.
    fn start(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Queues `frame` for transmission, waiting at most `timeout` for room in the transmit
    /// queue.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Timeout`] if the frame could not be queued in time,
    /// [`SendError::InvalidMessage`] if its identifier is not standard, or another
    /// [`SendError`] if the controller is not operational.
    fn send(
        &mut self,
        frame: &Frame,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), SendError>>;
}
