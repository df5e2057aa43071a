/// Error returned by the analog front end and the CPU thermometer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum HardwareError {
    /// The conversion did not complete in time.
    Timeout,
    /// The peripheral is not available (not installed, or used by something else).
    Unavailable,
    /// The peripheral returned a value that cannot be calibrated.
    InvalidReading,
}

impl core::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "hardware read timed out"),
            Self::Unavailable => write!(f, "peripheral unavailable"),
            Self::InvalidReading => write!(f, "invalid hardware reading"),
        }
    }
}

impl core::error::Error for HardwareError {}

/// Error returned when starting the bus controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum BusError {
    /// The driver could not be installed.
    Install,
    /// The controller could not be started.
    Start,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Install => write!(f, "failed to install the bus driver"),
            Self::Start => write!(f, "failed to start the bus controller"),
        }
    }
}

impl core::error::Error for BusError {}

/// Error returned when sending a frame or a datagram.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum SendError {
    /// The message could not be queued before the timeout.
    Timeout,
    /// The link is not started.
    NotStarted,
    /// The controller is in bus-off state.
    BusOff,
    /// The message cannot be sent on this link (e.g., an extended identifier on a standard-only
    /// bus, or an oversized datagram).
    InvalidMessage,
    /// An other error occurred.
    Other,
}

impl core::fmt::Display for SendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "send timed out"),
            Self::NotStarted => write!(f, "link not started"),
            Self::BusOff => write!(f, "bus off"),
            Self::InvalidMessage => write!(f, "invalid message"),
            Self::Other => write!(f, "send failed"),
        }
    }
}

impl core::error::Error for SendError {}
