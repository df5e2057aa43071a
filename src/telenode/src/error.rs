use telenode_convert::ConversionError;
use telenode_hal::{BusError, Channel, ChannelOutOfRange, HardwareError};

/// Errors recovered locally by the jobs.
///
/// None of them stops the node: each one is replaced by its sentinel value (0 mV for a
/// voltage, −128 °C for a temperature, the previous snapshot for a store read) and only shows
/// up in the field of the frame it affects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A channel number is not below [`CHANNEL_COUNT`](telenode_hal::CHANNEL_COUNT).
    ChannelOutOfRange(u8),
    /// No calibration is configured for the channel.
    CalibrationMissing(Channel),
    /// The hardware could not be read.
    HardwareReadFailure(HardwareError),
    /// A value is outside the domain of its conversion.
    ConversionInvalidInput,
    /// A store lock could not be acquired in time.
    LockTimeout,
}

impl From<ChannelOutOfRange> for Error {
    fn from(err: ChannelOutOfRange) -> Self {
        Self::ChannelOutOfRange(err.0)
    }
}

impl From<HardwareError> for Error {
    fn from(err: HardwareError) -> Self {
        Self::HardwareReadFailure(err)
    }
}

impl From<ConversionError> for Error {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidInput => Self::ConversionInvalidInput,
        }
    }
}

impl From<embassy_time::TimeoutError> for Error {
    fn from(_: embassy_time::TimeoutError) -> Self {
        Self::LockTimeout
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ChannelOutOfRange(number) => write!(f, "channel {number} out of range"),
            Self::CalibrationMissing(channel) => write!(f, "no calibration for {channel}"),
            Self::HardwareReadFailure(err) => write!(f, "hardware read failure: {err}"),
            Self::ConversionInvalidInput => write!(f, "invalid conversion input"),
            Self::LockTimeout => write!(f, "lock timeout"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::HardwareReadFailure(err) => Some(err),
            _ => None,
        }
    }
}

/// Fatal errors at startup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The bus controller could not be started.
    Bus(BusError),
}

impl From<BusError> for InitError {
    fn from(err: BusError) -> Self {
        Self::Bus(err)
    }
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "bus startup failed: {err}"),
        }
    }
}

impl core::error::Error for InitError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Bus(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(
            Error::from(ChannelOutOfRange(12)),
            Error::ChannelOutOfRange(12)
        );
        assert_eq!(
            Error::from(ConversionError::InvalidInput),
            Error::ConversionInvalidInput
        );
        assert_eq!(
            Error::from(HardwareError::Timeout),
            Error::HardwareReadFailure(HardwareError::Timeout)
        );
        assert_eq!(
            InitError::from(BusError::Start).to_string(),
            "bus startup failed: failed to start the bus controller"
        );
    }
}
