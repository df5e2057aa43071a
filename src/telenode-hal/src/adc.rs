use core::future::Future;

use crate::{Channel, HardwareError};

/// Analog front end sampling the sensor channels.
pub trait AnalogFrontEnd {
    /// Returns the calibrated voltage of `channel`, in millivolts on the sensor side, i.e.,
    /// after undoing the [`InputDivider`](crate::InputDivider).
    ///
    /// # Errors
    ///
    /// Returns a [`HardwareError`] if the conversion failed.
    fn read_calibrated(
        &mut self,
        channel: Channel,
    ) -> impl Future<Output = Result<u16, HardwareError>>;
}
