use core::future::Future;

use crate::HardwareError;

/// CPU-internal temperature sensor.
pub trait CpuThermometer {
    /// Returns the die temperature, in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns a [`HardwareError`] if the sensor could not be read.
    fn read_celsius(&mut self) -> impl Future<Output = Result<i8, HardwareError>>;
}
