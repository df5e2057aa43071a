use std::sync::{Arc, Mutex};

use telenode_hal::{CpuThermometer, HardwareError};

/// Simulated CPU temperature sensor.
#[derive(Debug, Clone)]
pub struct SimThermometer {
    reading: Arc<Mutex<Result<i8, HardwareError>>>,
}

impl SimThermometer {
    /// Creates a sensor reading `celsius`.
    #[must_use]
    pub fn new(celsius: i8) -> Self {
        Self {
            reading: Arc::new(Mutex::new(Ok(celsius))),
        }
    }

    /// Sets the next readings.
    pub fn set(&self, reading: Result<i8, HardwareError>) {
        *crate::lock(&self.reading) = reading;
    }
}

impl CpuThermometer for SimThermometer {
    async fn read_celsius(&mut self) -> Result<i8, HardwareError> {
        *crate::lock(&self.reading)
    }
}
