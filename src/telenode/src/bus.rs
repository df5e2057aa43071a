//! Bus transmitter.
//!
//! Sends the [`BUS_FRAME_COUNT`] frames of a cycle with a fixed spacing, then idles.
//! Each frame is built from fresh store snapshots, so a cycle may mix values of consecutive
//! acquisitions.

use embassy_time::{with_timeout, Duration, Timer};
use telenode_hal::{BusController, CpuThermometer, SendError, CHANNEL_COUNT};
use telenode_log::{trace, warn};

use crate::{
    config::{BusConfig, TemperatureConfig, PRESSURE_CHANNEL_COUNT},
    layout::{self, Telemetry, BUS_FRAME_COUNT},
    store::{CachedReader, PressureStore, VoltageStore},
    PeriodicJob,
};

/// CPU temperature sent when the internal sensor cannot be read.
pub const CPU_FAULT_CELSIUS: i8 = i8::MIN;

/// Sends the telemetry on the bus.
pub struct BusTransmitter<'a, B, T> {
    bus: B,
    thermometer: T,
    voltages: CachedReader<'a, u16, CHANNEL_COUNT>,
    pressures: CachedReader<'a, u16, PRESSURE_CHANNEL_COUNT>,
    config: BusConfig,
    temperature: TemperatureConfig,
}

impl<'a, B: BusController, T: CpuThermometer> BusTransmitter<'a, B, T> {
    /// Creates the job; `bus` must already be started.
    #[must_use]
    pub fn new(
        bus: B,
        thermometer: T,
        voltages: &'a VoltageStore,
        pressures: &'a PressureStore,
        config: BusConfig,
        temperature: TemperatureConfig,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            bus,
            thermometer,
            voltages: CachedReader::new(voltages, lock_timeout),
            pressures: CachedReader::new(pressures, lock_timeout),
            config,
            temperature,
        }
    }

    /// Reads the CPU temperature, or [`CPU_FAULT_CELSIUS`].
    pub async fn cpu_celsius(&mut self) -> i8 {
        match self.thermometer.read_celsius().await {
            Ok(celsius) => celsius,
            Err(err) => {
                warn!("cpu temperature: {}", err);
                CPU_FAULT_CELSIUS
            }
        }
    }

    /// Collects the values of a frame from the stores.
    ///
    /// The stores are read one after the other, never both at once.
    pub async fn telemetry(&mut self, cpu_celsius: i8) -> Telemetry {
        let voltages = self.voltages.read().await;
        let pressures = self.pressures.read().await;

        let temperatures = self.temperature.slots.map(|channel| {
            let v_mv = voltages.get(channel.index()).copied().unwrap_or(0);
            // A slot without thermistor reads 0.
            self.temperature
                .temperature(channel, v_mv)
                .map_or(0, layout::temperature_byte)
        });

        Telemetry {
            cpu_celsius,
            voltages,
            temperatures,
            pressures,
        }
    }

    async fn send(&mut self, index: usize, cpu_celsius: i8) {
        let telemetry = self.telemetry(cpu_celsius).await;
        let Some(frame) = layout::bus_frame(self.config.base_id, index, &telemetry) else {
            return;
        };

        let timeout = self.config.send_timeout;
        let result = with_timeout(timeout, self.bus.send(&frame, timeout))
            .await
            .unwrap_or(Err(SendError::Timeout));
        match result {
            Ok(()) => trace!("bus: sent {:#x}", frame.identifier),
            // Not retried, the next cycle sends fresh values.
            Err(err) => warn!("bus: {:#x} not sent: {}", frame.identifier, err),
        }
    }
}

impl<B: BusController, T: CpuThermometer> PeriodicJob for BusTransmitter<'_, B, T> {
    const NAME: &'static str = "bus";

    async fn cycle(&mut self) {
        let cpu_celsius = self.cpu_celsius().await;

        for index in 0..BUS_FRAME_COUNT {
            if index > 0 {
                Timer::after(self.config.frame_spacing).await;
            }
            self.send(index, cpu_celsius).await;
        }
    }

    fn period(&self) -> Duration {
        self.config.idle
    }
}
