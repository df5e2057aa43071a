use telenode_hal::{AnalogFrontEnd, BusController, Channel, CpuThermometer, Radio, CHANNEL_COUNT};
use telenode_log::{error, info, warn};

use crate::{
    acquisition::Acquisition,
    bus::BusTransmitter,
    config::{NodeConfig, PRESSURE_CHANNEL_COUNT},
    derivation::Derivation,
    store::{PressureStore, Store, VoltageStore},
    wireless::WirelessTransmitter,
    InitError,
};

/// A telemetry node: its configuration and its shared stores.
///
/// Meant to live in a `static`, so that the jobs borrowing it can be spawned on any executor.
pub struct Node {
    config: NodeConfig,
    voltages: VoltageStore,
    pressures: PressureStore,
}

/// The jobs of a started node, to be run with [`job::run()`](crate::job::run).
pub struct Jobs<'a, A, T, B, R> {
    /// Samples the analog channels.
    pub acquisition: Acquisition<'a, A>,
    /// Derives the pressures.
    pub derivation: Derivation<'a>,
    /// Sends the bus frames.
    pub bus: BusTransmitter<'a, B, T>,
    /// Sends the wireless datagrams.
    pub wireless: WirelessTransmitter<'a, R>,
}

impl Node {
    /// Creates a node with zeroed stores.
    #[must_use]
    pub const fn new(config: NodeConfig) -> Self {
        Self {
            config,
            voltages: Store::new("voltages", [0; CHANNEL_COUNT]),
            pressures: Store::new("pressures", [0; PRESSURE_CHANNEL_COUNT]),
        }
    }

    /// Returns the configuration of the node.
    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Brings the node up and returns its jobs.
    ///
    /// Starts the bus, then logs a first reading of every channel and the CPU temperature.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Bus`] if the bus controller cannot be started; the node must not
    /// run without it.
    pub async fn start<A, T, B, R>(
        &self,
        mut adc: A,
        mut thermometer: T,
        mut bus: B,
        radio: R,
    ) -> Result<Jobs<'_, A, T, B, R>, InitError>
    where
        A: AnalogFrontEnd,
        T: CpuThermometer,
        B: BusController,
        R: Radio,
    {
        if let Err(err) = bus.start().await {
            error!("bus: {}", err);
            return Err(InitError::Bus(err));
        }
        info!("bus: started, base identifier {:#x}", self.config.bus.base_id);

        for channel in Channel::all() {
            match adc.read_calibrated(channel).await {
                Ok(v_mv) => info!("{}: {} mV", channel, v_mv),
                Err(err) => warn!("{}: {}", channel, err),
            }
        }

        match thermometer.read_celsius().await {
            Ok(celsius) => info!("cpu temperature: {} C", celsius),
            Err(err) => warn!("cpu temperature: {}", err),
        }

        let config = &self.config;
        Ok(Jobs {
            acquisition: Acquisition::new(
                adc,
                &self.voltages,
                config.acquisition,
                config.lock_timeout,
            ),
            derivation: Derivation::new(
                &self.voltages,
                &self.pressures,
                config.derivation,
                config.lock_timeout,
            ),
            bus: BusTransmitter::new(
                bus,
                thermometer,
                &self.voltages,
                &self.pressures,
                config.bus,
                config.temperature,
                config.lock_timeout,
            ),
            wireless: WirelessTransmitter::new(
                radio,
                &self.voltages,
                config.wireless,
                config.lock_timeout,
            ),
        })
    }
}
