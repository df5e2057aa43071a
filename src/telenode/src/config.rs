//! Node configuration.
//!
//! Scalar parameters can be overridden at build time through `CONFIG_*` environment
//! variables (decimal values), e.g., `CONFIG_BUS_BASE_ID=1900`.

use embassy_time::Duration;
use telenode_convert::{LowPass, Thermistor};
use telenode_hal::{
    frame::STANDARD_ID_MAX, Channel, PeerAddress, CHANNEL_COUNT, SEND_TIMEOUT,
};
use telenode_utils::{i32_from_env_or, u32_from_env_or, u64_from_env_or};

use crate::{
    profile::{self, PressureSensor},
    Error,
};

/// Number of derived pressures.
pub const PRESSURE_CHANNEL_COUNT: usize = 4;

/// Number of temperature fields in the bus frames.
pub const TEMPERATURE_SLOT_COUNT: usize = 3;

/// Bounded wait for a store lock.
pub const LOCK_TIMEOUT: Duration =
    Duration::from_millis(u64_from_env_or!("CONFIG_LOCK_TIMEOUT_MS", 5, "store lock timeout"));

/// Complete configuration of a node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NodeConfig {
    /// Acquisition parameters.
    pub acquisition: AcquisitionConfig,
    /// Pressure derivation parameters.
    pub derivation: DerivationConfig,
    /// Thermistor parameters.
    pub temperature: TemperatureConfig,
    /// Bus parameters.
    pub bus: BusConfig,
    /// Wireless parameters.
    pub wireless: WirelessConfig,
    /// Bounded wait for a store lock, for readers and writers alike.
    pub lock_timeout: Duration,
}

impl NodeConfig {
    /// Configuration of the node as fitted.
    pub const DEFAULT: Self = Self {
        acquisition: AcquisitionConfig::DEFAULT,
        derivation: DerivationConfig::DEFAULT,
        temperature: TemperatureConfig::DEFAULT,
        bus: BusConfig::DEFAULT,
        wireless: WirelessConfig::DEFAULT,
        lock_timeout: LOCK_TIMEOUT,
    };
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters of the acquisition sweep.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AcquisitionConfig {
    /// Delay between two samples of the same channel.
    pub sample_interval: Duration,
    /// Delay after writing a channel, before sampling the next one.
    pub channel_interval: Duration,
    /// Delay between two sweeps.
    pub sweep_interval: Duration,
    /// Low-pass filter applied after the median, per channel.
    pub low_pass: [Option<LowPass>; CHANNEL_COUNT],
}

impl AcquisitionConfig {
    /// Sweeps continuously, smoothing the crank-case pressure input (channel 2).
    pub const DEFAULT: Self = {
        let mut low_pass = [None; CHANNEL_COUNT];
        low_pass[2] = Some(LowPass::new(2));

        Self {
            sample_interval: Duration::from_millis(u64_from_env_or!(
                "CONFIG_SAMPLE_INTERVAL_MS",
                2,
                "delay between two samples of a channel"
            )),
            channel_interval: Duration::from_millis(u64_from_env_or!(
                "CONFIG_CHANNEL_INTERVAL_MS",
                10,
                "delay between two channels"
            )),
            sweep_interval: Duration::from_millis(u64_from_env_or!(
                "CONFIG_SWEEP_INTERVAL_MS",
                0,
                "delay between two sweeps"
            )),
            low_pass,
        }
    };
}

/// A derived pressure: which voltage it is computed from, and how.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressureChannel {
    /// Voltage the pressure is derived from.
    pub source: Channel,
    /// Sensor model on that channel.
    pub sensor: PressureSensor,
}

/// Parameters of the pressure derivation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DerivationConfig {
    /// Delay between two derivations.
    pub period: Duration,
    /// Derived pressures, in the order of the pressure store.
    pub channels: [PressureChannel; PRESSURE_CHANNEL_COUNT],
}

impl DerivationConfig {
    /// Charge cooler inlet, exhaust back pressure, crank case and turbo regulator oil
    /// pressures, on channels 0 to 3.
    pub const DEFAULT: Self = Self {
        period: Duration::from_millis(u64_from_env_or!(
            "CONFIG_DERIVATION_PERIOD_MS",
            30,
            "delay between two pressure derivations"
        )),
        channels: [
            PressureChannel {
                source: Channel::new_const(0),
                sensor: profile::BMW_TMAP,
            },
            PressureChannel {
                source: Channel::new_const(1),
                sensor: profile::PSI_30,
            },
            PressureChannel {
                source: Channel::new_const(2),
                sensor: profile::BOSCH_MAP,
            },
            PressureChannel {
                source: Channel::new_const(3),
                sensor: profile::BAR_10,
            },
        ],
    };
}

/// Parameters of the thermistor inputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TemperatureConfig {
    /// Thermistor wired on each channel, if any.
    pub thermistors: [Option<Thermistor>; CHANNEL_COUNT],
    /// Channel reported in each temperature field of the bus frames.
    pub slots: [Channel; TEMPERATURE_SLOT_COUNT],
}

impl TemperatureConfig {
    /// Charge cooler water (channel 8) and air (channel 9) temperatures on Bosch NTCs,
    /// then the charge cooler inlet temperature (channel 7), which has no thermistor table.
    pub const DEFAULT: Self = {
        let r_pullup = i32_from_env_or!(
            "CONFIG_THERMISTOR_PULLUP_OHMS",
            2400,
            "thermistor pull-up resistance"
        );
        let v_ref_mv = i32_from_env_or!(
            "CONFIG_THERMISTOR_VREF_MV",
            5000,
            "thermistor pull-up reference voltage"
        );
        let ntc = Thermistor::new(r_pullup, v_ref_mv, profile::BOSCH_NTC);

        let mut thermistors = [None; CHANNEL_COUNT];
        thermistors[8] = Some(ntc);
        thermistors[9] = Some(ntc);

        Self {
            thermistors,
            slots: [
                Channel::new_const(8),
                Channel::new_const(9),
                Channel::new_const(7),
            ],
        }
    };

    /// Returns the temperature measured on `channel` at `v_mv`, in degrees Celsius.
    ///
    /// A faulty sensor reads as [`FAULT_CELSIUS`](telenode_convert::FAULT_CELSIUS).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CalibrationMissing`] if no thermistor is configured on `channel`.
    pub fn temperature(&self, channel: Channel, v_mv: u16) -> Result<i16, Error> {
        let thermistor = self
            .thermistors
            .get(channel.index())
            .copied()
            .flatten()
            .ok_or(Error::CalibrationMissing(channel))?;
        Ok(thermistor.temperature(i32::from(v_mv)))
    }
}

/// Parameters of the bus link.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Identifier of the first frame of a cycle, the following ones are consecutive.
    pub base_id: u32,
    /// Delay between two frames of a cycle.
    pub frame_spacing: Duration,
    /// Delay after the last frame of a cycle.
    pub idle: Duration,
    /// Bounded wait for queuing a frame.
    pub send_timeout: Duration,
}

impl BusConfig {
    /// Frames `0x76c..=0x770`, about ten cycles per second.
    pub const DEFAULT: Self = Self::new(
        u32_from_env_or!("CONFIG_BUS_BASE_ID", 0x76c, "bus base identifier"),
        Duration::from_millis(u64_from_env_or!(
            "CONFIG_BUS_FRAME_SPACING_MS",
            10,
            "delay between two bus frames"
        )),
        Duration::from_millis(u64_from_env_or!(
            "CONFIG_BUS_IDLE_MS",
            60,
            "delay after the last bus frame of a cycle"
        )),
        Duration::from_millis(u64_from_env_or!(
            "CONFIG_BUS_SEND_TIMEOUT_MS",
            SEND_TIMEOUT.as_millis(),
            "bus send timeout"
        )),
    );

    /// Creates a bus configuration.
    ///
    /// # Panics
    ///
    /// Panics if the identifiers of a cycle do not all fit the standard 11-bit format.
    #[must_use]
    pub const fn new(
        base_id: u32,
        frame_spacing: Duration,
        idle: Duration,
        send_timeout: Duration,
    ) -> Self {
        assert!(
            base_id <= STANDARD_ID_MAX - (crate::layout::BUS_FRAME_COUNT as u32 - 1),
            "bus base identifier leaves the standard identifier range"
        );
        Self {
            base_id,
            frame_spacing,
            idle,
            send_timeout,
        }
    }
}

/// Parameters of the wireless link.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WirelessConfig {
    /// Identifier of the wireless frame.
    pub frame_id: u32,
    /// Receiver of the datagrams.
    pub peer: PeerAddress,
    /// Delay between two datagrams.
    pub period: Duration,
}

impl WirelessConfig {
    /// One datagram every 25 ms to the dashboard receiver.
    pub const DEFAULT: Self = Self {
        frame_id: BusConfig::DEFAULT.base_id,
        peer: PeerAddress::new([0xe4, 0xb0, 0x63, 0xba, 0x9e, 0xf8]),
        period: Duration::from_millis(u64_from_env_or!(
            "CONFIG_WIRELESS_PERIOD_MS",
            25,
            "delay between two wireless datagrams"
        )),
    };
}
