use std::sync::{Arc, Mutex};

use embassy_time::{Duration, Timer};
use rand_core::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use telenode_hal::{AnalogFrontEnd, Channel, HardwareError, InputDivider, CHANNEL_COUNT};

/// Highest voltage the simulated converter can measure, in millivolts.
pub const ADC_FULL_SCALE_MV: u16 = 3400;

/// Output of the sensor wired on a channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Signal {
    /// Nothing is connected, the input is pulled to ground.
    #[default]
    Disconnected,
    /// Steady voltage, in millivolts.
    Steady(u16),
    /// Voltage with uniformly distributed noise of up to `amplitude_mv` either way.
    Noisy {
        /// Mean voltage, in millivolts.
        v_mv: u16,
        /// Noise amplitude, in millivolts.
        amplitude_mv: u16,
    },
    /// Steady voltage where every `period`-th sample is a spike to `spike_mv`.
    Spiky {
        /// Voltage between spikes, in millivolts.
        v_mv: u16,
        /// Voltage of a spike, in millivolts.
        spike_mv: u16,
        /// Number of samples from one spike to the next.
        period: u32,
    },
    /// Every conversion of the channel fails.
    Failing(HardwareError),
}

/// Handle on the sensor signals seen by a [`SimAnalogFrontEnd`].
#[derive(Debug, Clone, Default)]
pub struct SimInputs {
    signals: Arc<Mutex<[Signal; CHANNEL_COUNT]>>,
}

impl SimInputs {
    /// Creates inputs with every channel disconnected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signal of `channel`.
    pub fn set(&self, channel: Channel, signal: Signal) {
        if let Some(slot) = crate::lock(&self.signals).get_mut(channel.index()) {
            *slot = signal;
        }
    }

    /// Returns the signal of `channel`.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Signal {
        crate::lock(&self.signals)
            .get(channel.index())
            .copied()
            .unwrap_or_default()
    }
}

/// Simulated analog front end.
///
/// Models the input divider and the range of the converter: readings are quantized to the
/// millivolt on the converter side, so the returned voltages may differ by 1 mV from the
/// signals.
pub struct SimAnalogFrontEnd {
    inputs: SimInputs,
    divider: InputDivider,
    conversion_time: Duration,
    rng: Pcg32,
    samples: [u32; CHANNEL_COUNT],
}

impl SimAnalogFrontEnd {
    /// Creates a front end sampling `inputs`, with noise drawn from a generator seeded with
    /// `seed`.
    #[must_use]
    pub fn new(inputs: SimInputs, seed: u64) -> Self {
        Self {
            inputs,
            divider: InputDivider::DEFAULT,
            conversion_time: Duration::from_micros(50),
            rng: Pcg32::seed_from_u64(seed),
            samples: [0; CHANNEL_COUNT],
        }
    }

    fn sensor_mv(&mut self, channel: Channel) -> Result<u16, HardwareError> {
        let count = self.samples.get_mut(channel.index()).map_or(0, |count| {
            *count = count.wrapping_add(1);
            *count
        });

        match self.inputs.get(channel) {
            Signal::Disconnected => Ok(0),
            Signal::Steady(v_mv) => Ok(v_mv),
            Signal::Noisy { v_mv, amplitude_mv } => {
                let span = 2 * u32::from(amplitude_mv) + 1;
                let offset = i32::try_from(self.rng.next_u32() % span).unwrap_or(0)
                    - i32::from(amplitude_mv);
                let noisy = (i32::from(v_mv) + offset).clamp(0, i32::from(u16::MAX));
                Ok(u16::try_from(noisy).unwrap_or(0))
            }
            Signal::Spiky {
                v_mv,
                spike_mv,
                period,
            } => {
                if period != 0 && count % period == 0 {
                    Ok(spike_mv)
                } else {
                    Ok(v_mv)
                }
            }
            Signal::Failing(err) => Err(err),
        }
    }

    // Voltage at the converter input.
    fn converter_mv(&self, sensor_mv: u16) -> u16 {
        let r_total = u64::from(self.divider.r_top) + u64::from(self.divider.r_bottom);
        let divided =
            (u64::from(sensor_mv) * u64::from(self.divider.r_bottom) + r_total / 2) / r_total;
        u16::try_from(divided)
            .unwrap_or(u16::MAX)
            .min(ADC_FULL_SCALE_MV)
    }
}

impl AnalogFrontEnd for SimAnalogFrontEnd {
    async fn read_calibrated(&mut self, channel: Channel) -> Result<u16, HardwareError> {
        Timer::after(self.conversion_time).await;
        let sensor_mv = self.sensor_mv(channel)?;
        Ok(self.divider.scale(self.converter_mv(sensor_mv)))
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;

    const CH0: Channel = Channel::new_const(0);

    fn read(adc: &mut SimAnalogFrontEnd) -> Result<u16, HardwareError> {
        block_on(adc.read_calibrated(CH0))
    }

    #[test]
    fn test_divider_round_trip() {
        let inputs = SimInputs::new();
        let mut adc = SimAnalogFrontEnd::new(inputs.clone(), 0);

        assert_eq!(read(&mut adc), Ok(0));
        for v_mv in [400, 500, 2500, 4500] {
            inputs.set(CH0, Signal::Steady(v_mv));
            assert_eq!(read(&mut adc), Ok(v_mv));
        }

        // Beyond the converter range.
        inputs.set(CH0, Signal::Steady(6000));
        assert_eq!(read(&mut adc), Ok(4998));
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let inputs = SimInputs::new();
        inputs.set(
            CH0,
            Signal::Noisy {
                v_mv: 2500,
                amplitude_mv: 100,
            },
        );
        let mut adc = SimAnalogFrontEnd::new(inputs, 42);

        for _ in 0..100 {
            let v_mv = read(&mut adc).unwrap();
            assert!((2399..=2601).contains(&v_mv), "{v_mv}");
        }
    }

    #[test]
    fn test_spikes_and_failures() {
        let inputs = SimInputs::new();
        inputs.set(
            CH0,
            Signal::Spiky {
                v_mv: 500,
                spike_mv: 4500,
                period: 3,
            },
        );
        let mut adc = SimAnalogFrontEnd::new(inputs.clone(), 0);
        let readings: Vec<_> = (0..6).map(|_| read(&mut adc).unwrap()).collect();
        assert_eq!(readings, [500, 500, 4500, 500, 500, 4500]);

        inputs.set(CH0, Signal::Failing(HardwareError::Timeout));
        assert_eq!(read(&mut adc), Err(HardwareError::Timeout));
    }
}
