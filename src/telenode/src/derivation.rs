//! Derivation of the pressures from the filtered voltages.

use embassy_time::Duration;
use telenode_hal::CHANNEL_COUNT;
use telenode_log::{trace, warn};

use crate::{
    acquisition::ABSENT_MV,
    config::{DerivationConfig, PressureChannel, PRESSURE_CHANNEL_COUNT},
    store::{CachedReader, PressureStore, VoltageStore},
    PeriodicJob,
};

/// Returns the fixed-point pressure of each channel.
///
/// A channel whose source voltage is [`ABSENT_MV`] reads 0.
#[must_use]
pub fn derive_pressures(
    channels: &[PressureChannel; PRESSURE_CHANNEL_COUNT],
    voltages: &[u16; CHANNEL_COUNT],
) -> [u16; PRESSURE_CHANNEL_COUNT] {
    channels.map(|channel| {
        match voltages.get(channel.source.index()).copied() {
            None | Some(ABSENT_MV) => 0,
            Some(v_mv) => channel.sensor.calibration.scaled(v_mv),
        }
    })
}

/// Derives the pressures into the [`PressureStore`].
pub struct Derivation<'a> {
    voltages: CachedReader<'a, u16, CHANNEL_COUNT>,
    pressures: &'a PressureStore,
    config: DerivationConfig,
    lock_timeout: Duration,
}

impl<'a> Derivation<'a> {
    /// Creates the job.
    #[must_use]
    pub fn new(
        voltages: &'a VoltageStore,
        pressures: &'a PressureStore,
        config: DerivationConfig,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            voltages: CachedReader::new(voltages, lock_timeout),
            pressures,
            config,
            lock_timeout,
        }
    }
}

impl PeriodicJob for Derivation<'_> {
    const NAME: &'static str = "derivation";

    async fn cycle(&mut self) {
        let voltages = self.voltages.read().await;
        let pressures = derive_pressures(&self.config.channels, &voltages);

        match self.pressures.write(&pressures, self.lock_timeout).await {
            Ok(()) => trace!("pressures: {:?}", pressures),
            Err(err) => warn!("pressures: write skipped: {}", err),
        }
    }

    fn period(&self) -> Duration {
        self.config.period
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::{config::NodeConfig, store::Store};

    #[test]
    fn test_absent_source_reads_zero() {
        let channels = NodeConfig::DEFAULT.derivation.channels;

        // The quadratic sensor reads 30.3 kPa at 0 V, but 0 mV means no sensor.
        assert_eq!(derive_pressures(&channels, &[0; CHANNEL_COUNT]), [0; 4]);

        let mut voltages = [0; CHANNEL_COUNT];
        voltages[1] = 4500;
        voltages[3] = 4500;
        assert_eq!(derive_pressures(&channels, &voltages), [0, 3000, 0, 689]);
    }

    #[test]
    fn test_cycle_writes_pressures() {
        let voltages: VoltageStore = Store::new("voltages", [0; CHANNEL_COUNT]);
        let pressures: PressureStore = Store::new("pressures", [1; PRESSURE_CHANNEL_COUNT]);
        let config = NodeConfig::DEFAULT;
        let mut job = Derivation::new(
            &voltages,
            &pressures,
            config.derivation,
            config.lock_timeout,
        );

        block_on(async {
            voltages
                .write(&[500, 500, 400, 500, 0, 0, 0, 0, 0, 0], config.lock_timeout)
                .await
                .unwrap();
            job.cycle().await;
            let derived = pressures.snapshot(config.lock_timeout).await.unwrap();
            // -2.502 * 0.25 + 72.145 * 0.5 + 30.3 = 65.747 kPa
            assert_eq!(derived, [6575, 0, 2000, 0]);
        });
    }
}
