//! Sampling of the analog channels.
//!
//! Each sweep visits every channel in order: a burst of samples is taken, its median rejects
//! the electrical noise, an optional low-pass filter smooths the result across sweeps, and the
//! value is written to the [`VoltageStore`].

use embassy_time::{Duration, Timer};
use telenode_convert::{FilterState, LowPassState, DEFAULT_FILTER_DEPTH};
use telenode_hal::{AnalogFrontEnd, Channel, CHANNEL_COUNT};
use telenode_log::{debug, trace, warn};

use crate::{config::AcquisitionConfig, store::VoltageStore, Error, PeriodicJob};

/// Voltage written for a channel whose sensor is absent or unreadable.
pub const ABSENT_MV: u16 = 0;

/// Samples the analog channels into the [`VoltageStore`].
pub struct Acquisition<'a, A> {
    adc: A,
    voltages: &'a VoltageStore,
    config: AcquisitionConfig,
    low_pass: [Option<LowPassState>; CHANNEL_COUNT],
    lock_timeout: Duration,
}

impl<'a, A: AnalogFrontEnd> Acquisition<'a, A> {
    /// Creates the job; filters start without history.
    pub fn new(
        adc: A,
        voltages: &'a VoltageStore,
        config: AcquisitionConfig,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            adc,
            voltages,
            low_pass: config.low_pass.map(|filter| filter.map(LowPassState::new)),
            config,
            lock_timeout,
        }
    }

    /// Returns the noise-filtered voltage of `channel`, in millivolts.
    ///
    /// Takes [`DEFAULT_FILTER_DEPTH`] samples; a sample that cannot be read counts as
    /// [`ABSENT_MV`] and still takes part in the median.
    pub async fn sample(&mut self, channel: Channel) -> u16 {
        let mut window: FilterState<DEFAULT_FILTER_DEPTH> = FilterState::new();

        for i in 0..DEFAULT_FILTER_DEPTH {
            if i > 0 {
                Timer::after(self.config.sample_interval).await;
            }
            let sample = match self.adc.read_calibrated(channel).await {
                Ok(v_mv) => v_mv,
                Err(err) => {
                    debug!("{}: {}", channel, Error::from(err));
                    ABSENT_MV
                }
            };
            window.push(sample);
        }

        window.median().unwrap_or(ABSENT_MV)
    }

    /// Samples and filters `channel`, then stores its voltage.
    ///
    /// The write is skipped if the store stays locked longer than the lock timeout.
    pub async fn acquire(&mut self, channel: Channel) -> u16 {
        let median = self.sample(channel).await;
        let v_mv = match self
            .low_pass
            .get_mut(channel.index())
            .and_then(Option::as_mut)
        {
            Some(filter) => filter.update(median),
            None => median,
        };

        match self.voltages.set(channel.index(), v_mv, self.lock_timeout).await {
            Ok(()) => trace!("{}: {} mV", channel, v_mv),
            Err(err) => warn!("{}: write skipped: {}", channel, err),
        }
        v_mv
    }
}

impl<A: AnalogFrontEnd> PeriodicJob for Acquisition<'_, A> {
    const NAME: &'static str = "acquisition";

    async fn cycle(&mut self) {
        for channel in Channel::all() {
            self.acquire(channel).await;
            Timer::after(self.config.channel_interval).await;
        }
    }

    fn period(&self) -> Duration {
        self.config.sweep_interval
    }
}
