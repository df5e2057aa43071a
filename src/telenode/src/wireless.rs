//! Wireless transmitter.
//!
//! Sends one datagram per period to a fixed peer, fire-and-forget.

use embassy_time::Duration;
use telenode_hal::{Radio, CHANNEL_COUNT};
use telenode_log::{debug, trace};

use crate::{
    config::WirelessConfig,
    layout,
    store::{CachedReader, VoltageStore},
    PeriodicJob,
};

/// Sends the voltage of channel 0 over the radio.
pub struct WirelessTransmitter<'a, R> {
    radio: R,
    voltages: CachedReader<'a, u16, CHANNEL_COUNT>,
    config: WirelessConfig,
}

impl<'a, R: Radio> WirelessTransmitter<'a, R> {
    /// Creates the job.
    #[must_use]
    pub fn new(
        radio: R,
        voltages: &'a VoltageStore,
        config: WirelessConfig,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            radio,
            voltages: CachedReader::new(voltages, lock_timeout),
            config,
        }
    }
}

impl<R: Radio> PeriodicJob for WirelessTransmitter<'_, R> {
    const NAME: &'static str = "wireless";

    async fn cycle(&mut self) {
        let [v0_mv, ..] = self.voltages.read().await;
        let datagram = layout::wireless_frame(self.config.frame_id, v0_mv).to_datagram();

        match self.radio.send(&self.config.peer, &datagram).await {
            Ok(()) => trace!("wireless: sent {} mV to {}", v0_mv, self.config.peer),
            // Losses are expected on this link.
            Err(err) => debug!("wireless: {}", err),
        }
    }

    fn period(&self) -> Duration {
        self.config.period
    }
}
