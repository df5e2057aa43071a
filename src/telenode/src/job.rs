//! Periodic jobs.

use core::future::Future;

use embassy_time::{Duration, Timer};

/// A job run forever, with a fixed delay between two cycles.
pub trait PeriodicJob {
    /// Name used in log messages.
    const NAME: &'static str;

    /// Runs one cycle of the job.
    ///
    /// Errors are handled inside the cycle: a failing cycle still completes.
    fn cycle(&mut self) -> impl Future<Output = ()>;

    /// Returns the delay between the end of a cycle and the start of the next one.
    fn period(&self) -> Duration;
}

/// Runs `job` forever.
pub async fn run<J: PeriodicJob>(mut job: J) -> ! {
    telenode_log::info!("{}: started", J::NAME);
    loop {
        job.cycle().await;
        Timer::after(job.period()).await;
    }
}
