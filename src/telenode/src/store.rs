//! Lock-guarded value arrays shared between jobs.
//!
//! Each store has a single writer and any number of readers. Every access waits a bounded
//! time for the lock; the critical sections only copy memory.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::{with_timeout, Duration};
use telenode_hal::CHANNEL_COUNT;
use telenode_log::warn;

use crate::{config::PRESSURE_CHANNEL_COUNT, Error};

/// Filtered voltage of each channel, in millivolts.
pub type VoltageStore = Store<u16, CHANNEL_COUNT>;

/// Derived pressures, as fixed-point values (see
/// [`PRESSURE_SCALING`](telenode_convert::PRESSURE_SCALING)).
pub type PressureStore = Store<u16, PRESSURE_CHANNEL_COUNT>;

/// A fixed-size array of values behind its own lock.
///
/// Can be used in a `static` and shared between executors running on different threads
/// or cores.
pub struct Store<T, const N: usize> {
    name: &'static str,
    values: Mutex<CriticalSectionRawMutex, [T; N]>,
}

impl<T: Copy, const N: usize> Store<T, N> {
    /// Creates a store holding `initial`.
    ///
    /// `name` is only used in log messages.
    #[must_use]
    pub const fn new(name: &'static str, initial: [T; N]) -> Self {
        Self {
            name,
            values: Mutex::new(initial),
        }
    }

    /// Returns the name of the store.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a copy of all values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the lock could not be acquired within `timeout`.
    pub async fn snapshot(&self, timeout: Duration) -> Result<[T; N], Error> {
        let values = with_timeout(timeout, self.values.lock()).await?;
        Ok(*values)
    }

    /// Replaces all values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the lock could not be acquired within `timeout`; the
    /// store is left untouched.
    pub async fn write(&self, new_values: &[T; N], timeout: Duration) -> Result<(), Error> {
        let mut values = with_timeout(timeout, self.values.lock()).await?;
        *values = *new_values;
        Ok(())
    }

    /// Replaces the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the lock could not be acquired within `timeout`, or
    /// [`Error::ChannelOutOfRange`] if `index` is not below `N`.
    pub async fn set(&self, index: usize, value: T, timeout: Duration) -> Result<(), Error> {
        let out_of_range = Error::ChannelOutOfRange(u8::try_from(index).unwrap_or(u8::MAX));
        if index >= N {
            return Err(out_of_range);
        }

        let mut values = with_timeout(timeout, self.values.lock()).await?;
        let slot = values.get_mut(index).ok_or(out_of_range)?;
        *slot = value;
        Ok(())
    }

    /// Returns a copy of all values if the lock is free, without waiting.
    #[must_use]
    pub fn try_snapshot(&self) -> Option<[T; N]> {
        self.values.try_lock().ok().map(|values| *values)
    }

    // Lets tests hold the lock across awaits to simulate a stalled user.
    #[cfg(test)]
    pub(crate) async fn lock(
        &self,
        timeout: Duration,
    ) -> Result<embassy_sync::mutex::MutexGuard<'_, CriticalSectionRawMutex, [T; N]>, Error> {
        Ok(with_timeout(timeout, self.values.lock()).await?)
    }
}

/// Reader of a [`Store`] that falls back to its last successful snapshot.
///
/// Bounds the staleness of the values to the time the lock stays unavailable.
pub struct CachedReader<'a, T, const N: usize> {
    store: &'a Store<T, N>,
    last: [T; N],
    timeout: Duration,
}

impl<'a, T: Copy + Default, const N: usize> CachedReader<'a, T, N> {
    /// Creates a reader of `store`; until the first successful read, the cached values are the
    /// default value of `T`.
    #[must_use]
    pub fn new(store: &'a Store<T, N>, timeout: Duration) -> Self {
        Self {
            store,
            last: [T::default(); N],
            timeout,
        }
    }

    /// Returns a fresh snapshot of the store, or the previous one if the lock could not be
    /// acquired in time.
    pub async fn read(&mut self) -> [T; N] {
        match self.store.snapshot(self.timeout).await {
            Ok(values) => self.last = values,
            Err(err) => warn!("{}: {}, using previous values", self.store.name(), err),
        }
        self.last
    }

    /// Returns the last successful snapshot without accessing the store.
    #[must_use]
    pub fn last(&self) -> [T; N] {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_time::{Instant, Timer};

    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(5);

    #[test]
    fn test_write_then_snapshot() {
        let store: Store<u16, 3> = Store::new("test", [0; 3]);
        block_on(async {
            assert_eq!(store.snapshot(TIMEOUT).await, Ok([0, 0, 0]));
            store.write(&[1, 2, 3], TIMEOUT).await.unwrap();
            store.set(1, 20, TIMEOUT).await.unwrap();
            assert_eq!(store.snapshot(TIMEOUT).await, Ok([1, 20, 3]));
            assert_eq!(
                store.set(3, 4, TIMEOUT).await,
                Err(Error::ChannelOutOfRange(3))
            );
        });
        assert_eq!(store.try_snapshot(), Some([1, 20, 3]));
    }

    #[test]
    fn test_held_lock_times_out() {
        let store: Store<u16, 2> = Store::new("test", [7, 8]);
        block_on(async {
            let guard = store.lock(TIMEOUT).await.unwrap();
            assert_eq!(store.snapshot(TIMEOUT).await, Err(Error::LockTimeout));
            assert_eq!(store.write(&[0, 0], TIMEOUT).await, Err(Error::LockTimeout));
            assert_eq!(store.try_snapshot(), None);
            drop(guard);
            assert_eq!(store.snapshot(TIMEOUT).await, Ok([7, 8]));
        });
    }

    #[test]
    fn test_cached_reader_keeps_last_snapshot() {
        let store: Store<u16, 2> = Store::new("test", [0; 2]);
        let mut reader = CachedReader::new(&store, TIMEOUT);
        assert_eq!(reader.last(), [0, 0]);

        block_on(async {
            store.write(&[100, 200], TIMEOUT).await.unwrap();
            assert_eq!(reader.read().await, [100, 200]);

            let mut guard = store.lock(TIMEOUT).await.unwrap();
            *guard = [300, 400];
            assert_eq!(reader.read().await, [100, 200]);
            drop(guard);

            assert_eq!(reader.read().await, [300, 400]);
        });
    }

    #[test]
    fn test_reader_bounded_by_timeout_while_other_thread_holds_lock() {
        static STORE: Store<u16, 4> = Store::new("held", [0; 4]);

        let mut reader = CachedReader::new(&STORE, TIMEOUT);
        block_on(STORE.write(&[1, 2, 3, 4], TIMEOUT)).unwrap();
        assert_eq!(block_on(reader.read()), [1, 2, 3, 4]);

        let holder = std::thread::spawn(|| {
            block_on(async {
                let mut values = STORE.lock(TIMEOUT).await.unwrap();
                *values = [5, 6, 7, 8];
                Timer::after_millis(100).await;
            });
        });

        // Wait for the holder to take the lock.
        let deadline = Instant::now() + Duration::from_secs(5);
        while STORE.try_snapshot().is_some() && Instant::now() < deadline {
            std::thread::yield_now();
        }

        let started = Instant::now();
        assert_eq!(block_on(reader.read()), [1, 2, 3, 4]);
        // The wait is bounded by the lock timeout, not by the holder.
        assert!(started.elapsed() < Duration::from_millis(90));

        holder.join().unwrap();
        assert_eq!(block_on(reader.read()), [5, 6, 7, 8]);
    }
}
