//! Noise rejection filters.

use heapless::Vec;

/// Number of samples taken per channel and per sweep.
pub const DEFAULT_FILTER_DEPTH: usize = 5;

/// Returns the middle element of `samples` once sorted.
///
/// The slice is sorted in place. For an odd number of samples, up to `(len - 1) / 2` outliers
/// on either side are rejected; for an even number the upper of the two middle elements is
/// returned.
/// Returns `None` if `samples` is empty.
pub fn median(samples: &mut [u16]) -> Option<u16> {
    samples.sort_unstable();
    samples.get(samples.len() / 2).copied()
}

/// Window of the `N` most recent raw samples of one channel.
///
/// The acquisition loop fills one window per channel and per sweep, then discards it after
/// extracting the [`median`](Self::median).
#[derive(Debug, Clone, Default)]
pub struct FilterState<const N: usize = DEFAULT_FILTER_DEPTH> {
    samples: Vec<u16, N>,
}

impl<const N: usize> FilterState<N> {
    /// Creates an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Adds a sample, evicting the oldest one if the window is full.
    pub fn push(&mut self, sample: u16) {
        if self.samples.is_full() {
            self.samples.remove(0);
        }
        // Cannot fail, room was made above.
        let _ = self.samples.push(sample);
    }

    /// Returns the median of the samples currently in the window.
    #[must_use]
    pub fn median(&self) -> Option<u16> {
        let mut sorted = self.samples.clone();
        median(&mut sorted)
    }

    /// Returns the number of samples in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns whether the window holds no sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns whether the window holds `N` samples.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Empties the window.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// First-order low-pass (exponential moving average) filter.
///
/// Each update moves the output by `(input - output) / 2^shift`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LowPass {
    shift: u8,
}

impl LowPass {
    /// Creates a filter with a smoothing factor of `1 / 2^shift`.
    ///
    /// # Panics
    ///
    /// Panics if `shift` is not below 16.
    #[must_use]
    pub const fn new(shift: u8) -> Self {
        assert!(shift < 16, "low-pass shift must be below 16");
        Self { shift }
    }

    /// Returns the shift of this filter.
    #[must_use]
    pub const fn shift(&self) -> u8 {
        self.shift
    }
}

/// Running state of a [`LowPass`] filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LowPassState {
    filter: LowPass,
    output: Option<u16>,
}

impl LowPassState {
    /// Creates a state that has not seen any input yet.
    #[must_use]
    pub const fn new(filter: LowPass) -> Self {
        Self {
            filter,
            output: None,
        }
    }

    /// Feeds `input` into the filter and returns the new output.
    ///
    /// The first input is passed through unchanged.
    /// A 0 mV input marks an absent sensor: it is passed through and restarts the filter, so
    /// the fault is not smeared over the following outputs.
    pub fn update(&mut self, input: u16) -> u16 {
        let output = match self.output {
            Some(previous) if input != 0 => {
                let delta = (i32::from(input) - i32::from(previous)) >> self.filter.shift;
                // Stays between `previous` and `input`, so it fits a u16.
                u16::try_from(i32::from(previous) + delta).unwrap_or(input)
            }
            _ => input,
        };

        self.output = if input == 0 { None } else { Some(output) };
        output
    }

    /// Returns the last output, if any.
    #[must_use]
    pub fn output(&self) -> Option<u16> {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permutations(items: &[u16]) -> std::vec::Vec<std::vec::Vec<u16>> {
        if items.len() <= 1 {
            return std::vec![items.to_vec()];
        }
        let mut all = std::vec::Vec::new();
        for (i, &item) in items.iter().enumerate() {
            let mut rest = items.to_vec();
            rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, item);
                all.push(tail);
            }
        }
        all
    }

    #[test]
    fn test_median_all_permutations() {
        let samples = [1200, 40, 1210, 4095, 1190];
        let all = permutations(&samples);
        assert_eq!(all.len(), 120);

        for mut permutation in all {
            assert_eq!(median(&mut permutation), Some(1200));
        }
    }

    #[test]
    fn test_median_rejects_outliers() {
        // Two outliers out of five, one on each side.
        assert_eq!(median(&mut [0, 2501, 2499, 2500, 5000]), Some(2500));
        // Two outliers out of five, both on the same side.
        assert_eq!(median(&mut [0, 0, 2500, 2501, 2499]), Some(2499));
    }

    #[test]
    fn test_median_identical_and_empty() {
        assert_eq!(median(&mut [777; 5]), Some(777));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_filter_state_window() {
        let mut state: FilterState<5> = FilterState::new();
        assert!(state.is_empty());
        assert_eq!(state.median(), None);

        for sample in [10, 30, 20, 50, 40] {
            state.push(sample);
        }
        assert!(state.is_full());
        assert_eq!(state.median(), Some(30));

        // Evicts 10, the window is now [30, 20, 50, 40, 60].
        state.push(60);
        assert_eq!(state.len(), 5);
        assert_eq!(state.median(), Some(40));

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_filter_state_read_failures_participate() {
        let mut state: FilterState = FilterState::new();
        for sample in [0, 1500, 0, 1502, 1501] {
            state.push(sample);
        }
        assert_eq!(state.median(), Some(1500));

        state.clear();
        for sample in [0, 0, 0, 1502, 1501] {
            state.push(sample);
        }
        assert_eq!(state.median(), Some(0));
    }

    #[test]
    fn test_low_pass() {
        let mut state = LowPassState::new(LowPass::new(2));
        assert_eq!(state.update(1000), 1000);
        assert_eq!(state.update(2000), 1250);
        assert_eq!(state.update(2000), 1437);
        assert_eq!(state.update(0), 0);
        assert_eq!(state.output(), None);
        assert_eq!(state.update(3000), 3000);
        assert_eq!(state.update(2000), 2750);
    }
}
