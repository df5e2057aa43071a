//! Analog input channels.

/// Number of analog channels of the node.
pub const CHANNEL_COUNT: usize = 10;

/// An analog input channel, in `0..CHANNEL_COUNT`.
// Do not implement From<u8>, channels must be checked on construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Creates a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelOutOfRange`] if `index` is not below [`CHANNEL_COUNT`].
    pub const fn new(index: u8) -> Result<Self, ChannelOutOfRange> {
        if (index as usize) < CHANNEL_COUNT {
            Ok(Self(index))
        } else {
            Err(ChannelOutOfRange(index))
        }
    }

    /// Creates a channel, failing the build when used in a `const` with an invalid index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`CHANNEL_COUNT`].
    #[must_use]
    pub const fn new_const(index: u8) -> Self {
        assert!((index as usize) < CHANNEL_COUNT, "channel out of range");
        Self(index)
    }

    /// Returns the index of the channel.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the channel number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Returns all channels, in increasing order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "CHANNEL_COUNT fits in a u8"
    )]
    pub fn all() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator {
        (0..CHANNEL_COUNT as u8).map(Self)
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

impl TryFrom<usize> for Channel {
    type Error = ChannelOutOfRange;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        let index = u8::try_from(index).unwrap_or(u8::MAX);
        Self::new(index)
    }
}

/// Returned when creating a [`Channel`] from an invalid index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelOutOfRange(pub u8);

impl core::fmt::Display for ChannelOutOfRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "channel {} is out of range (0..{})",
            self.0, CHANNEL_COUNT
        )
    }
}

impl core::error::Error for ChannelOutOfRange {}
