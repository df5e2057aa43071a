/// Error returned by the fallible conversions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// The voltage lies outside the domain of the divider (e.g., 0 mV or at the reference
    /// voltage), or the divider parameters are not positive.
    InvalidInput,
}

impl core::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidInput => f.write_str("voltage outside the valid domain of the divider"),
        }
    }
}

impl core::error::Error for ConversionError {}
