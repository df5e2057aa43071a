/// Resistive divider in front of the analog inputs.
///
/// The sensors output up to 5 V while the converter accepts a lower range, so each input goes
/// through a divider: the converter sees `v · r_bottom / (r_top + r_bottom)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputDivider {
    /// Resistance between the sensor and the converter input, in ohms.
    pub r_top: u32,
    /// Resistance between the converter input and ground, in ohms.
    pub r_bottom: u32,
}

impl InputDivider {
    /// Divider fitted on the node: 4.7 kΩ over 10 kΩ, a factor of 1.47.
    pub const DEFAULT: Self = Self::new(4700, 10_000);

    /// Creates a divider.
    ///
    /// # Panics
    ///
    /// Panics if `r_bottom` is 0.
    #[must_use]
    pub const fn new(r_top: u32, r_bottom: u32) -> Self {
        assert!(r_bottom > 0, "divider bottom resistance must not be 0");
        Self { r_top, r_bottom }
    }

    /// Returns the sensor-side voltage for the converter-side voltage `v_mv`, rounded to the
    /// nearest millivolt and saturating at `u16::MAX`.
    #[must_use]
    pub fn scale(&self, v_mv: u16) -> u16 {
        let r_bottom = u64::from(self.r_bottom.max(1));
        let numerator = u64::from(v_mv) * (u64::from(self.r_top) + r_bottom);
        u16::try_from((numerator + r_bottom / 2) / r_bottom).unwrap_or(u16::MAX)
    }
}

impl Default for InputDivider {
    fn default() -> Self {
        Self::DEFAULT
    }
}
