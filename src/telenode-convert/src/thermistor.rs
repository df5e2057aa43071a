//! NTC thermistor conversion.
//!
//! The thermistor forms a divider with a fixed pull-up resistor tied to the reference voltage;
//! the voltage measured across the thermistor gives its resistance, which is looked up in the
//! resistance table of the sensor model.
//! Interpolating in the resistance domain follows the non-linear curve of the thermistor more
//! closely than interpolating voltages would.

use crate::ConversionError;

/// Temperature reported when a sensor is absent, shorted, or out of range.
pub const FAULT_CELSIUS: i16 = -128;

/// One point of a [`ResistanceTable`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationPoint {
    /// Temperature in degrees Celsius.
    pub temperature: i16,
    /// Resistance of the thermistor at that temperature, in ohms.
    pub resistance: u32,
}

impl CalibrationPoint {
    /// Creates a calibration point.
    #[must_use]
    pub const fn new(temperature: i16, resistance: u32) -> Self {
        Self {
            temperature,
            resistance,
        }
    }
}

/// Resistance/temperature curve of a thermistor model.
///
/// Points are sorted by increasing temperature, and thus by strictly decreasing resistance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResistanceTable {
    points: &'static [CalibrationPoint],
}

impl ResistanceTable {
    /// Creates a table from its calibration points.
    ///
    /// When used to initialize a `const`, the checks below are done at compile time.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty, or if temperatures are not strictly increasing while
    /// resistances are strictly decreasing.
    #[must_use]
    pub const fn new(points: &'static [CalibrationPoint]) -> Self {
        assert!(!points.is_empty(), "resistance table must not be empty");

        let mut remaining = points;
        while let [colder, warmer, ..] = remaining {
            assert!(
                colder.resistance > warmer.resistance,
                "resistances must be strictly decreasing"
            );
            assert!(
                colder.temperature < warmer.temperature,
                "temperatures must be strictly increasing"
            );
            if let [_, tail @ ..] = remaining {
                remaining = tail;
            }
        }

        Self { points }
    }

    /// Returns the calibration points.
    #[must_use]
    pub const fn points(&self) -> &'static [CalibrationPoint] {
        self.points
    }

    /// Returns the temperature for a thermistor resistance, in degrees Celsius.
    ///
    /// Resistances beyond either end of the table clamp to the temperature of that end.
    /// Between two points, the temperature is interpolated linearly by resistance and truncated
    /// toward zero.
    #[must_use]
    pub fn temperature(&self, resistance: u32) -> i16 {
        let (Some(coldest), Some(warmest)) = (self.points.first(), self.points.last()) else {
            // Tables are never empty.
            return FAULT_CELSIUS;
        };

        if resistance >= coldest.resistance {
            return coldest.temperature;
        }
        if resistance <= warmest.resistance {
            return warmest.temperature;
        }

        self.points
            .windows(2)
            .find_map(|pair| match pair {
                [upper, lower] if upper.resistance >= resistance && resistance > lower.resistance => {
                    Some(interpolate(upper, lower, resistance))
                }
                _ => None,
            })
            .unwrap_or(warmest.temperature)
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "resistances stay far below 2^24, the result lies between two table temperatures"
)]
fn interpolate(upper: &CalibrationPoint, lower: &CalibrationPoint, resistance: u32) -> i16 {
    let fraction =
        (resistance - lower.resistance) as f32 / (upper.resistance - lower.resistance) as f32;
    let temperature = f32::from(lower.temperature)
        + fraction * f32::from(upper.temperature - lower.temperature);
    // `as` truncates toward zero.
    temperature as i16
}

/// Returns the resistance of the lower leg of a divider, in ohms, rounded to the nearest ohm
/// and saturated at `u32::MAX`.
///
/// The upper leg is `r_pullup` ohms tied to `v_ref_mv`; `v_mv` is measured across the lower
/// leg.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidInput`] if `v_mv` is not strictly between 0 and
/// `v_ref_mv`, or if `r_pullup` or `v_ref_mv` is not positive.
pub fn divider_resistance(v_mv: i32, r_pullup: i32, v_ref_mv: i32) -> Result<u32, ConversionError> {
    if v_mv <= 0 || v_mv >= v_ref_mv || r_pullup <= 0 || v_ref_mv <= 0 {
        return Err(ConversionError::InvalidInput);
    }

    let numerator = i64::from(r_pullup) * i64::from(v_mv);
    let denominator = i64::from(v_ref_mv - v_mv);
    let rounded = (numerator + denominator / 2) / denominator;

    // Beyond u32, the resistance is past the cold end of any table anyway.
    Ok(u32::try_from(rounded).unwrap_or(u32::MAX))
}

/// Returns the temperature of a thermistor from its divider voltage, in degrees Celsius.
///
/// Returns [`FAULT_CELSIUS`] if the voltage is outside the domain of the divider (see
/// [`divider_resistance()`]): a disconnected sensor (0 mV) or a shorted pull-up (at the
/// reference voltage) thus reads as a fault.
#[must_use]
pub fn sensor_temperature(v_mv: i32, r_pullup: i32, v_ref_mv: i32, table: &ResistanceTable) -> i16 {
    divider_resistance(v_mv, r_pullup, v_ref_mv)
        .map_or(FAULT_CELSIUS, |resistance| table.temperature(resistance))
}

/// An NTC thermistor wired as the lower leg of a divider.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Thermistor {
    /// Pull-up resistance, in ohms.
    pub r_pullup: i32,
    /// Voltage the pull-up is tied to, in millivolts.
    pub v_ref_mv: i32,
    /// Curve of the thermistor model.
    pub table: ResistanceTable,
}

impl Thermistor {
    /// Creates a thermistor description.
    #[must_use]
    pub const fn new(r_pullup: i32, v_ref_mv: i32, table: ResistanceTable) -> Self {
        Self {
            r_pullup,
            v_ref_mv,
            table,
        }
    }

    /// Returns the temperature for the divider voltage `v_mv`, in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InvalidInput`] when `v_mv` is outside the domain of the
    /// divider, see [`divider_resistance()`].
    pub fn try_temperature(&self, v_mv: i32) -> Result<i16, ConversionError> {
        let resistance = divider_resistance(v_mv, self.r_pullup, self.v_ref_mv)?;
        Ok(self.table.temperature(resistance))
    }

    /// Returns the temperature for the divider voltage `v_mv`, in degrees Celsius, or
    /// [`FAULT_CELSIUS`], see [`sensor_temperature()`].
    #[must_use]
    pub fn temperature(&self, v_mv: i32) -> i16 {
        sensor_temperature(v_mv, self.r_pullup, self.v_ref_mv, &self.table)
    }
}
