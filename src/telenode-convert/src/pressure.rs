//! Pressure sensor calibrations.
//!
//! Pressures are returned as unsigned fixed-point integers: the physical value is
//! `value · 10^PRESSURE_SCALING`, so `3000` is 30.00 in the unit of the sensor.
//! This scaling is part of the wire format.

/// Decimal scaling of the fixed-point pressures returned by this module.
pub const PRESSURE_SCALING: i8 = -2;

const SCALE: f32 = 100.0;

/// Linear sensor: the pressure is proportional to the voltage between two endpoints.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearCalibration {
    /// Voltage at the lower end of the range, in millivolts.
    pub v_min_mv: u16,
    /// Voltage at the upper end of the range, in millivolts.
    pub v_max_mv: u16,
    /// Pressure at `v_min_mv`.
    pub p_min: f32,
    /// Pressure at `v_max_mv`.
    pub p_max: f32,
}

impl LinearCalibration {
    /// Creates a linear calibration.
    ///
    /// # Panics
    ///
    /// Panics if `v_max_mv` is not above `v_min_mv`.
    #[must_use]
    pub const fn new(v_min_mv: u16, v_max_mv: u16, p_min: f32, p_max: f32) -> Self {
        assert!(v_max_mv > v_min_mv, "empty calibration voltage range");
        Self {
            v_min_mv,
            v_max_mv,
            p_min,
            p_max,
        }
    }

    /// Returns the pressure for `v_mv`, clamping the voltage into the calibrated range.
    #[must_use]
    pub fn pressure(&self, v_mv: u16) -> f32 {
        let span = self.v_max_mv.saturating_sub(self.v_min_mv);
        if span == 0 {
            return self.p_min;
        }
        let v_mv = v_mv.max(self.v_min_mv).min(self.v_max_mv);
        let fraction = f32::from(v_mv - self.v_min_mv) / f32::from(span);
        self.p_min + fraction * (self.p_max - self.p_min)
    }
}

/// Sensor following a second-order fit of its output voltage:
/// `pressure = a·V² + b·V + c`, with `V` in volts.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadraticCalibration {
    /// Second-order coefficient.
    pub a: f32,
    /// First-order coefficient.
    pub b: f32,
    /// Constant term.
    pub c: f32,
}

impl QuadraticCalibration {
    /// Creates a quadratic calibration.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// Returns the pressure for `v_mv`.
    #[must_use]
    pub fn pressure(&self, v_mv: u16) -> f32 {
        let volts = f32::from(v_mv) / 1000.0;
        (self.a * volts + self.b) * volts + self.c
    }
}

/// Calibration of one pressure channel.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureCalibration {
    /// See [`LinearCalibration`].
    Linear(LinearCalibration),
    /// See [`QuadraticCalibration`].
    Quadratic(QuadraticCalibration),
}

impl PressureCalibration {
    /// Returns the pressure for `v_mv` as a fixed-point value, see [`PRESSURE_SCALING`].
    ///
    /// Negative pressures read as 0, pressures above the fixed-point range saturate.
    #[must_use]
    pub fn scaled(&self, v_mv: u16) -> u16 {
        let pressure = match self {
            Self::Linear(linear) => linear.pressure(v_mv),
            Self::Quadratic(quadratic) => quadratic.pressure(v_mv),
        };
        to_fixed_point(pressure)
    }
}

impl From<LinearCalibration> for PressureCalibration {
    fn from(linear: LinearCalibration) -> Self {
        Self::Linear(linear)
    }
}

impl From<QuadraticCalibration> for PressureCalibration {
    fn from(quadratic: QuadraticCalibration) -> Self {
        Self::Quadratic(quadratic)
    }
}

/// Returns the pressure of a linear sensor for `v_mv` as a fixed-point value, see
/// [`PRESSURE_SCALING`].
///
/// `v_mv` is clamped into the calibrated range first, and negative pressures read as 0.
#[must_use]
pub fn sensor_pressure(v_mv: u16, calibration: &LinearCalibration) -> u16 {
    to_fixed_point(calibration.pressure(v_mv))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "float to int `as` casts saturate, the sign is checked first"
)]
fn to_fixed_point(pressure: f32) -> u16 {
    if pressure.is_nan() || pressure <= 0.0 {
        return 0;
    }
    // Rounds half up; `f32::round()` is not available in `core`.
    (pressure * SCALE + 0.5) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXHAUST_BACK_PRESSURE: LinearCalibration = LinearCalibration::new(500, 4500, 0.0, 30.0);
    const CRANK_CASE: LinearCalibration = LinearCalibration::new(400, 4650, 20.0, 300.0);
    const OIL: LinearCalibration = LinearCalibration::new(500, 4500, 0.0, 6.89);

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(sensor_pressure(500, &EXHAUST_BACK_PRESSURE), 0);
        assert_eq!(sensor_pressure(4500, &EXHAUST_BACK_PRESSURE), 3000);

        assert_eq!(sensor_pressure(400, &CRANK_CASE), 2000);
        assert_eq!(sensor_pressure(4650, &CRANK_CASE), 30000);

        assert_eq!(sensor_pressure(500, &OIL), 0);
        assert_eq!(sensor_pressure(4500, &OIL), 689);
    }

    #[test]
    fn test_linear_midpoint() {
        assert_eq!(sensor_pressure(2500, &EXHAUST_BACK_PRESSURE), 1500);
        assert_eq!(sensor_pressure(1500, &EXHAUST_BACK_PRESSURE), 750);
    }

    #[test]
    fn test_linear_clamps_outside_range() {
        assert_eq!(sensor_pressure(0, &EXHAUST_BACK_PRESSURE), 0);
        assert_eq!(sensor_pressure(100, &CRANK_CASE), 2000);
        assert_eq!(sensor_pressure(5000, &EXHAUST_BACK_PRESSURE), 3000);
        assert_eq!(sensor_pressure(u16::MAX, &CRANK_CASE), 30000);
    }

    #[test]
    fn test_negative_pressure_reads_zero() {
        let vacuum = LinearCalibration::new(500, 4500, -100.0, 100.0);
        assert_eq!(sensor_pressure(500, &vacuum), 0);
        assert_eq!(sensor_pressure(2500, &vacuum), 0);
        assert_eq!(sensor_pressure(4500, &vacuum), 10000);
    }

    #[test]
    fn test_saturates() {
        let huge = LinearCalibration::new(0, 1000, 0.0, 1000.0);
        assert_eq!(sensor_pressure(1000, &huge), u16::MAX);
    }

    #[test]
    fn test_quadratic() {
        let tmap = PressureCalibration::from(QuadraticCalibration::new(-2.502, 72.145, 30.300));

        // 30.3 kPa at 0 V.
        assert_eq!(tmap.scaled(0), 3030);

        // -2.502 * 6.25 + 72.145 * 2.5 + 30.3 = 195.025 kPa
        let at_2500 = tmap.scaled(2500);
        assert!((19502..=19503).contains(&at_2500), "{at_2500}");

        let falling = PressureCalibration::from(QuadraticCalibration::new(0.0, -10.0, 10.0));
        assert_eq!(falling.scaled(2000), 0);
    }

    #[test]
    fn test_calibration_variants_agree() {
        let linear = PressureCalibration::from(EXHAUST_BACK_PRESSURE);
        for v_mv in (0..5000).step_by(250) {
            assert_eq!(linear.scaled(v_mv), sensor_pressure(v_mv, &EXHAUST_BACK_PRESSURE));
        }
    }
}
