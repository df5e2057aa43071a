//! Sensor models fitted on the node.

use telenode_convert::{
    CalibrationPoint, LinearCalibration, MeasurementUnit, PressureCalibration,
    QuadraticCalibration, ResistanceTable,
};

/// Resistance curve of the Bosch NTC temperature sensors (0280130026, 0280130039).
pub const BOSCH_NTC: ResistanceTable = ResistanceTable::new(&[
    CalibrationPoint::new(-40, 45313),
    CalibrationPoint::new(-30, 26114),
    CalibrationPoint::new(-20, 15462),
    CalibrationPoint::new(-10, 9397),
    CalibrationPoint::new(0, 5896),
    CalibrationPoint::new(10, 3792),
    CalibrationPoint::new(20, 2500),
    CalibrationPoint::new(25, 2057),
    CalibrationPoint::new(30, 1707),
    CalibrationPoint::new(40, 1175),
    CalibrationPoint::new(50, 834),
    CalibrationPoint::new(60, 596),
    CalibrationPoint::new(70, 436),
    CalibrationPoint::new(80, 323),
    CalibrationPoint::new(90, 243),
    CalibrationPoint::new(100, 187),
    CalibrationPoint::new(110, 144),
    CalibrationPoint::new(120, 113),
    CalibrationPoint::new(130, 89),
]);

/// A pressure sensor model: its calibration and the unit it reports in.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressureSensor {
    /// Voltage to pressure mapping.
    pub calibration: PressureCalibration,
    /// Unit of the pressure.
    pub unit: MeasurementUnit,
}

/// BMW TMAP sensor (13627843531), pressure side.
pub const BMW_TMAP: PressureSensor = PressureSensor {
    calibration: PressureCalibration::Quadratic(QuadraticCalibration::new(
        -2.502, 72.145, 30.300,
    )),
    unit: MeasurementUnit::Kilopascal,
};

/// Generic 0-30 psi ratiometric sensor.
pub const PSI_30: PressureSensor = PressureSensor {
    calibration: PressureCalibration::Linear(LinearCalibration::new(500, 4500, 0.0, 30.0)),
    unit: MeasurementUnit::Psi,
};

/// Bosch MAP sensor (0261230119).
pub const BOSCH_MAP: PressureSensor = PressureSensor {
    calibration: PressureCalibration::Linear(LinearCalibration::new(400, 4650, 20.0, 300.0)),
    unit: MeasurementUnit::Kilopascal,
};

/// Generic 0-150 psi ratiometric sensor, reporting in bar.
pub const BAR_10: PressureSensor = PressureSensor {
    calibration: PressureCalibration::Linear(LinearCalibration::new(500, 4500, 0.0, 6.89)),
    unit: MeasurementUnit::Bar,
};
