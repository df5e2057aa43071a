//! Pure conversion algorithms for analog sensor channels.
//!
//! - [`median`] and [`FilterState`] reject electrical noise from a short burst of samples.
//! - [`LowPassState`] smooths a channel across bursts.
//! - [`Thermistor`] turns an NTC divider voltage into degrees Celsius through a
//!   [`ResistanceTable`].
//! - [`PressureCalibration`] maps a sensor voltage to a pressure, as a fixed-point value scaled
//!   by 10^[`PRESSURE_SCALING`].
//!
//! Nothing in this crate holds state across calls except the filter types, which are owned by
//! their caller.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

mod error;
pub mod filter;
pub mod pressure;
pub mod thermistor;
mod unit;

pub use error::ConversionError;
pub use filter::{median, FilterState, LowPass, LowPassState, DEFAULT_FILTER_DEPTH};
pub use pressure::{
    sensor_pressure, LinearCalibration, PressureCalibration, QuadraticCalibration,
    PRESSURE_SCALING,
};
pub use thermistor::{
    sensor_temperature, CalibrationPoint, ResistanceTable, Thermistor, FAULT_CELSIUS,
};
pub use unit::MeasurementUnit;
