//! Simulated hardware for running a node on a host.
//!
//! Every simulated peripheral is a cheaply clonable handle: the node owns one clone, the test
//! or application keeps another one to drive the inputs, inject faults, and inspect what was
//! sent.

mod adc;
mod bus;
mod radio;
mod recorder;
mod thermometer;

pub use adc::{Signal, SimAnalogFrontEnd, SimInputs, ADC_FULL_SCALE_MV};
pub use bus::SimBus;
pub use radio::{SimRadio, MAX_DATAGRAM_LEN};
pub use recorder::{Record, Recorder};
pub use thermometer::SimThermometer;

use std::sync::{Mutex, MutexGuard, PoisonError};

// A panicking test thread must not take the simulation down with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
