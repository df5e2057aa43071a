//! Acquisition, conversion and transmission engine of an analog telemetry node.
//!
//! The node samples its analog channels, derives physical quantities from them, and
//! periodically sends them on two independent links:
//!
//! ```text
//! AnalogFrontEnd -> Acquisition -> VoltageStore -+-> Derivation -> PressureStore -+
//!                                                |                                |
//!                                                +--------> BusTransmitter <------+
//!                                                +--------> WirelessTransmitter
//! ```
//!
//! Each stage is a [`PeriodicJob`]; the only coupling between jobs are the two stores, each
//! behind its own lock.
//! Lock waits are bounded: a job that cannot get a lock in time skips its write, or reuses
//! the last values it read.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub mod acquisition;
pub mod bus;
pub mod config;
pub mod derivation;
mod error;
pub mod job;
pub mod layout;
mod node;
pub mod profile;
pub mod store;
pub mod wireless;

pub use error::{Error, InitError};
pub use job::PeriodicJob;
pub use node::{Jobs, Node};

// Re-exports for backends and applications.
pub use telenode_convert as convert;
pub use telenode_hal as hal;
