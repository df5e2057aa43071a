//! Architecture-agnostic types shared between the node and its hardware backends.
//!
//! The node reaches the hardware only through the traits of this crate:
//!
//! - [`AnalogFrontEnd`] for calibrated millivolt readings of the analog channels,
//! - [`CpuThermometer`] for the CPU-internal temperature sensor,
//! - [`BusController`] for the bus link,
//! - [`Radio`] for the wireless datagram link.
//!
//! Installing and configuring the underlying peripherals is the job of the backend.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

mod adc;
mod bus;
pub mod channel;
mod divider;
mod error;
pub mod frame;
mod radio;
mod thermometer;

pub use adc::AnalogFrontEnd;
pub use bus::{BusController, SEND_TIMEOUT};
pub use channel::{Channel, ChannelOutOfRange, CHANNEL_COUNT};
pub use divider::InputDivider;
pub use error::{BusError, HardwareError, SendError};
pub use frame::Frame;
pub use radio::{PeerAddress, Radio};
pub use thermometer::CpuThermometer;

// Used by backends implementing the traits.
pub use embassy_time;
