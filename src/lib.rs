//! MAX17048 Rust Driver
//!
//! Register-level driver for the MAX17048 single-cell fuel gauge over I2C:
//! cell voltage, state of charge, charge rate, voltage-alert thresholds and
//! alert flags, plus soft reset and quick-start.
//!
//! `no_std`, blocking by default over `embedded-hal` 1.0, with an async
//! mirror of the API behind the `async` feature and `defmt` support behind
//! the `defmt` feature.

#![no_std]

#[macro_use]
mod fmt;

pub mod data_types;
pub mod driver;
pub mod error;
pub mod registers;

pub use data_types::{AlertStatus, VoltageAlertLimits};
pub use driver::Max17048;
pub use error::Error;
pub use registers::DEFAULT_I2C_ADDRESS;
