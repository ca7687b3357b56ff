// Licensed under the Apache-2.0 license

//! RP2040 I2C responder driver module.
//!
//! Drives one of the two DesignWare I2C engines of the RP2040 as a polled I2C responder
//! (slave). Register updates go through the atomic alias windows of the APB bridge, so no
//! read-modify-write sequence is ever issued against the hardware.

pub mod atomic;
pub mod common;
pub mod poll;
pub mod registers;
pub mod responder;
pub mod responder_async;
pub mod traits;

#[cfg(test)]
mod mock;

pub use atomic::{AtomicRegisters, Bus, Mmio};
pub use common::{
    i2c_pin_function, ConfigurationError, Error, I2cInstance, PinRole, PollConfig,
    ResponderConfig, ResponderConfigBuilder,
};
pub use responder::{Disabled, Enabled, I2cResponder};
pub use traits::I2cResponderChannel;
