// Licensed under the Apache-2.0 license

//! Common types for the RP2040 I2C responder.
//!
//! This module provides the instance selector, the responder configuration and its
//! builder, and the error types shared by the driver and the polling helpers.

use crate::i2c::registers::{I2C0_BASE, I2C1_BASE, NUM_BANK0_GPIOS};
use core::fmt;
use embedded_hal::i2c::SevenBitAddress;
use fugit::{ExtU32, MicrosDurationU32};

/// One of the two on-chip I2C engines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum I2cInstance {
    I2c0 = 0,
    I2c1 = 1,
}

impl I2cInstance {
    pub const ALL: [I2cInstance; 2] = [I2cInstance::I2c0, I2cInstance::I2c1];

    /// Select an engine by its number.
    pub fn from_id(id: u8) -> Result<Self, ConfigurationError> {
        match id {
            0 => Ok(Self::I2c0),
            1 => Ok(Self::I2c1),
            other => Err(ConfigurationError::InvalidInstance(other)),
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn base_address(self) -> usize {
        match self {
            Self::I2c0 => I2C0_BASE,
            Self::I2c1 => I2C1_BASE,
        }
    }
}

/// Role a GPIO takes when its function select is set to I2C.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PinRole {
    Sda,
    Scl,
}

/// Engine and role the I2C function of `pin` is wired to.
///
/// The pin mux repeats every four GPIOs: SDA0, SCL0, SDA1, SCL1.
#[must_use]
pub const fn i2c_pin_function(pin: u8) -> (I2cInstance, PinRole) {
    let instance = if (pin >> 1) & 1 == 0 {
        I2cInstance::I2c0
    } else {
        I2cInstance::I2c1
    };
    let role = if pin & 1 == 0 { PinRole::Sda } else { PinRole::Scl };
    (instance, role)
}

/// Static configuration of a responder.
///
/// Fields are public so a configuration can be written as a literal. Such a configuration
/// is not validated: the address is masked to the 9-bit SAR field when programmed and the
/// pin number feeds the GPIO register offset directly. Use [`ResponderConfigBuilder`] to
/// reject out-of-range values up front.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResponderConfig {
    pub sda_pin: u8,
    pub scl_pin: u8,
    pub address: u16,
    /// Hold SCL low while the RX FIFO is full instead of dropping bytes.
    pub clock_stretching: bool,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            sda_pin: 0,
            scl_pin: 1,
            address: 0x41,
            clock_stretching: false,
        }
    }
}

impl ResponderConfig {
    /// Full check of a configuration for `instance`: the address fits in 7 bits, both pins
    /// are user bank GPIOs and each is wired to `instance` in its role.
    ///
    /// # Errors
    ///
    /// The first problem found, in that order.
    pub fn validate(&self, instance: I2cInstance) -> Result<(), ConfigurationError> {
        if self.address > 0x7F {
            return Err(ConfigurationError::InvalidAddress(self.address));
        }
        for pin in [self.sda_pin, self.scl_pin] {
            if pin >= NUM_BANK0_GPIOS {
                return Err(ConfigurationError::InvalidPin(pin));
            }
        }
        self.check_routing(instance)
    }

    /// Check that both pins reach `instance` in the expected role.
    pub fn check_routing(&self, instance: I2cInstance) -> Result<(), ConfigurationError> {
        for (pin, role) in [(self.sda_pin, PinRole::Sda), (self.scl_pin, PinRole::Scl)] {
            if i2c_pin_function(pin) != (instance, role) {
                return Err(ConfigurationError::PinNotRouted { pin, instance });
            }
        }
        Ok(())
    }
}

pub struct ResponderConfigBuilder {
    sda_pin: u8,
    scl_pin: u8,
    address: SevenBitAddress,
    clock_stretching: bool,
}

impl Default for ResponderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponderConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        let defaults = ResponderConfig::default();
        Self {
            sda_pin: defaults.sda_pin,
            scl_pin: defaults.scl_pin,
            address: 0x41,
            clock_stretching: defaults.clock_stretching,
        }
    }
    #[must_use]
    pub fn sda_pin(mut self, pin: u8) -> Self {
        self.sda_pin = pin;
        self
    }
    #[must_use]
    pub fn scl_pin(mut self, pin: u8) -> Self {
        self.scl_pin = pin;
        self
    }
    #[must_use]
    pub fn address(mut self, address: SevenBitAddress) -> Self {
        self.address = address;
        self
    }
    #[must_use]
    pub fn clock_stretching(mut self, enabled: bool) -> Self {
        self.clock_stretching = enabled;
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the address does not fit in 7 bits, when a pin is not a user bank GPIO,
    /// or when SDA and SCL are the same pin.
    pub fn build(self) -> Result<ResponderConfig, ConfigurationError> {
        if self.address > 0x7F {
            return Err(ConfigurationError::InvalidAddress(u16::from(self.address)));
        }
        for pin in [self.sda_pin, self.scl_pin] {
            if pin >= NUM_BANK0_GPIOS {
                return Err(ConfigurationError::InvalidPin(pin));
            }
        }
        if self.sda_pin == self.scl_pin {
            return Err(ConfigurationError::PinConflict(self.sda_pin));
        }
        Ok(ResponderConfig {
            sda_pin: self.sda_pin,
            scl_pin: self.scl_pin,
            address: u16::from(self.address),
            clock_stretching: self.clock_stretching,
        })
    }
}

/// Timing of the bounded waits in [`crate::i2c::poll`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Give up after this long without the awaited condition.
    pub timeout: MicrosDurationU32,
    /// Pause between two polls.
    pub interval: MicrosDurationU32,
}

impl Default for PollConfig {
    fn default() -> Self {
        // A byte takes ~90us at 100 kHz; poll well inside that.
        Self {
            timeout: 100.millis(),
            interval: 10.micros(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    InvalidInstance(u8),
    InvalidAddress(u16),
    InvalidPin(u8),
    PinConflict(u8),
    PinNotRouted { pin: u8, instance: I2cInstance },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInstance(id) => write!(f, "no I2C instance {id}"),
            Self::InvalidAddress(address) => {
                write!(f, "address {address:#x} does not fit in 7 bits")
            }
            Self::InvalidPin(pin) => write!(f, "GPIO{pin} is not a user bank pin"),
            Self::PinConflict(pin) => write!(f, "GPIO{pin} used for both SDA and SCL"),
            Self::PinNotRouted { pin, instance } => {
                write!(f, "GPIO{pin} is not wired to I2C{}", instance.id())
            }
        }
    }
}

/// Errors reported by the checked constructor and the polling helpers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Config(ConfigurationError),
    /// The awaited bus event did not happen in time.
    Timeout,
    /// The controller stopped requesting bytes after `sent` of them were supplied.
    PartialResponse { sent: usize },
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Self::Config(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Timeout => f.write_str("timed out waiting for the controller"),
            Self::PartialResponse { sent } => {
                write!(f, "controller stopped reading after {sent} bytes")
            }
        }
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        embedded_hal::i2c::ErrorKind::Other
    }
}
