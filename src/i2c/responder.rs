// Licensed under the Apache-2.0 license

//! RP2040 I2C responder driver.
//!
//! The RP2040 I2C engines are DesignWare APB I2C blocks. This driver switches one of them
//! into 7-bit responder mode and exposes the polled handshake through
//! [`I2cResponderChannel`].
//!
//! The driver state is encoded in the type:
//!
//! ```text
//! new() ──> I2cResponder<_, Disabled> ──enable()──> I2cResponder<_, Enabled>
//!                  ^   │ reconfigure()                     │
//!                  │   └─────┘                             │
//!                  └──────────────disable()────────────────┘
//! ```
//!
//! Address and mode bits are only written in the `Disabled` state, which the hardware
//! requires. Only the `Enabled` state implements the channel.
//!
//! ```rust,ignore
//! let bus = unsafe { Mmio::steal() };
//! let config = ResponderConfigBuilder::new().sda_pin(0).scl_pin(1).address(0x41).build()?;
//! let mut responder = I2cResponder::init(bus, I2cInstance::I2c0, config, NoOpLogger);
//! loop {
//!     if responder.read_is_pending() {
//!         responder.put_read_data(0x09);
//!     }
//! }
//! ```

use crate::common::{format_line, Logger, NoOpLogger};
use crate::i2c::atomic::{AtomicRegisters, Bus};
use crate::i2c::common::{Error, I2cInstance, ResponderConfig};
use crate::i2c::registers::{
    GpioCtrl, I2cRegister, GPIO_CTRL_FUNCSEL, GPIO_CTRL_FUNCSEL_I2C, GPIO_CTRL_FUNCSEL_NULL,
    IC_CLR_TX_ABRT_CLR,
    IC_CON_IC_10BITADDR_SLAVE, IC_CON_IC_SLAVE_DISABLE, IC_CON_MASTER_MODE,
    IC_CON_RX_FIFO_FULL_HLD_CTRL, IC_DATA_CMD_DAT, IC_ENABLE_ENABLE, IC_RAW_INTR_STAT_RD_REQ,
    IC_SAR_MASK, IC_STATUS_RFNE,
};
use crate::i2c::traits::I2cResponderChannel;
use core::marker::PhantomData;

/// Engine configured but not listening.
pub struct Disabled;
/// Engine answering on the bus.
pub struct Enabled;

pub struct I2cResponder<B: Bus, S, L: Logger = NoOpLogger> {
    instance: I2cInstance,
    i2c: AtomicRegisters<B, I2cRegister>,
    gpio: AtomicRegisters<B, GpioCtrl>,
    config: ResponderConfig,
    logger: L,
    _state: PhantomData<S>,
}

impl<B: Bus, S, L: Logger> I2cResponder<B, S, L> {
    #[must_use]
    pub fn instance(&self) -> I2cInstance {
        self.instance
    }

    #[must_use]
    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    /// Enable bit as read back from the hardware.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.i2c.read(I2cRegister::IcEnable) & IC_ENABLE_ENABLE != 0
    }

    /// Programmed responder address as read back from the hardware.
    #[must_use]
    pub fn responder_address(&self) -> u16 {
        // Masked to the 9-bit field, so the cast is lossless.
        (self.i2c.read(I2cRegister::IcSar) & IC_SAR_MASK) as u16
    }

    pub fn logger(&mut self) -> &mut L {
        &mut self.logger
    }

    fn into_state<T>(self) -> I2cResponder<B, T, L> {
        I2cResponder {
            instance: self.instance,
            i2c: self.i2c,
            gpio: self.gpio,
            config: self.config,
            logger: self.logger,
            _state: PhantomData,
        }
    }
}

impl<B: Bus, L: Logger> I2cResponder<B, Disabled, L> {
    /// Disable `instance` and program it as a responder. The engine stays disabled.
    ///
    /// Nothing is validated: the address is masked to 9 bits and the pin numbers index the
    /// GPIO control registers directly. Build `config` with
    /// [`ResponderConfigBuilder`](crate::i2c::ResponderConfigBuilder) or use
    /// [`try_new`](Self::try_new) for range checks.
    pub fn new(bus: B, instance: I2cInstance, config: ResponderConfig, logger: L) -> Self {
        let mut responder = Self {
            instance,
            i2c: AtomicRegisters::i2c(bus.clone(), instance),
            gpio: AtomicRegisters::io_bank0(bus),
            config,
            logger,
            _state: PhantomData,
        };
        responder.i2c.clear_bits(I2cRegister::IcEnable, IC_ENABLE_ENABLE);
        responder.apply_config();
        responder
    }

    /// Like [`new`](Self::new), but refuses a configuration the hardware would silently
    /// mangle or that routes a pin to the wrong engine. Nothing is written on failure.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] with the first problem found by [`ResponderConfig::validate`].
    pub fn try_new(
        bus: B,
        instance: I2cInstance,
        config: ResponderConfig,
        logger: L,
    ) -> Result<Self, Error> {
        config.validate(instance)?;
        Ok(Self::new(bus, instance, config, logger))
    }

    /// Replace the configuration of a disabled engine.
    ///
    /// GPIOs dropped from the configuration get their function select set to NULL, so the
    /// old pins stop driving the bus.
    pub fn reconfigure(&mut self, config: ResponderConfig) {
        let previous = self.config;
        for pin in [previous.sda_pin, previous.scl_pin] {
            if pin != config.sda_pin && pin != config.scl_pin {
                self.gpio
                    .modify_field(GpioCtrl(pin), GPIO_CTRL_FUNCSEL, GPIO_CTRL_FUNCSEL_NULL);
            }
        }
        self.config = config;
        self.apply_config();
    }

    /// Start answering on the bus.
    pub fn enable(mut self) -> I2cResponder<B, Enabled, L> {
        self.i2c.set_bits(I2cRegister::IcEnable, IC_ENABLE_ENABLE);
        let line = format_line(format_args!("i2c{} responder enabled", self.instance.id()));
        self.logger.debug(&line);
        self.into_state()
    }

    fn apply_config(&mut self) {
        let config = self.config;

        self.i2c.modify_field(
            I2cRegister::IcSar,
            IC_SAR_MASK,
            u32::from(config.address),
        );

        if config.clock_stretching {
            self.i2c
                .set_bits(I2cRegister::IcCon, IC_CON_RX_FIFO_FULL_HLD_CTRL);
        } else {
            self.i2c
                .clear_bits(I2cRegister::IcCon, IC_CON_RX_FIFO_FULL_HLD_CTRL);
        }
        self.i2c.clear_bits(
            I2cRegister::IcCon,
            IC_CON_MASTER_MODE | IC_CON_IC_10BITADDR_SLAVE | IC_CON_IC_SLAVE_DISABLE,
        );

        for pin in [config.sda_pin, config.scl_pin] {
            self.gpio
                .modify_field(GpioCtrl(pin), GPIO_CTRL_FUNCSEL, GPIO_CTRL_FUNCSEL_I2C);
        }

        let line = format_line(format_args!(
            "i2c{} responder configured: address {:#04x}, sda GPIO{}, scl GPIO{}, clock stretching {}",
            self.instance.id(),
            u32::from(config.address) & IC_SAR_MASK,
            config.sda_pin,
            config.scl_pin,
            config.clock_stretching,
        ));
        self.logger.debug(&line);
    }
}

impl<B: Bus, L: Logger> I2cResponder<B, Enabled, L> {
    /// Configure and enable `instance` in one step.
    pub fn init(bus: B, instance: I2cInstance, config: ResponderConfig, logger: L) -> Self {
        I2cResponder::new(bus, instance, config, logger).enable()
    }

    /// Stop answering on the bus so the engine can be reconfigured.
    pub fn disable(mut self) -> I2cResponder<B, Disabled, L> {
        self.i2c.clear_bits(I2cRegister::IcEnable, IC_ENABLE_ENABLE);
        let line = format_line(format_args!("i2c{} responder disabled", self.instance.id()));
        self.logger.debug(&line);
        self.into_state()
    }
}

impl<B: Bus, L: Logger> I2cResponderChannel for I2cResponder<B, Enabled, L> {
    fn read_is_pending(&self) -> bool {
        self.i2c.read(I2cRegister::IcRawIntrStat) & IC_RAW_INTR_STAT_RD_REQ != 0
    }

    fn put_read_data(&mut self, data: u8) {
        // A stale abort from an earlier transfer would flush this reply.
        self.i2c
            .clear_bits(I2cRegister::IcClrTxAbrt, IC_CLR_TX_ABRT_CLR);
        // Reading IC_CLR_RD_REQ is what clears the RD_REQ latch.
        let _ = self.i2c.read(I2cRegister::IcClrRdReq);
        self.i2c
            .write(I2cRegister::IcDataCmd, u32::from(data) & IC_DATA_CMD_DAT);
    }

    fn write_data_is_available(&self) -> bool {
        self.i2c.read(I2cRegister::IcStatus) & IC_STATUS_RFNE != 0
    }

    fn read_write_data(&mut self, buffer: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buffer.iter_mut() {
            if !self.write_data_is_available() {
                break;
            }
            *slot = (self.i2c.read(I2cRegister::IcDataCmd) & IC_DATA_CMD_DAT) as u8;
            count += 1;
        }
        count
    }
}
