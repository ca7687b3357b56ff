// Licensed under the Apache-2.0 license

//! Atomic register access through the RP2040 address aliases.
//!
//! Each peripheral register is reachable at four addresses: `base | offset` for plain
//! access and `base | 0x1000/0x2000/0x3000 | offset` for XOR, set and clear. Writing a mask
//! to an alias updates the register in one bus transaction, so flag updates stay race free
//! against interrupt handlers and the other core without a read-modify-write cycle.
//!
//! All raw memory access lives in [`Mmio`]. Everything else goes through
//! [`AtomicRegisters`], whose register type parameter limits callers to the offsets of one
//! block.

use crate::i2c::common::I2cInstance;
use crate::i2c::registers::{AccessMethod, GpioCtrl, I2cRegister, Register, IO_BANK0_BASE};
use core::marker::PhantomData;
use core::ptr::{read_volatile, write_volatile};

/// 32-bit access to the physical address space.
///
/// Implementations must perform exactly one access per call, in call order.
pub trait Bus: Clone {
    fn read(&self, address: usize) -> u32;
    fn write(&self, address: usize, value: u32);
}

/// Volatile access to the real RP2040 memory map.
#[derive(Copy, Clone, Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Must only be used on an RP2040. The caller must guarantee that no other driver
    /// reconfigures the I2C engines or GPIO function selects handed to this crate.
    #[must_use]
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl Bus for Mmio {
    #[inline]
    fn read(&self, address: usize) -> u32 {
        // SAFETY: addresses are built by `AtomicRegisters` from a known peripheral base and a
        // typed register offset, so they always name a 4-byte aligned device register.
        unsafe { read_volatile(address as *const u32) }
    }

    #[inline]
    fn write(&self, address: usize, value: u32) {
        // SAFETY: see `read`.
        unsafe { write_volatile(address as *mut u32, value) }
    }
}

/// Handle on one peripheral register block.
#[derive(Clone, Debug)]
pub struct AtomicRegisters<B, R> {
    bus: B,
    base: usize,
    _registers: PhantomData<R>,
}

impl<B: Bus> AtomicRegisters<B, I2cRegister> {
    /// Registers of the given I2C engine.
    pub fn i2c(bus: B, instance: I2cInstance) -> Self {
        Self::at(bus, instance.base_address())
    }
}

impl<B: Bus> AtomicRegisters<B, GpioCtrl> {
    /// GPIO control registers of IO_BANK0.
    pub fn io_bank0(bus: B) -> Self {
        Self::at(bus, IO_BANK0_BASE)
    }
}

impl<B: Bus, R: Register> AtomicRegisters<B, R> {
    fn at(bus: B, base: usize) -> Self {
        Self {
            bus,
            base,
            _registers: PhantomData,
        }
    }

    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Physical address of `register` through the alias selected by `method`.
    #[must_use]
    pub fn address(&self, register: R, method: AccessMethod) -> usize {
        self.base | method.alias() | register.offset()
    }

    pub fn read(&self, register: R) -> u32 {
        self.bus.read(self.address(register, AccessMethod::ReadWrite))
    }

    /// Replace the whole register with `value`.
    pub fn write(&self, register: R, value: u32) {
        self.bus
            .write(self.address(register, AccessMethod::ReadWrite), value);
    }

    /// Atomically OR `mask` into the register.
    pub fn set_bits(&self, register: R, mask: u32) {
        self.bus.write(self.address(register, AccessMethod::Set), mask);
    }

    /// Atomically clear the bits of `mask` in the register.
    pub fn clear_bits(&self, register: R, mask: u32) {
        self.bus
            .write(self.address(register, AccessMethod::Clear), mask);
    }

    /// Atomically toggle the bits of `mask` in the register.
    pub fn xor_bits(&self, register: R, mask: u32) {
        self.bus.write(self.address(register, AccessMethod::Xor), mask);
    }

    /// Program a field: clear every bit of `field`, then set `value & field`.
    ///
    /// Bits outside `field` are left untouched and stale field bits never survive.
    pub fn modify_field(&self, register: R, field: u32, value: u32) {
        self.clear_bits(register, field);
        self.set_bits(register, value & field);
    }
}
