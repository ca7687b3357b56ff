// Licensed under the Apache-2.0 license

//! In-memory model of the RP2040 register space for tests.
//!
//! Decodes the alias bits of every access the way the bus fabric does and emulates the
//! parts of the DesignWare engine the responder relies on: the RX/TX FIFOs behind
//! `IC_DATA_CMD`, the RD_REQ and TX_ABRT latches and their clear-on-read registers, and the
//! RFNE status bit. Every access is recorded, and writes to the address or mode registers
//! while the engine is enabled are flagged.

use crate::i2c::atomic::Bus;
use crate::i2c::common::I2cInstance;
use crate::i2c::registers::{
    AccessMethod, I2cRegister, ALIAS_MASK, IC_DATA_CMD_DAT, IC_ENABLE_ENABLE,
    IC_RAW_INTR_STAT_RD_REQ, IC_RAW_INTR_STAT_TX_ABRT, IC_STATUS_RFNE,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::vec::Vec;

const IC_CON: usize = I2cRegister::IcCon as usize;
const IC_SAR: usize = I2cRegister::IcSar as usize;
const IC_DATA_CMD: usize = I2cRegister::IcDataCmd as usize;
const IC_RAW_INTR_STAT: usize = I2cRegister::IcRawIntrStat as usize;
const IC_CLR_RD_REQ: usize = I2cRegister::IcClrRdReq as usize;
const IC_CLR_TX_ABRT: usize = I2cRegister::IcClrTxAbrt as usize;
const IC_ENABLE: usize = I2cRegister::IcEnable as usize;
const IC_STATUS: usize = I2cRegister::IcStatus as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Read(usize),
    Write(usize, u32),
}

#[derive(Default)]
struct Engine {
    rx_fifo: VecDeque<u8>,
    transmitted: Vec<u8>,
    read_requested: bool,
    tx_abort: bool,
}

#[derive(Default)]
struct State {
    registers: HashMap<usize, u32>,
    engines: HashMap<usize, Engine>,
    trace: Vec<Access>,
    violations: Vec<usize>,
}

#[derive(Default)]
pub struct MockBus {
    state: RefCell<State>,
}

/// Split an address into block base, access method and register offset.
fn decode(address: usize) -> (usize, AccessMethod, usize) {
    let method = match address & ALIAS_MASK {
        0x1000 => AccessMethod::Xor,
        0x2000 => AccessMethod::Set,
        0x3000 => AccessMethod::Clear,
        _ => AccessMethod::ReadWrite,
    };
    let register = address & !ALIAS_MASK;
    (register & !0xFFF, method, register & 0xFFF)
}

fn is_i2c_block(block: usize) -> bool {
    I2cInstance::ALL
        .iter()
        .any(|instance| instance.base_address() == block)
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a register without recording an access.
    pub fn preload(&self, address: usize, value: u32) {
        self.state
            .borrow_mut()
            .registers
            .insert(address & !ALIAS_MASK, value);
    }

    /// Stored value of a register, without side effects.
    pub fn peek(&self, address: usize) -> u32 {
        self.state
            .borrow()
            .registers
            .get(&(address & !ALIAS_MASK))
            .copied()
            .unwrap_or(0)
    }

    pub fn trace(&self) -> Vec<Access> {
        self.state.borrow().trace.clone()
    }

    pub fn clear_trace(&self) {
        self.state.borrow_mut().trace.clear();
    }

    /// Registers written while their engine was enabled.
    pub fn violations(&self) -> Vec<usize> {
        self.state.borrow().violations.clone()
    }

    /// Controller side: bytes of an I2C write addressed to the responder.
    pub fn controller_write(&self, instance: I2cInstance, bytes: &[u8]) {
        self.with_engine(instance, |engine| engine.rx_fifo.extend(bytes.iter().copied()));
    }

    /// Controller side: the controller clocks in one more byte of an I2C read.
    pub fn controller_read_request(&self, instance: I2cInstance) {
        self.with_engine(instance, |engine| engine.read_requested = true);
    }

    /// Controller side: bytes the controller has received so far.
    pub fn controller_received(&self, instance: I2cInstance) -> Vec<u8> {
        self.with_engine(instance, |engine| engine.transmitted.clone())
    }

    pub fn raise_tx_abort(&self, instance: I2cInstance) {
        self.with_engine(instance, |engine| engine.tx_abort = true);
    }

    pub fn tx_abort_latched(&self, instance: I2cInstance) -> bool {
        self.with_engine(instance, |engine| engine.tx_abort)
    }

    pub fn rx_fifo_len(&self, instance: I2cInstance) -> usize {
        self.with_engine(instance, |engine| engine.rx_fifo.len())
    }

    fn with_engine<T>(&self, instance: I2cInstance, f: impl FnOnce(&mut Engine) -> T) -> T {
        let mut state = self.state.borrow_mut();
        f(state.engines.entry(instance.base_address()).or_default())
    }
}

impl Bus for &MockBus {
    fn read(&self, address: usize) -> u32 {
        let mut state = self.state.borrow_mut();
        state.trace.push(Access::Read(address));
        let (block, _, offset) = decode(address);
        let register = address & !ALIAS_MASK;
        let stored = state.registers.get(&register).copied().unwrap_or(0);

        if !is_i2c_block(block) {
            return stored;
        }
        let engine = state.engines.entry(block).or_default();
        match offset {
            IC_DATA_CMD => engine.rx_fifo.pop_front().map_or(0, u32::from),
            IC_STATUS => {
                if engine.rx_fifo.is_empty() {
                    stored & !IC_STATUS_RFNE
                } else {
                    stored | IC_STATUS_RFNE
                }
            }
            IC_RAW_INTR_STAT => {
                let mut value = 0;
                if engine.read_requested {
                    value |= IC_RAW_INTR_STAT_RD_REQ;
                }
                if engine.tx_abort {
                    value |= IC_RAW_INTR_STAT_TX_ABRT;
                }
                value
            }
            IC_CLR_RD_REQ => u32::from(core::mem::take(&mut engine.read_requested)),
            IC_CLR_TX_ABRT => u32::from(core::mem::take(&mut engine.tx_abort)),
            _ => stored,
        }
    }

    fn write(&self, address: usize, value: u32) {
        let mut state = self.state.borrow_mut();
        state.trace.push(Access::Write(address, value));
        let (block, method, offset) = decode(address);
        let register = address & !ALIAS_MASK;

        if is_i2c_block(block) {
            let enabled = state
                .registers
                .get(&(block | IC_ENABLE))
                .is_some_and(|enable| enable & IC_ENABLE_ENABLE != 0);
            if enabled && matches!(offset, IC_CON | IC_SAR) {
                state.violations.push(register);
            }
            let engine = state.engines.entry(block).or_default();
            match (offset, method) {
                (IC_DATA_CMD, AccessMethod::ReadWrite) => {
                    engine.transmitted.push((value & IC_DATA_CMD_DAT) as u8);
                    return;
                }
                (IC_CLR_TX_ABRT, _) => {
                    engine.tx_abort = false;
                    return;
                }
                _ => {}
            }
        }

        let current = state.registers.get(&register).copied().unwrap_or(0);
        let updated = match method {
            AccessMethod::ReadWrite => value,
            AccessMethod::Xor => current ^ value,
            AccessMethod::Set => current | value,
            AccessMethod::Clear => current & !value,
        };
        state.registers.insert(register, updated);
    }
}
