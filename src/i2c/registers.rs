// Licensed under the Apache-2.0 license

//! RP2040 register map used by the responder.
//!
//! Offsets and bit positions come from the RP2040 datasheet (I2C and IO_BANK0 chapters).
//! Both I2C instances share the same layout; only the base address differs.

/// Base address of the first I2C engine.
pub const I2C0_BASE: usize = 0x4004_4000;
/// Base address of the second I2C engine.
pub const I2C1_BASE: usize = 0x4004_8000;
/// Base address of the user bank GPIO control block.
pub const IO_BANK0_BASE: usize = 0x4001_4000;

/// Bits of an address that select the atomic access alias.
pub const ALIAS_MASK: usize = 0x3000;

/// Number of user bank GPIOs.
pub const NUM_BANK0_GPIOS: u8 = 30;

/// Size of one GPIO's STATUS/CTRL register pair in IO_BANK0.
pub const GPIO_REGISTER_BLOCK_SIZE: usize = 8;
/// Offset of the CTRL register within a GPIO's register pair.
pub const GPIO_CTRL_OFFSET: usize = 0x04;

// IC_CON
pub const IC_CON_MASTER_MODE: u32 = 0x01;
pub const IC_CON_IC_10BITADDR_SLAVE: u32 = 0x08;
pub const IC_CON_IC_SLAVE_DISABLE: u32 = 0x40;
pub const IC_CON_RX_FIFO_FULL_HLD_CTRL: u32 = 0x200;

// IC_SAR
pub const IC_SAR_MASK: u32 = 0x1FF;

// IC_DATA_CMD
pub const IC_DATA_CMD_DAT: u32 = 0xFF;

// IC_RAW_INTR_STAT
pub const IC_RAW_INTR_STAT_RD_REQ: u32 = 0x20;
pub const IC_RAW_INTR_STAT_TX_ABRT: u32 = 0x40;

// IC_CLR_TX_ABRT
pub const IC_CLR_TX_ABRT_CLR: u32 = 0x01;

// IC_ENABLE
pub const IC_ENABLE_ENABLE: u32 = 0x01;

// IC_STATUS
pub const IC_STATUS_RFNE: u32 = 0x08;

// GPIOx_CTRL
pub const GPIO_CTRL_FUNCSEL: u32 = 0x1F;
pub const GPIO_CTRL_FUNCSEL_I2C: u32 = 3;
pub const GPIO_CTRL_FUNCSEL_NULL: u32 = 0x1F;

/// How a write to a register is interpreted by the bus fabric.
///
/// Every peripheral register is mirrored at three extra addresses. A write to a mirror is
/// applied to the real register as XOR, bitwise set or bitwise clear, in a single bus
/// transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum AccessMethod {
    ReadWrite = 0x0000,
    Xor = 0x1000,
    Set = 0x2000,
    Clear = 0x3000,
}

impl AccessMethod {
    #[must_use]
    pub const fn alias(self) -> usize {
        self as usize
    }
}

/// A register addressable inside one peripheral block.
///
/// Offsets must stay below `0x1000` so that `base | alias | offset` cannot spill into the
/// alias bits.
pub trait Register: Copy {
    fn offset(self) -> usize;
}

/// Registers of a DesignWare I2C engine touched by the responder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum I2cRegister {
    IcCon = 0x00,
    IcTar = 0x04,
    IcSar = 0x08,
    IcDataCmd = 0x10,
    IcRawIntrStat = 0x34,
    IcRxTl = 0x38,
    IcTxTl = 0x3C,
    IcClrIntr = 0x40,
    IcClrRdReq = 0x50,
    IcClrTxAbrt = 0x54,
    IcEnable = 0x6C,
    IcStatus = 0x70,
}

impl Register for I2cRegister {
    fn offset(self) -> usize {
        self as usize
    }
}

/// CTRL register of one user bank GPIO.
///
/// A `u8` pin keeps the offset below `0x800`, inside the block, even for pins the chip
/// does not have.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GpioCtrl(pub u8);

impl Register for GpioCtrl {
    fn offset(self) -> usize {
        GPIO_CTRL_OFFSET + GPIO_REGISTER_BLOCK_SIZE * usize::from(self.0)
    }
}
