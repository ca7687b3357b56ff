// Licensed under the Apache-2.0 license

//! Bounded busy-wait helpers on top of [`I2cResponderChannel`].
//!
//! The driver itself never waits. These helpers poll the channel every
//! [`PollConfig::interval`] and give up after [`PollConfig::timeout`], sleeping through an
//! `embedded-hal` delay provider. A timeout is reported to the caller; nothing is retried.

use crate::i2c::common::{Error, PollConfig};
use crate::i2c::traits::I2cResponderChannel;
use embedded_hal::delay::DelayNs;

fn wait_until<D, F>(delay: &mut D, poll: &PollConfig, mut ready: F) -> Result<(), Error>
where
    D: DelayNs,
    F: FnMut() -> bool,
{
    let timeout = poll.timeout.to_micros();
    let interval = poll.interval.to_micros().max(1);
    let mut waited: u32 = 0;
    loop {
        if ready() {
            return Ok(());
        }
        if waited >= timeout {
            return Err(Error::Timeout);
        }
        delay.delay_us(interval);
        waited = waited.saturating_add(interval);
    }
}

/// Wait until the controller requests a byte.
///
/// # Errors
///
/// [`Error::Timeout`] if no read is requested within `poll.timeout`.
pub fn wait_for_read_request<C, D>(
    channel: &C,
    delay: &mut D,
    poll: &PollConfig,
) -> Result<(), Error>
where
    C: I2cResponderChannel,
    D: DelayNs,
{
    wait_until(delay, poll, || channel.read_is_pending())
}

/// Wait until the controller has written at least one byte.
///
/// # Errors
///
/// [`Error::Timeout`] if the RX FIFO stays empty for `poll.timeout`.
pub fn wait_for_write_data<C, D>(
    channel: &C,
    delay: &mut D,
    poll: &PollConfig,
) -> Result<(), Error>
where
    C: I2cResponderChannel,
    D: DelayNs,
{
    wait_until(delay, poll, || channel.write_data_is_available())
}

/// Answer consecutive controller reads with the bytes of `data`.
///
/// Each byte waits for its own read request, with the full `poll.timeout`.
///
/// # Errors
///
/// [`Error::Timeout`] if the first byte is never requested, or
/// [`Error::PartialResponse`] with the number of bytes already supplied when the controller
/// stops reading part way through.
pub fn respond_with<C, D>(
    channel: &mut C,
    data: &[u8],
    delay: &mut D,
    poll: &PollConfig,
) -> Result<(), Error>
where
    C: I2cResponderChannel,
    D: DelayNs,
{
    for (sent, &byte) in data.iter().enumerate() {
        match wait_for_read_request(channel, delay, poll) {
            Ok(()) => channel.put_read_data(byte),
            Err(Error::Timeout) if sent > 0 => return Err(Error::PartialResponse { sent }),
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
