// Licensed under the Apache-2.0 license

//! Async adapters for running the responder loop as an executor task.
//!
//! Each future re-polls the hardware every time the executor polls it and wakes itself
//! while the condition is false, so the responder keeps getting CPU time without an
//! interrupt handler. Run it on a different task or core than any blocking controller-side
//! call on the same chip.

use crate::i2c::traits::I2cResponderChannel;
use core::future::poll_fn;
use core::task::Poll;

/// Resolve once the controller requests a byte.
pub async fn read_request<C: I2cResponderChannel>(channel: &C) {
    poll_fn(|cx| {
        if channel.read_is_pending() {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await;
}

/// Wait for the next controller read and answer it with `data`.
pub async fn respond<C: I2cResponderChannel>(channel: &mut C, data: u8) {
    read_request(&*channel).await;
    channel.put_read_data(data);
}

/// Answer one controller read per byte of `data`.
pub async fn respond_all<C: I2cResponderChannel>(channel: &mut C, data: &[u8]) {
    for &byte in data {
        respond(channel, byte).await;
    }
}

/// Wait until the controller has written something, then drain up to `buffer.len()` bytes.
///
/// Returns the number of bytes stored. An empty buffer resolves immediately with 0.
pub async fn read<C: I2cResponderChannel>(channel: &mut C, buffer: &mut [u8]) -> usize {
    if buffer.is_empty() {
        return 0;
    }
    poll_fn(|cx| {
        if channel.write_data_is_available() {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await;
    channel.read_write_data(buffer)
}
