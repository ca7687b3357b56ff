// Licensed under the Apache-2.0 license

//! # I2C Responder Channel Traits
//!
//! The polled handshake between firmware and an I2C engine running in responder mode,
//! expressed as one trait so that the blocking, non-blocking and async helpers work with
//! any implementation.
//!
//! ## Read side (controller reads from us)
//!
//! The engine latches RD_REQ and stretches the clock until firmware pushes a byte.
//! Poll [`I2cResponderChannel::read_is_pending`], then answer with
//! [`I2cResponderChannel::put_read_data`], once per byte the controller reads.
//!
//! ## Write side (controller writes to us)
//!
//! Received bytes queue up in the RX FIFO. Poll
//! [`I2cResponderChannel::write_data_is_available`] and drain them with
//! [`I2cResponderChannel::get_write_data`] or [`I2cResponderChannel::read_write_data`].
//!
//! ```rust,ignore
//! loop {
//!     if responder.read_is_pending() {
//!         responder.put_read_data(next_reply());
//!     }
//!     let data: heapless::Vec<u8, 16> = responder.get_write_data(16);
//!     handle(&data);
//! }
//! ```

use core::convert::Infallible;
use heapless::Vec;

/// Polled responder handshake.
pub trait I2cResponderChannel {
    /// Whether the controller is waiting for a byte from us.
    ///
    /// Reflects the hardware latch on every call; the latch is only cleared by
    /// [`put_read_data`](Self::put_read_data).
    fn read_is_pending(&self) -> bool;

    /// Supply the byte for the pending controller read.
    ///
    /// Must only be called while [`read_is_pending`](Self::read_is_pending) is true.
    /// Calling it otherwise queues a byte the controller never asked for, which will be
    /// sent as the reply to the next read.
    fn put_read_data(&mut self, data: u8);

    /// Whether the RX FIFO holds at least one byte written by the controller.
    fn write_data_is_available(&self) -> bool;

    /// Move queued bytes into `buffer` in arrival order.
    ///
    /// Stops when the FIFO is empty or `buffer` is full and returns the number of bytes
    /// stored. Never waits for more bytes to arrive. An empty buffer leaves the FIFO alone.
    fn read_write_data(&mut self, buffer: &mut [u8]) -> usize;

    /// Collect up to `max_size` queued bytes, stopping early once the FIFO is empty.
    ///
    /// The result can never hold more than `N` bytes. When `max_size > N` the call also
    /// stops after `N` bytes and leaves the rest queued for the next call, so pick `N` at
    /// least as large as the biggest `max_size` when every queued byte must come back in one
    /// call. [`read_write_data`](Self::read_write_data) has no such cap.
    fn get_write_data<const N: usize>(&mut self, max_size: usize) -> Vec<u8, N> {
        let mut data = Vec::new();
        // Cannot fail: the length is capped at the capacity.
        let _ = data.resize(max_size.min(N), 0);
        let count = self.read_write_data(data.as_mut_slice());
        data.truncate(count);
        data
    }

    /// Answer a pending read with `data`, or report that none is pending yet.
    ///
    /// Suited to `nb::block!` when the caller wants to spin until the controller asks.
    fn try_respond(&mut self, data: u8) -> nb::Result<(), Infallible> {
        if self.read_is_pending() {
            self.put_read_data(data);
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Take one byte written by the controller, or report that the FIFO is empty.
    fn try_read(&mut self) -> nb::Result<u8, Infallible> {
        let mut byte = [0u8; 1];
        if self.read_write_data(&mut byte) == 1 {
            let [value] = byte;
            Ok(value)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}
