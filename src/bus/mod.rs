// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Half-duplex request/reply transactions on a shared serial line.

use std::io::{self, Read, Write};

use parking_lot::Mutex;

use crate::{codec::response_len, error::*, frame::*};

#[cfg(feature = "serial")]
mod serial;
#[cfg(feature = "serial")]
pub use self::serial::*;

#[cfg(test)]
pub(crate) mod mock;

/// A duplex byte stream to the curtains.
pub trait Connection: Read + Write + Send {
    /// Drop all received but unread bytes without blocking.
    fn discard_input(&mut self) -> io::Result<()>;
}

/// One physical RS-485 line shared by any number of curtains.
///
/// Every transaction holds the line for its whole duration: the request is
/// written and the complete reply is read before the next caller gets
/// access. No bytes of concurrent transactions are interleaved.
pub struct Bus {
    conn: Mutex<Option<Box<dyn Connection>>>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Create a bus without connection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            conn: Mutex::new(None),
        }
    }

    /// Create a bus on an already opened connection.
    #[must_use]
    pub fn with_connection(conn: Box<dyn Connection>) -> Self {
        let bus = Self::new();
        bus.activate(conn);
        bus
    }

    /// Attach the connection. A previously attached one is closed.
    pub fn activate(&self, conn: Box<dyn Connection>) {
        log::debug!("Activating bus");
        if self.conn.lock().replace(conn).is_some() {
            log::debug!("Closed previous connection");
        }
    }

    /// Detach and return the connection.
    ///
    /// Waits for a running transaction to finish. Dropping the returned
    /// connection closes it.
    pub fn deactivate(&self) -> Option<Box<dyn Connection>> {
        log::debug!("Deactivating bus");
        self.conn.lock().take()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.lock().is_some()
    }

    /// Send `request` and wait for the reply.
    ///
    /// Returns `Ok(None)` if no connection is attached. The reply is
    /// returned as received; checking it with [`Packet::validate`] is up to
    /// the caller.
    pub fn execute(&self, request: &Packet) -> Result<Option<Packet>, BusError> {
        let reply_len = response_len(request)
            .map_err(|_| BusError::UnsupportedFunction(request.function_code()))?;

        let mut guard = self.conn.lock();
        let Some(conn) = guard.as_mut() else {
            return Ok(None);
        };

        log::trace!("Sending {request:X}, expecting {reply_len} bytes");
        conn.write_all(request.as_bytes())?;
        conn.flush()?;

        let reply = read_exact_len(&mut **conn, reply_len)?;
        let reply = Packet::from_raw(reply);
        log::trace!("Received {reply:X}");
        Ok(Some(reply))
    }

    /// Drop all pending input of the line.
    ///
    /// Used after a corrupted reply so that stale bytes don't end up in
    /// the next transaction.
    pub fn flush(&self) -> Result<(), BusError> {
        let mut guard = self.conn.lock();
        if let Some(conn) = guard.as_mut() {
            conn.discard_input()?;
        }
        Ok(())
    }
}

/// Read exactly `len` bytes, accumulating partial reads.
fn read_exact_len(conn: &mut dyn Connection, len: usize) -> Result<Vec<u8>, BusError> {
    let mut buf = vec![0; len];
    let mut offset = 0;
    while offset < len {
        match conn.read(&mut buf[offset..]) {
            // A serial line that stays silent until the timeout returns nothing.
            Ok(0) => return Err(BusError::ReadTimeout),
            Ok(n) => offset += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(buf)
}
