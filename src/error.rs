// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, io};

/// herzborg-core frame error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Frame shorter than the minimum frame length
    BufferSize(usize),
    /// Invalid function code
    FnCode(u8),
    /// Invalid start marker
    Start(u8),
    /// Invalid CRC
    Crc(u16, u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            BufferSize(len) => write!(f, "Invalid buffer size: {len}"),
            FnCode(fn_code) => write!(f, "Invalid function code: 0x{fn_code:0>2X}"),
            Start(byte) => write!(f, "Invalid start marker: 0x{byte:0>2X}"),
            Crc(expected, actual) => write!(
                f,
                "Invalid CRC: expected = 0x{expected:0>4X}, actual = 0x{actual:0>4X}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Failure of a single bus transaction.
#[derive(Debug)]
pub enum BusError {
    /// The line delivered no bytes before the read timeout expired.
    ReadTimeout,
    /// The stream reported end of file.
    ConnectionClosed,
    /// The request carries a function code without a known reply length.
    UnsupportedFunction(u8),
    /// Any other I/O failure of the underlying stream.
    Io(io::Error),
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BusError::*;

        match self {
            ReadTimeout => write!(f, "Serial read timeout"),
            ConnectionClosed => write!(f, "EOF from serial port"),
            UnsupportedFunction(fn_code) => {
                write!(f, "Unsupported function code: 0x{fn_code:0>2X}")
            }
            Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for BusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BusError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BusError {
    fn from(err: io::Error) -> Self {
        use io::ErrorKind::*;

        match err.kind() {
            TimedOut | WouldBlock => BusError::ReadTimeout,
            UnexpectedEof | BrokenPipe | ConnectionReset | ConnectionAborted => {
                BusError::ConnectionClosed
            }
            _ => BusError::Io(err),
        }
    }
}
