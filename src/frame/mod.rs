// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

mod packet;

pub use self::packet::*;
use crate::error::Error;

/// Start marker of every frame.
pub const START: u8 = 0x55;

/// Start marker, device address, function code and sub-address.
pub const HEADER_LEN: usize = 5;

/// Length of the trailing CRC16.
pub const CRC_LEN: usize = 2;

/// Length of a frame without any payload.
pub const MIN_FRAME_LEN: usize = HEADER_LEN + CRC_LEN;

/// A device address is represented by 16 bit (little-endian on the wire).
pub type DeviceAddress = u16;

/// Number of data bytes to read (`0` - `255`).
pub type Quantity = u8;

/// A Herzborg function code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Function Code: `0x01`.
    Read,
    /// Function Code: `0x02`.
    Write,
    /// Function Code: `0x03`.
    Control,
    /// Function Code: `0x04`.
    ///
    /// Defined by the protocol but not used by any controller.
    Request,
}

impl Function {
    /// Get the [`u8`] value of the current [`Function`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Read => 0x01,
            Self::Write => 0x02,
            Self::Control => 0x03,
            Self::Request => 0x04,
        }
    }
}

impl TryFrom<u8> for Function {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Error> {
        let function = match code {
            0x01 => Self::Read,
            0x02 => Self::Write,
            0x03 => Self::Control,
            0x04 => Self::Request,
            _ => return Err(Error::FnCode(code)),
        };
        Ok(function)
    }
}

impl From<Function> for u8 {
    fn from(f: Function) -> Self {
        f.value()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Action codes for [`Function::Control`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAddress {
    Open = 0x01,
    Close = 0x02,
    Stop = 0x03,
    /// Move to the percentage given as payload.
    Percent = 0x04,
    DeleteLimit = 0x07,
    /// Factory default.
    Default = 0x08,
    SetContext = 0x09,
    RunContext = 0x0A,
    DelContext = 0x0B,
}

impl From<ControlAddress> for u8 {
    fn from(a: ControlAddress) -> Self {
        a as u8
    }
}

/// Register addresses for [`Function::Read`] and [`Function::Write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataAddress {
    IdL = 0x00,
    IdH = 0x01,
    /// Position in percent, followed by reverse, hand start and mode.
    Position = 0x02,
    DefaultDir = 0x03,
    HandStart = 0x04,
    Mode = 0x05,
    /// External switch type, followed by the high voltage switch type.
    ExtSwitch = 0x27,
    ExtHvSwitch = 0x28,
}

impl From<DataAddress> for u8 {
    fn from(a: DataAddress) -> Self {
        a as u8
    }
}

/// A request represents a message from the bus master to a curtain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Read a block of consecutive registers.
    Read(DataAddress, Quantity),
    /// Write a single register.
    Write(DataAddress, u8),
    /// Trigger an action, optionally with an argument.
    Control(ControlAddress, Option<u8>),
}

impl Request {
    /// Read a single register.
    #[must_use]
    pub const fn read(address: DataAddress) -> Self {
        Self::Read(address, 1)
    }

    #[must_use]
    pub const fn function(&self) -> Function {
        match self {
            Self::Read(..) => Function::Read,
            Self::Write(..) => Function::Write,
            Self::Control(..) => Function::Control,
        }
    }

    /// The sub-address byte following the function code.
    #[must_use]
    pub const fn address(&self) -> u8 {
        match *self {
            Self::Read(addr, _) | Self::Write(addr, _) => addr as u8,
            Self::Control(addr, _) => addr as u8,
        }
    }

    /// The optional byte between header and CRC.
    #[must_use]
    pub const fn payload(&self) -> Option<u8> {
        match *self {
            Self::Read(_, count) => Some(count),
            Self::Write(_, value) => Some(value),
            Self::Control(_, arg) => arg,
        }
    }

    /// Number of bytes of the encoded frame.
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        match self.payload() {
            Some(_) => MIN_FRAME_LEN + 1,
            None => MIN_FRAME_LEN,
        }
    }
}

impl From<Request> for Function {
    fn from(r: Request) -> Self {
        r.function()
    }
}
