// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;
use crate::codec::crc16;
use byteorder::{ByteOrder, LittleEndian};

/// A single protocol frame, either a request or a reply.
///
/// ```text
/// | 0x55 | addr lo | addr hi | function | sub-address | payload... | crc lo | crc hi |
/// ```
///
/// The content is never modified after construction. Apart from the
/// minimum length nothing is checked when wrapping received bytes, use
/// [`Packet::validate`] before trusting any field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet(Vec<u8>);

impl Packet {
    /// Wrap a received frame.
    ///
    /// Only the length is checked so that every accessor can index the
    /// header without bounds checks.
    pub fn decode(raw: Vec<u8>) -> Result<Self, Error> {
        if raw.len() < MIN_FRAME_LEN {
            return Err(Error::BufferSize(raw.len()));
        }
        Ok(Self(raw))
    }

    pub(crate) fn from_raw(raw: Vec<u8>) -> Self {
        debug_assert!(raw.len() >= MIN_FRAME_LEN);
        Self(raw)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of bytes covered by the CRC.
    fn data_len(&self) -> usize {
        self.0.len() - CRC_LEN
    }

    #[must_use]
    pub fn device(&self) -> DeviceAddress {
        LittleEndian::read_u16(&self.0[1..3])
    }

    /// The raw function code byte.
    #[must_use]
    pub fn function_code(&self) -> u8 {
        self.0[3]
    }

    pub fn function(&self) -> Result<Function, Error> {
        Function::try_from(self.function_code())
    }

    /// The data or control address byte.
    #[must_use]
    pub fn data_address(&self) -> u8 {
        self.0[4]
    }

    /// Number of requested data bytes.
    ///
    /// Only meaningful for [`Function::Read`] requests. A frame without
    /// payload reports `0`.
    #[must_use]
    pub fn declared_data_length(&self) -> Quantity {
        self.data_at(0).unwrap_or(0)
    }

    /// All bytes between header and CRC.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.0[HEADER_LEN..self.data_len()]
    }

    #[must_use]
    pub fn data_at(&self, index: usize) -> Option<u8> {
        self.data().get(index).copied()
    }

    /// The CRC stored in the trailer.
    #[must_use]
    pub fn crc(&self) -> u16 {
        LittleEndian::read_u16(&self.0[self.data_len()..])
    }

    /// Check start marker and CRC.
    pub fn validate(&self) -> Result<(), Error> {
        let start = self.0[0];
        if start != START {
            return Err(Error::Start(start));
        }
        let expected = crc16(&self.0[..self.data_len()]);
        let actual = self.crc();
        if expected != actual {
            return Err(Error::Crc(expected, actual));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::UpperHex for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
