// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame encoding and reply length calculation.

use crate::{error::*, frame::*};
use byteorder::{ByteOrder, LittleEndian};

type Result<T> = core::result::Result<T, Error>;

/// Encode a request for the curtain at `device`.
#[must_use]
pub fn encode_request(device: DeviceAddress, request: Request) -> Packet {
    let mut buf = vec![0; request.frame_len()];
    buf[0] = START;
    LittleEndian::write_u16(&mut buf[1..3], device);
    buf[3] = request.function().value();
    buf[4] = request.address();
    if let Some(payload) = request.payload() {
        buf[HEADER_LEN] = payload;
    }
    let len = buf.len() - CRC_LEN;
    let crc = crc16(&buf[..len]);
    LittleEndian::write_u16(&mut buf[len..], crc);
    Packet::from_raw(buf)
}

/// Calculate the CRC (Cyclic Redundancy Check) sum.
///
/// This is the Modbus variant; the result is stored little-endian.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0xFFFF;
    for x in data {
        crc ^= u16::from(*x);
        for _ in 0..8 {
            // The shift has to happen after the low bit is tested.
            #[allow(clippy::branches_sharing_code)]
            if (crc & 0x0001) != 0 {
                crc >>= 1;
                crc ^= 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Number of bytes the curtain sends back for `request`.
///
/// - a read reply carries the requested data bytes,
/// - a write reply carries the number of bytes written,
/// - a control request is echoed back as a whole.
pub fn response_len(request: &Packet) -> Result<usize> {
    let len = match request.function()? {
        Function::Read => MIN_FRAME_LEN + usize::from(request.declared_data_length()),
        Function::Write => MIN_FRAME_LEN + 1,
        Function::Control => request.as_bytes().len(),
        Function::Request => return Err(Error::FnCode(request.function_code())),
    };
    Ok(len)
}
