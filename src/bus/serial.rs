// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serial port connections.

use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};

use super::*;

/// Settings of the RS-485 adapter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    pub baud_rate: u32,
    /// How long a read may stay silent before the transaction fails.
    #[cfg_attr(feature = "serde", serde(with = "crate::device::config::duration_millis"))]
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 9600,
            timeout: Duration::from_secs(1),
        }
    }
}

impl Connection for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}

/// Open the serial port with the 8N1 framing the curtains use.
pub fn open(config: &SerialConfig) -> io::Result<Box<dyn Connection>> {
    log::debug!(
        "Opening serial port {} at {} baud",
        config.port,
        config.baud_rate
    );
    let port = serialport::new(&config.port, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.timeout)
        .open()?;
    Ok(Box::new(port))
}

impl Bus {
    /// Open the serial port and attach it.
    pub fn open_serial(&self, config: &SerialConfig) -> io::Result<()> {
        let conn = open(config)?;
        self.activate(conn);
        Ok(())
    }
}
