// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]

pub mod bus;
pub mod codec;
pub mod device;
mod error;
mod frame;
pub mod scheduler;
mod util;

pub use bus::{Bus, Connection};
pub use device::{
    Channel, Command, Curtain, CurtainConfig, CurtainListener, OfflineReason, State, Status,
};
pub use error::*;
pub use frame::*;
pub use util::normalize_position;
