// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use crate::frame::DeviceAddress;

/// Settings of a single curtain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurtainConfig {
    /// Address configured on the motor.
    pub address: DeviceAddress,
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub poll_interval: Duration,
    /// Also read the external switch types on every poll.
    ///
    /// Older motors don't have these registers.
    pub poll_switches: bool,
}

impl Default for CurtainConfig {
    fn default() -> Self {
        Self {
            address: 0,
            poll_interval: Duration::from_secs(1),
            poll_switches: true,
        }
    }
}

#[cfg(feature = "serde")]
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(all(feature = "serde", feature = "serial"))]
pub(crate) mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, ser::Error as _};

    pub(crate) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(d.as_millis())
            .map_err(|_| S::Error::custom(format!("{d:?} exceeds the millisecond range")))?;
        s.serialize_u64(millis)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
