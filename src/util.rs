// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common helpers

/// Highest valid position in percent.
pub const MAX_POSITION: u8 = 100;

/// Turn a reported position into a displayable percentage.
///
/// A curtain that lost its calibration reports `-1` (`0xFF`). Every value
/// outside `0..=100` is shown as `0`.
#[must_use]
pub const fn normalize_position(raw: u8) -> u8 {
    if raw > MAX_POSITION { 0 } else { raw }
}

/// Turn a bool into a register value.
#[must_use]
pub const fn bool_to_byte(state: bool) -> u8 {
    if state { 1 } else { 0 }
}

/// Turn a register value into a boolean value.
///
/// Every non-zero value is `true`.
#[must_use]
pub const fn byte_to_bool(value: u8) -> bool {
    value != 0
}

/// Turn the hand start switch state into its register value.
///
/// The register is inverted: `0` means enabled.
#[must_use]
pub const fn hand_start_to_byte(enabled: bool) -> u8 {
    bool_to_byte(!enabled)
}

/// Turn the hand start register value into the switch state.
#[must_use]
pub const fn byte_to_hand_start(value: u8) -> bool {
    value == 0
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn normalize_valid_positions() {
        assert_eq!(normalize_position(0), 0);
        assert_eq!(normalize_position(57), 57);
        assert_eq!(normalize_position(100), 100);
    }

    #[test]
    fn normalize_invalid_positions() {
        assert_eq!(normalize_position(101), 0);
        assert_eq!(normalize_position(150), 0);
        assert_eq!(normalize_position(0xFF), 0);
    }

    #[test]
    fn convert_bool_to_byte() {
        assert_eq!(bool_to_byte(true), 1);
        assert_eq!(bool_to_byte(false), 0);
    }

    #[test]
    fn convert_byte_to_bool() {
        assert!(byte_to_bool(1));
        assert!(byte_to_bool(0x80));
        assert!(!byte_to_bool(0));
    }

    #[test]
    fn convert_hand_start() {
        assert_eq!(hand_start_to_byte(true), 0);
        assert_eq!(hand_start_to_byte(false), 1);
        assert!(byte_to_hand_start(0));
        assert!(!byte_to_hand_start(1));
    }
}
