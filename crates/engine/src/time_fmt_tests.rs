// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn format_ms_utc_matches_known_instant() {
    // 2024-01-01T00:00:00Z
    assert_eq!(format_ms_utc(1_704_067_200_000), "2024-01-01 00:00:00");
}

#[test]
fn format_ms_utc_handles_sub_second_truncation() {
    assert_eq!(format_ms_utc(1_704_067_200_999), "2024-01-01 00:00:00");
}

#[test]
fn format_ms_utc_rolls_over_to_next_day() {
    assert_eq!(format_ms_utc(1_704_067_200_000 + 86_399 * 1000), "2024-01-01 23:59:59");
    assert_eq!(format_ms_utc(1_704_067_200_000 + 86_400 * 1000), "2024-01-02 00:00:00");
}
