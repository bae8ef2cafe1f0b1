// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Device naming from the user-agent string.

/// Display name for a device. The first matching marker wins.
pub fn extract_device_name(user_agent: &str) -> &'static str {
    const MARKERS: [(&str, &str); 5] = [
        ("Mobile", "Mobile Device"),
        ("Tablet", "Tablet"),
        ("Windows", "Windows PC"),
        ("Macintosh", "Mac"),
        ("Linux", "Linux PC"),
    ];

    MARKERS
        .iter()
        .find(|(marker, _)| user_agent.contains(marker))
        .map(|(_, name)| *name)
        .unwrap_or("Unknown Device")
}
