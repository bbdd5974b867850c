// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhyMode {
    Dot11b,
    Dot11a,
    Dot11g,
    Dot11n,
}

#[derive(Debug, Clone)]
pub struct StationConfig {
    pub auth_timeout: Duration,
    pub auth_max_retries: u8,
    pub assoc_timeout: Duration,
    pub assoc_max_retries: u8,
    /// In beacon intervals.
    pub listen_interval: u16,
    pub phy_mode: PhyMode,
    pub short_preamble: bool,
    pub pbcc: bool,
    pub qos_enabled: bool,
    /// QoS Info field sent in the WME Information element.
    pub wme_qos_info: u8,
}

impl Default for StationConfig {
    fn default() -> Self {
        StationConfig {
            auth_timeout: Duration::from_millis(500),
            auth_max_retries: 3,
            assoc_timeout: Duration::from_millis(500),
            assoc_max_retries: 3,
            listen_interval: 3,
            phy_mode: PhyMode::Dot11g,
            short_preamble: true,
            pbcc: false,
            qos_enabled: true,
            wme_qos_info: 0,
        }
    }
}
