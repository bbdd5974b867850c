// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::suite::{AuthSuite, CipherSuite, ExternalAuthMode, NetworkMode},
    std::time::Duration,
};

/// Lets a WPA or WPA2 configuration accept a site of the other family, and lets admission
/// evaluate sites as if AES-CCMP encryption had been configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WpaPromoteFlags {
    pub auth_mode: bool,
    pub cipher: bool,
}

impl WpaPromoteFlags {
    pub fn any(&self) -> bool {
        self.auth_mode || self.cipher
    }
}

/// PTKSA/GTKSA replay counter capability, as encoded in the RSN capabilities field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayCounters {
    pub ptksa: u16,
    pub gtksa: u16,
}

#[derive(Debug, Clone)]
pub struct RsnConfig {
    pub network_mode: NetworkMode,
    pub external_auth_mode: ExternalAuthMode,
    pub auth_suite: AuthSuite,
    pub unicast_suite: CipherSuite,
    pub broadcast_suite: CipherSuite,
    pub mixed_mode: bool,
    pub wpa_promote: WpaPromoteFlags,
    pub pre_auth_enabled: bool,
    /// Time allowed for each pre-authentication candidate.
    pub pre_auth_timeout: Duration,
    pub xcc_enabled: bool,
    pub replay_counters: Option<ReplayCounters>,
    pub rekey_window: Duration,
    pub half_ban_duration: Duration,
    pub full_ban_duration: Duration,
    pub mic_report_wait: Duration,
}

impl Default for RsnConfig {
    fn default() -> Self {
        RsnConfig {
            network_mode: NetworkMode::Infrastructure,
            external_auth_mode: ExternalAuthMode::Open,
            auth_suite: AuthSuite::Open,
            unicast_suite: CipherSuite::None,
            broadcast_suite: CipherSuite::None,
            mixed_mode: false,
            wpa_promote: WpaPromoteFlags::default(),
            pre_auth_enabled: true,
            pre_auth_timeout: Duration::from_millis(2000),
            xcc_enabled: false,
            replay_counters: None,
            rekey_window: Duration::from_millis(3000),
            half_ban_duration: Duration::from_secs(60),
            full_ban_duration: Duration::from_secs(60),
            mic_report_wait: Duration::from_millis(500),
        }
    }
}
