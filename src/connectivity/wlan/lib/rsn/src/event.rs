// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        key::KeyCategory,
        suite::{AkmSuite, CipherSuite, ExternalAuthMode},
    },
    wlan_common::mac::MacAddr,
};

/// Settings the port access entity needs to run the matching key exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaeConfig {
    pub auth_protocol: ExternalAuthMode,
    pub unicast: CipherSuite,
    pub broadcast: CipherSuite,
    pub akm: AkmSuite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoamingTrigger {
    SecurityAttack,
}

/// Notifications raised towards the supplicant and the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsnEvent {
    PaeConfig(PaeConfig),
    MicFailure { bssid: MacAddr, category: KeyCategory, payload: Vec<u8> },
    Roaming(RoamingTrigger),
    PreAuthCandidates(Vec<MacAddr>),
    PreAuthFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsnTimeout {
    MicReportWait,
    PreAuthComplete,
}
