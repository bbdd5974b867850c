// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    wlan_common::mac::{MacAddr, ReasonCode, StatusCode},
    wlan_rsn::{RsnEvent, RsnTimeout},
};

/// Timeouts scheduled on the station's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    Auth,
    Assoc,
    Rsn(RsnTimeout),
}

impl From<RsnTimeout> for TimedEvent {
    fn from(timeout: RsnTimeout) -> Self {
        TimedEvent::Rsn(timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    Refused,
    /// The peer never answered after every retry was spent.
    PacketRejectedTimeout,
    NotSupported,
    InternalError,
}

/// Outcome of one connection attempt. `code` carries the status the AP sent, or
/// `StatusCode::SUCCESS` when the attempt failed without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlmeStatus {
    pub status: ResultCode,
    pub code: StatusCode,
}

impl MlmeStatus {
    pub fn success() -> Self {
        MlmeStatus { status: ResultCode::Success, code: StatusCode::SUCCESS }
    }

    pub fn refused(code: StatusCode) -> Self {
        MlmeStatus { status: ResultCode::Refused, code }
    }

    pub fn timeout() -> Self {
        MlmeStatus { status: ResultCode::PacketRejectedTimeout, code: StatusCode::SUCCESS }
    }
}

/// Events reported to the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    MlmeStatus(MlmeStatus),
    /// The AP refused to authenticate the station; a roaming trigger.
    AuthFailure { bssid: MacAddr, code: StatusCode },
    Deauthenticated { bssid: MacAddr, reason: ReasonCode },
    Disassociated { bssid: MacAddr, reason: ReasonCode },
    Rsn(RsnEvent),
}

impl From<RsnEvent> for ConnectionEvent {
    fn from(event: RsnEvent) -> Self {
        ConnectionEvent::Rsn(event)
    }
}
