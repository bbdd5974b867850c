// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;

/// Reason carried by Deauthentication and Disassociation frames.
#[derive(PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct ReasonCode(pub u16);

/// IEEE Std 802.11-2016, 9.4.1.7. Only the reasons a station sends or acts upon.
impl ReasonCode {
    pub const UNSPECIFIED_REASON: Self = Self(1);
    pub const INVALID_AUTHENTICATION: Self = Self(2);
    pub const LEAVING_NETWORK_DEAUTH: Self = Self(3);
    pub const REASON_INACTIVITY: Self = Self(4);
    pub const NO_MORE_STAS: Self = Self(5);
    pub const LEAVING_NETWORK_DISASSOC: Self = Self(8);
    pub const NOT_AUTHENTICATED: Self = Self(9);
    pub const MIC_FAILURE: Self = Self(14);
    pub const FOURWAY_HANDSHAKE_TIMEOUT: Self = Self(15);
    pub const IEEE802_1_X_AUTH_FAILED: Self = Self(23);
    pub const REASON_CIPHER_OUT_OF_POLICY: Self = Self(24);

    fn name(&self) -> Option<&'static str> {
        Some(match *self {
            Self::UNSPECIFIED_REASON => "unspecified",
            Self::INVALID_AUTHENTICATION => "invalid authentication",
            Self::LEAVING_NETWORK_DEAUTH => "leaving network (deauth)",
            Self::REASON_INACTIVITY => "inactivity",
            Self::NO_MORE_STAS => "no more stations",
            Self::LEAVING_NETWORK_DISASSOC => "leaving network (disassoc)",
            Self::NOT_AUTHENTICATED => "not authenticated",
            Self::MIC_FAILURE => "MIC failure",
            Self::FOURWAY_HANDSHAKE_TIMEOUT => "4-way handshake timeout",
            Self::IEEE802_1_X_AUTH_FAILED => "802.1X authentication failed",
            Self::REASON_CIPHER_OUT_OF_POLICY => "cipher out of policy",
            _ => return None,
        })
    }
}

impl fmt::Debug for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "ReasonCode({}: {})", self.0, name),
            None => write!(f, "ReasonCode({})", self.0),
        }
    }
}
