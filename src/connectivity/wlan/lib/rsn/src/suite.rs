// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use wlan_common::{
    ie::rsn::{
        akm::Akm,
        cipher::{self, Cipher},
    },
    organization::Oui,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherSuite {
    None,
    Wep40,
    Tkip,
    AesWrap,
    AesCcmp,
    Wep104,
    Ckip,
    Unknown,
}

impl CipherSuite {
    /// Position in the strength order. CKIP and unknown suites are never ranked.
    pub fn strength(&self) -> Option<u8> {
        match self {
            CipherSuite::None => Some(0),
            CipherSuite::Wep40 => Some(1),
            CipherSuite::Wep104 => Some(2),
            CipherSuite::Tkip => Some(3),
            CipherSuite::AesWrap => Some(4),
            CipherSuite::AesCcmp => Some(5),
            CipherSuite::Ckip | CipherSuite::Unknown => None,
        }
    }

    pub fn is_wep(&self) -> bool {
        *self == CipherSuite::Wep40 || *self == CipherSuite::Wep104
    }

    /// Bytes the transmit path reserves ahead of the payload for the security header.
    pub fn header_reserve(&self) -> usize {
        match self {
            CipherSuite::Tkip | CipherSuite::AesWrap | CipherSuite::AesCcmp => 8,
            _ => 0,
        }
    }

    /// Maps an advertised suite selector. Type 0 ("use group cipher") maps to `None`.
    pub fn from_cipher(c: &Cipher) -> Self {
        if c.is_ckip() {
            return CipherSuite::Ckip;
        }
        if c.oui != Oui::DOT11 && c.oui != Oui::MSFT {
            return CipherSuite::Unknown;
        }
        match c.suite_type {
            cipher::GROUP_CIPHER_SUITE => CipherSuite::None,
            cipher::WEP_40 => CipherSuite::Wep40,
            cipher::TKIP => CipherSuite::Tkip,
            cipher::WRAP => CipherSuite::AesWrap,
            cipher::CCMP_128 => CipherSuite::AesCcmp,
            cipher::WEP_104 => CipherSuite::Wep104,
            _ => CipherSuite::Unknown,
        }
    }

    /// Suite selector under the given OUI, or `None` for suites with no selector.
    pub fn to_cipher(&self, oui: Oui) -> Option<Cipher> {
        let suite_type = match self {
            CipherSuite::None => cipher::GROUP_CIPHER_SUITE,
            CipherSuite::Wep40 => cipher::WEP_40,
            CipherSuite::Tkip => cipher::TKIP,
            CipherSuite::AesWrap => cipher::WRAP,
            CipherSuite::AesCcmp => cipher::CCMP_128,
            CipherSuite::Wep104 => cipher::WEP_104,
            CipherSuite::Ckip => return Some(Cipher { oui: Oui::CISCO, suite_type: cipher::CKIP }),
            CipherSuite::Unknown => return None,
        };
        Some(Cipher { oui, suite_type })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AkmSuite {
    None,
    Dot1x,
    Psk,
    Cckm,
    NotApplicable,
}

impl AkmSuite {
    pub fn from_akm(akm: &Akm) -> Self {
        if akm.is_cckm() {
            AkmSuite::Cckm
        } else if akm.is_eap() {
            AkmSuite::Dot1x
        } else if akm.is_psk() {
            AkmSuite::Psk
        } else {
            AkmSuite::NotApplicable
        }
    }

    pub fn to_akm(&self, oui: Oui) -> Option<Akm> {
        use wlan_common::ie::rsn::akm;
        match self {
            AkmSuite::Dot1x => Some(Akm { oui, suite_type: akm::EAP }),
            AkmSuite::Psk => Some(Akm { oui, suite_type: akm::PSK }),
            AkmSuite::Cckm => Some(Akm { oui: Oui::CISCO, suite_type: akm::CCKM }),
            AkmSuite::None | AkmSuite::NotApplicable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalAuthMode {
    Open,
    SharedKey,
    AutoSwitch,
    Wpa,
    WpaPsk,
    WpaNone,
    Wpa2,
    Wpa2Psk,
}

impl ExternalAuthMode {
    pub fn akm(&self) -> AkmSuite {
        match self {
            ExternalAuthMode::Wpa | ExternalAuthMode::Wpa2 => AkmSuite::Dot1x,
            ExternalAuthMode::WpaPsk | ExternalAuthMode::Wpa2Psk => AkmSuite::Psk,
            _ => AkmSuite::None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        match self {
            ExternalAuthMode::Open | ExternalAuthMode::SharedKey | ExternalAuthMode::AutoSwitch => {
                true
            }
            _ => false,
        }
    }
}

/// The 802.11 authentication algorithm used ahead of association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSuite {
    None,
    Open,
    SharedKey,
    AutoSwitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    Infrastructure,
    Ibss,
}
