// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {super::suite_selector, crate::organization::Oui, std::fmt};

// IEEE Std 802.11-2016, 9.4.2.25.2, Table 9-131
pub const GROUP_CIPHER_SUITE: u8 = 0;
pub const WEP_40: u8 = 1;
pub const TKIP: u8 = 2;
// Reserved in the current standard. Pre-standard AES deployments used it for AES-WRAP (OCB).
pub const WRAP: u8 = 3;
pub const CCMP_128: u8 = 4;
pub const WEP_104: u8 = 5;
pub const BIP_CMAC_128: u8 = 6;
// 7 and 255 are reserved; 8-13 are GCMP/BIP variants the station never negotiates.

// Cisco Key Integrity Protocol, advertised under the Cisco OUI.
pub const CKIP: u8 = 0;

#[derive(PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Cipher {
    pub oui: Oui,
    pub suite_type: u8,
}

impl Cipher {
    pub fn new_dot11(suite_type: u8) -> Self {
        Cipher { oui: Oui::DOT11, suite_type }
    }

    /// WPA1 reuses the IEEE suite numbers under the Microsoft OUI.
    pub fn new_msft(suite_type: u8) -> Self {
        Cipher { oui: Oui::MSFT, suite_type }
    }

    fn has_known_oui(&self) -> bool {
        self.oui == Oui::DOT11 || self.oui == Oui::MSFT
    }

    pub fn is_ckip(&self) -> bool {
        self.oui == Oui::CISCO && self.suite_type == CKIP
    }

    pub fn is_wep(&self) -> bool {
        self.has_known_oui() && (self.suite_type == WEP_40 || self.suite_type == WEP_104)
    }

    /// Length in bytes of the temporal key, or `None` for reserved or vendor suites.
    pub fn tk_bytes(&self) -> Option<usize> {
        if !self.has_known_oui() {
            return None;
        }
        match self.suite_type {
            WEP_40 => Some(5),
            WEP_104 => Some(13),
            TKIP => Some(32),
            WRAP | CCMP_128 | BIP_CMAC_128 => Some(16),
            _ => None,
        }
    }
}

impl suite_selector::Factory for Cipher {
    type Suite = Cipher;

    fn new(oui: Oui, suite_type: u8) -> Self::Suite {
        Cipher { oui, suite_type }
    }
}

impl suite_selector::SuiteSelector for Cipher {
    fn oui(&self) -> Oui {
        self.oui
    }

    fn suite_type(&self) -> u8 {
        self.suite_type
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.oui, self.suite_type)
    }
}
