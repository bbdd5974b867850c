// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {super::suite_selector, crate::organization::Oui, std::fmt};

// IEEE Std 802.11-2016, 9.4.2.25.3, Table 9-133
pub const EAP: u8 = 1;
pub const PSK: u8 = 2;
pub const FT_EAP: u8 = 3;
pub const FT_PSK: u8 = 4;
pub const EAP_SHA256: u8 = 5;
pub const PSK_SHA256: u8 = 6;

// Cisco Centralized Key Management, advertised under the Cisco OUI.
pub const CCKM: u8 = 0;

#[derive(PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Akm {
    pub oui: Oui,
    pub suite_type: u8,
}

impl Akm {
    pub fn new_dot11(suite_type: u8) -> Self {
        Akm { oui: Oui::DOT11, suite_type }
    }

    pub fn new_msft(suite_type: u8) -> Self {
        Akm { oui: Oui::MSFT, suite_type }
    }

    fn has_known_oui(&self) -> bool {
        self.oui == Oui::DOT11 || self.oui == Oui::MSFT
    }

    pub fn is_eap(&self) -> bool {
        self.has_known_oui()
            && (self.suite_type == EAP
                || self.suite_type == FT_EAP
                || self.suite_type == EAP_SHA256)
    }

    pub fn is_psk(&self) -> bool {
        self.has_known_oui()
            && (self.suite_type == PSK
                || self.suite_type == FT_PSK
                || self.suite_type == PSK_SHA256)
    }

    pub fn is_cckm(&self) -> bool {
        self.oui == Oui::CISCO && self.suite_type == CCKM
    }
}

impl suite_selector::Factory for Akm {
    type Suite = Akm;

    fn new(oui: Oui, suite_type: u8) -> Self::Suite {
        Akm { oui, suite_type }
    }
}

impl suite_selector::SuiteSelector for Akm {
    fn oui(&self) -> Oui {
        self.oui
    }

    fn suite_type(&self) -> u8 {
        self.suite_type
    }
}

impl fmt::Debug for Akm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.oui, self.suite_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_akms() {
        assert!(Akm::new_dot11(EAP).is_eap());
        assert!(Akm::new_msft(PSK).is_psk());
        assert!(!Akm::new_dot11(PSK).is_eap());
        assert!(Akm { oui: Oui::CISCO, suite_type: CCKM }.is_cckm());
        assert!(!Akm { oui: Oui::CISCO, suite_type: PSK }.is_psk());
    }
}
