// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::suite::CipherSuite,
    wlan_common::mac::{MacAddr, BCAST_ADDR, NULL_ADDR},
};

pub const MAX_KEYS: usize = 4;
pub const RSC_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Null,
    Wep,
    Tkip,
    Aes,
}

impl KeyType {
    pub fn cipher_suite(&self, key_len: usize) -> CipherSuite {
        match self {
            KeyType::Null => CipherSuite::None,
            KeyType::Wep if key_len <= 5 => CipherSuite::Wep40,
            KeyType::Wep => CipherSuite::Wep104,
            KeyType::Tkip => CipherSuite::Tkip,
            KeyType::Aes => CipherSuite::AesCcmp,
        }
    }
}

/// Pairwise keys protect unicast traffic to the AP; group keys protect broadcast traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCategory {
    Pairwise,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityKey {
    pub index: u8,
    pub is_default: bool,
    pub key_type: KeyType,
    /// Broadcast or all-zero for a group key, the peer's address for a pairwise key.
    pub mac: MacAddr,
    pub material: Vec<u8>,
    pub rsc: [u8; RSC_LEN],
    pub len: usize,
}

impl SecurityKey {
    pub fn new(index: u8, key_type: KeyType, mac: MacAddr, material: Vec<u8>) -> Self {
        let len = material.len();
        SecurityKey { index, is_default: false, key_type, mac, material, rsc: [0; RSC_LEN], len }
    }

    pub fn category(&self) -> KeyCategory {
        if self.mac == BCAST_ADDR || self.mac == NULL_ADDR {
            KeyCategory::Group
        } else {
            KeyCategory::Pairwise
        }
    }

    /// Descriptor handed to the hardware to remove this key. WEP keys are keyed on an all-zero
    /// address; TKIP and CCMP removals carry a 16 byte length and use the broadcast address for
    /// any index other than 0.
    pub fn removal_descriptor(&self) -> SecurityKey {
        let mut descriptor = self.clone();
        match self.key_type {
            KeyType::Wep => descriptor.mac = NULL_ADDR,
            KeyType::Tkip | KeyType::Aes => {
                descriptor.len = 16;
                if self.index != 0 {
                    descriptor.mac = BCAST_ADDR;
                }
            }
            KeyType::Null => (),
        }
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_category() {
        let group = SecurityKey::new(1, KeyType::Tkip, BCAST_ADDR, vec![0; 32]);
        assert_eq!(group.category(), KeyCategory::Group);
        let pairwise = SecurityKey::new(0, KeyType::Aes, [1, 2, 3, 4, 5, 6], vec![0; 16]);
        assert_eq!(pairwise.category(), KeyCategory::Pairwise);
    }

    #[test]
    fn wep_removal_zeroes_mac() {
        let key = SecurityKey::new(2, KeyType::Wep, [1, 2, 3, 4, 5, 6], vec![7; 13]);
        let descriptor = key.removal_descriptor();
        assert_eq!(descriptor.mac, NULL_ADDR);
        assert_eq!(descriptor.len, 13);
    }

    #[test]
    fn tkip_removal_uses_bcast_for_nonzero_index() {
        let key = SecurityKey::new(1, KeyType::Tkip, [1, 2, 3, 4, 5, 6], vec![7; 32]);
        let descriptor = key.removal_descriptor();
        assert_eq!(descriptor.mac, BCAST_ADDR);
        assert_eq!(descriptor.len, 16);

        let key = SecurityKey::new(0, KeyType::Aes, [1, 2, 3, 4, 5, 6], vec![7; 16]);
        assert_eq!(key.removal_descriptor().mac, [1, 2, 3, 4, 5, 6]);
    }
}
