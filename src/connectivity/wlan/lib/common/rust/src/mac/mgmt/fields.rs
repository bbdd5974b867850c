// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        mac::{CapabilityInfo, MacAddr, ReasonCode, StatusCode},
        LE16, LE64,
    },
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

// IEEE Std 802.11-2016, 9.4.1.1
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Hash)]
pub struct AuthAlgorithmNumber(pub u16);

impl AuthAlgorithmNumber {
    pub const OPEN: Self = Self(0);
    pub const SHARED_KEY: Self = Self(1);
    pub const FAST_BSS_TRANSITION: Self = Self(2);
    pub const SAE: Self = Self(3);
    // 4-65534 Reserved
    pub const VENDOR_SPECIFIC: Self = Self(65535);
}

// IEEE Std 802.11-2016, 9.3.3.3
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct BeaconHdr {
    pub timestamp: LE64,
    pub beacon_interval: LE16,
    pub capabilities: LE16,
}

impl BeaconHdr {
    pub fn capabilities(&self) -> CapabilityInfo {
        CapabilityInfo(self.capabilities.get())
    }
}

// Probe Responses share the Beacon fixed fields. IEEE Std 802.11-2016, 9.3.3.11
pub type ProbeRespHdr = BeaconHdr;

// IEEE Std 802.11-2016, 9.3.3.12
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct AuthHdr {
    pub auth_alg_num: LE16,
    pub auth_txn_seq_num: LE16,
    pub status_code: LE16,
}

impl AuthHdr {
    pub fn new(alg: AuthAlgorithmNumber, seq: u16, status: StatusCode) -> Self {
        AuthHdr {
            auth_alg_num: LE16::new(alg.0),
            auth_txn_seq_num: LE16::new(seq),
            status_code: LE16::new(status.0),
        }
    }

    pub fn auth_alg_num(&self) -> AuthAlgorithmNumber {
        AuthAlgorithmNumber(self.auth_alg_num.get())
    }

    pub fn auth_txn_seq_num(&self) -> u16 {
        self.auth_txn_seq_num.get()
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode(self.status_code.get())
    }
}

// IEEE Std 802.11-2016, 9.3.3.13
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct DeauthHdr {
    pub reason_code: LE16,
}

// IEEE Std 802.11-2016, 9.3.3.5
pub type DisassocHdr = DeauthHdr;

impl DeauthHdr {
    pub fn new(reason: ReasonCode) -> Self {
        DeauthHdr { reason_code: LE16::new(reason.0) }
    }

    pub fn reason_code(&self) -> ReasonCode {
        ReasonCode(self.reason_code.get())
    }
}

// IEEE Std 802.11-2016, 9.3.3.6
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct AssocReqHdr {
    pub capabilities: LE16,
    pub listen_interval: LE16,
}

impl AssocReqHdr {
    pub fn new(capabilities: CapabilityInfo, listen_interval: u16) -> Self {
        AssocReqHdr {
            capabilities: LE16::new(capabilities.0),
            listen_interval: LE16::new(listen_interval),
        }
    }

    pub fn capabilities(&self) -> CapabilityInfo {
        CapabilityInfo(self.capabilities.get())
    }
}

// IEEE Std 802.11-2016, 9.3.3.8
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct ReassocReqHdr {
    pub capabilities: LE16,
    pub listen_interval: LE16,
    pub current_ap: MacAddr,
}

impl ReassocReqHdr {
    pub fn new(capabilities: CapabilityInfo, listen_interval: u16, current_ap: MacAddr) -> Self {
        ReassocReqHdr {
            capabilities: LE16::new(capabilities.0),
            listen_interval: LE16::new(listen_interval),
            current_ap,
        }
    }
}

/// Association ID bits; the two most significant bits of the AID field are always set.
pub const AID_MASK: u16 = 0x3FFF;

// IEEE Std 802.11-2016, 9.3.3.7 and 9.3.3.9
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct AssocRespHdr {
    pub capabilities: LE16,
    pub status_code: LE16,
    pub aid: LE16,
}

impl AssocRespHdr {
    pub fn capabilities(&self) -> CapabilityInfo {
        CapabilityInfo(self.capabilities.get())
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode(self.status_code.get())
    }

    pub fn aid(&self) -> u16 {
        self.aid.get() & AID_MASK
    }
}
