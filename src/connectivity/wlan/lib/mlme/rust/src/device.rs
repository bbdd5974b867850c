// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    wlan_common::{
        ie::HtCapabilities,
        mac::{MacAddr, MgmtSubtype},
    },
    wlan_rsn::SecurityHw,
};

#[cfg(test)]
pub use test_utils::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxFlags(pub u32);
impl TxFlags {
    pub const NONE: Self = Self(0);
    /// The transport encrypts the frame body with the default key and sets the Protected
    /// Frame bit.
    pub const PROTECTED: Self = Self(1);

    pub fn protected(&self) -> bool {
        self.0 & Self::PROTECTED.0 != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    TwoGhz,
    FiveGhz,
}

/// Frame transport and radio state of the device the station runs on. Key installation and
/// security mode selection are inherited from `SecurityHw`.
pub trait DeviceOps: SecurityHw {
    fn sta_addr(&self) -> MacAddr;

    /// Queues a complete management frame, MAC header included, for transmission.
    fn send_mgmt_frame(
        &mut self,
        subtype: MgmtSubtype,
        frame: Vec<u8>,
        flags: TxFlags,
    ) -> Result<(), anyhow::Error>;

    fn set_aid(&mut self, aid: u16) -> Result<(), anyhow::Error>;

    fn band(&self) -> Band;

    fn channel(&self) -> u8;

    /// Regulatory transmit power limit for the current channel, in dBm.
    fn max_tx_power(&self) -> i8;

    /// Whether 802.11h spectrum management is enabled locally.
    fn spectrum_mgmt_enabled(&self) -> bool;

    /// HT capabilities of the radio, if it supports HT at all.
    fn ht_capabilities(&self) -> Option<HtCapabilities>;
}


#[cfg(test)]
mod tests {
    use {super::*, wlan_common::mac::MgmtHdr, zerocopy::AsBytes};

    #[test]
    fn tx_flags() {
        assert!(TxFlags::PROTECTED.protected());
        assert!(!TxFlags::NONE.protected());
    }

    #[test]
    fn fake_device_rejects_headerless_frames() {
        let mut device = FakeDevice::new();
        assert!(device.send_mgmt_frame(MgmtSubtype::AUTH, vec![0; 4], TxFlags::NONE).is_err());

        let hdr = MgmtHdr::new(MgmtSubtype::AUTH, [1; 6], FAKE_STA_ADDR, [1; 6]);
        let mut frame = hdr.as_bytes().to_vec();
        frame.extend_from_slice(&[0, 0, 1, 0, 0, 0]);
        device.send_mgmt_frame(MgmtSubtype::AUTH, frame, TxFlags::NONE).expect("valid frame");
        assert_eq!(device.last_body(), Some(&[0, 0, 1, 0, 0, 0][..]));
        assert_eq!(device.sent_subtypes(), vec![MgmtSubtype::AUTH]);
    }
}
