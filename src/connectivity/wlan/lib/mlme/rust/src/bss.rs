// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::error::Error,
    wlan_common::{
        error::FrameParseError,
        ie::{parse_ies, ParsedIes},
        mac::{CapabilityInfo, MacAddr, MgmtBody, MgmtFrame},
    },
    wlan_rsn::Candidate,
};

/// A BSS as advertised in a Beacon or Probe Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BssDescription {
    pub bssid: MacAddr,
    pub beacon_interval: u16,
    pub capabilities: CapabilityInfo,
    pub ies: ParsedIes,
}

impl BssDescription {
    pub fn from_frame(bytes: &[u8]) -> Result<Self, Error> {
        let frame = MgmtFrame::parse(bytes)?;
        let bssid = frame.mgmt_hdr.bssid();
        match frame.into_body() {
            MgmtBody::Beacon { bcn_hdr, elements }
            | MgmtBody::ProbeResp { probe_resp_hdr: bcn_hdr, elements } => Ok(BssDescription {
                bssid,
                beacon_interval: bcn_hdr.beacon_interval.get(),
                capabilities: bcn_hdr.capabilities(),
                ies: parse_ies(elements)?,
            }),
            _ => Err(FrameParseError::Malformed("beacon or probe response").into()),
        }
    }

    pub fn ssid(&self) -> &[u8] {
        self.ies.ssid.as_ref().map_or(&[][..], |ssid| &ssid[..])
    }

    pub fn candidate(&self) -> Candidate {
        Candidate::from_ies(self.bssid, self.capabilities, &self.ies)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::{mgmt_frame, wpa2_psk_rsne, BSSID},
        wlan_common::{assert_variant, ie, mac::MgmtSubtype},
        wlan_rsn::suite::NetworkMode,
    };

    fn probe_resp_body(capabilities: [u8; 2]) -> Vec<u8> {
        let mut body: Vec<u8> = vec![0; 8];
        body.extend_from_slice(&[0x64, 0x00]);
        body.extend_from_slice(&capabilities[..]);
        ie::write_ssid(&mut body, b"fuchsia").expect("ssid");
        ie::write_supported_rates(&mut body, &[0x82, 0x84, 0xff]).expect("rates");
        body
    }

    #[test]
    fn from_probe_resp() {
        let mut body = probe_resp_body([0x11, 0x00]);
        body.extend_from_slice(&wpa2_psk_rsne()[..]);
        let frame = mgmt_frame(MgmtSubtype::PROBE_RESP, BSSID, &body[..]);
        let bss = BssDescription::from_frame(&frame[..]).expect("valid probe response");
        assert_eq!(bss.bssid, BSSID);
        assert_eq!(bss.beacon_interval, 100);
        assert_eq!(bss.ssid(), b"fuchsia");
        assert_eq!(bss.ies.all_rates().len(), 3);

        let candidate = bss.candidate();
        assert!(candidate.privacy);
        assert_eq!(candidate.network_mode, NetworkMode::Infrastructure);
        assert_eq!(candidate.rsne, Some(wpa2_psk_rsne()));
    }

    #[test]
    fn ibss_beacon() {
        let frame = mgmt_frame(MgmtSubtype::BEACON, BSSID, &probe_resp_body([0x02, 0x00])[..]);
        let bss = BssDescription::from_frame(&frame[..]).expect("valid beacon");
        assert_eq!(bss.candidate().network_mode, NetworkMode::Ibss);
        assert!(!bss.candidate().privacy);
    }

    #[test]
    fn other_subtypes_rejected() {
        let frame = mgmt_frame(MgmtSubtype::AUTH, BSSID, &[0, 0, 1, 0, 0, 0]);
        assert_variant!(
            BssDescription::from_frame(&frame[..]),
            Err(Error::ParsingFrame(FrameParseError::Malformed(_)))
        );
    }

    #[test]
    fn truncated_elements_rejected() {
        let mut body = probe_resp_body([0x01, 0x00]);
        body.extend_from_slice(&[48, 20, 1, 0]);
        let frame = mgmt_frame(MgmtSubtype::BEACON, BSSID, &body[..]);
        assert_variant!(
            BssDescription::from_frame(&frame[..]),
            Err(Error::ParsingFrame(FrameParseError::TruncatedIe { .. }))
        );
    }
}
