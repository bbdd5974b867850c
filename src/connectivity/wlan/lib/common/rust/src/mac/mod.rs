// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        error::{FrameParseError, FrameParseResult},
        LE16,
    },
    bitfield::bitfield,
    std::mem::size_of,
    zerocopy::{AsBytes, ByteSlice, FromBytes, LayoutVerified, Unaligned},
};

pub mod mgmt;

pub use mgmt::*;

pub type MacAddr = [u8; 6];
pub const BCAST_ADDR: MacAddr = [0xFF; 6];
pub const NULL_ADDR: MacAddr = [0x00; 6];

pub fn is_unicast(addr: &MacAddr) -> bool {
    addr[0] & 0x01 == 0
}

// IEEE Std 802.11-2016, 9.2.4.1.3
pub const FRAME_TYPE_MGMT: u16 = 0;
pub const FRAME_TYPE_CTRL: u16 = 1;
pub const FRAME_TYPE_DATA: u16 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MgmtSubtype(u16);

impl MgmtSubtype {
    pub const ASSOC_REQ: Self = Self(0x00);
    pub const ASSOC_RESP: Self = Self(0x01);
    pub const REASSOC_REQ: Self = Self(0x02);
    pub const REASSOC_RESP: Self = Self(0x03);
    pub const PROBE_REQ: Self = Self(0x04);
    pub const PROBE_RESP: Self = Self(0x05);
    pub const BEACON: Self = Self(0x08);
    pub const ATIM: Self = Self(0x09);
    pub const DISASSOC: Self = Self(0x0A);
    pub const AUTH: Self = Self(0x0B);
    pub const DEAUTH: Self = Self(0x0C);
    pub const ACTION: Self = Self(0x0D);

    pub fn from_raw(raw: u16) -> Self {
        Self(raw & 0x0F)
    }

    pub fn raw(self) -> u16 {
        self.0
    }
}

// IEEE Std 802.11-2016, 9.2.4.1.1
bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameControl(u16);
    impl Debug;
    pub protocol_version, set_protocol_version: 1, 0;
    pub frame_type, set_frame_type: 3, 2;
    pub frame_subtype, set_frame_subtype: 7, 4;
    pub to_ds, set_to_ds: 8;
    pub from_ds, set_from_ds: 9;
    pub more_fragments, set_more_fragments: 10;
    pub retry, set_retry: 11;
    pub power_mgmt, set_power_mgmt: 12;
    pub more_data, set_more_data: 13;
    pub protected, set_protected: 14;
    pub htc_order, set_htc_order: 15;
}

impl FrameControl {
    pub fn mgmt(subtype: MgmtSubtype) -> Self {
        let mut fc = FrameControl(0);
        fc.set_frame_type(FRAME_TYPE_MGMT);
        fc.set_frame_subtype(subtype.raw());
        fc
    }

    pub fn raw(&self) -> u16 {
        self.0
    }
}

// IEEE Std 802.11-2016, 9.4.1.4
bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct CapabilityInfo(u16);
    impl Debug;
    pub ess, set_ess: 0;
    pub ibss, set_ibss: 1;
    pub cf_pollable, set_cf_pollable: 2;
    pub cf_poll_req, set_cf_poll_req: 3;
    pub privacy, set_privacy: 4;
    pub short_preamble, set_short_preamble: 5;
    pub pbcc, set_pbcc: 6;
    pub channel_agility, set_channel_agility: 7;
    pub spectrum_mgmt, set_spectrum_mgmt: 8;
    pub qos, set_qos: 9;
    pub short_slot_time, set_short_slot_time: 10;
    pub apsd, set_apsd: 11;
    pub radio_measurement, set_radio_measurement: 12;
    pub dsss_ofdm, set_dsss_ofdm: 13;
    pub delayed_block_ack, set_delayed_block_ack: 14;
    pub immediate_block_ack, set_immediate_block_ack: 15;
}

impl CapabilityInfo {
    pub fn from_raw(raw: u16) -> Self {
        CapabilityInfo(raw)
    }

    pub fn raw(&self) -> u16 {
        self.0
    }
}

// IEEE Std 802.11-2016, 9.3.3.2
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct MgmtHdr {
    pub frame_ctrl: LE16,
    pub duration: LE16,
    pub addr1: MacAddr,
    pub addr2: MacAddr,
    pub addr3: MacAddr,
    pub seq_ctrl: LE16,
}

pub const MGMT_HDR_LEN: usize = size_of::<MgmtHdr>();
const HT_CONTROL_LEN: usize = 4;

impl MgmtHdr {
    pub fn new(subtype: MgmtSubtype, dst: MacAddr, src: MacAddr, bssid: MacAddr) -> Self {
        MgmtHdr {
            frame_ctrl: LE16::new(FrameControl::mgmt(subtype).0),
            duration: LE16::new(0),
            addr1: dst,
            addr2: src,
            addr3: bssid,
            seq_ctrl: LE16::new(0),
        }
    }

    pub fn frame_ctrl(&self) -> FrameControl {
        FrameControl(self.frame_ctrl.get())
    }

    pub fn bssid(&self) -> MacAddr {
        self.addr3
    }
}

/// A management frame split into its validated header and its body. The body starts after the
/// optional HT Control field.
pub struct MgmtFrame<B> {
    pub mgmt_hdr: LayoutVerified<B, MgmtHdr>,
    pub body: B,
}

impl<B: ByteSlice> MgmtFrame<B> {
    /// Validates the mandatory MAC header. Frames with an unknown protocol version, a
    /// non-management type, or fewer bytes than the fixed header are rejected.
    pub fn parse(bytes: B) -> FrameParseResult<Self> {
        let actual = bytes.len();
        let (mgmt_hdr, body) = LayoutVerified::<B, MgmtHdr>::new_unaligned_from_prefix(bytes)
            .ok_or(FrameParseError::TooShort { expected: MGMT_HDR_LEN, actual })?;
        let fc = mgmt_hdr.frame_ctrl();
        if fc.protocol_version() != 0 {
            return Err(FrameParseError::UnsupportedVersion(fc.protocol_version()));
        }
        if fc.frame_type() != FRAME_TYPE_MGMT {
            return Err(FrameParseError::NotManagement(fc.frame_type()));
        }
        let body = if fc.htc_order() {
            if body.len() < HT_CONTROL_LEN {
                return Err(FrameParseError::TooShort {
                    expected: MGMT_HDR_LEN + HT_CONTROL_LEN,
                    actual,
                });
            }
            body.split_at(HT_CONTROL_LEN).1
        } else {
            body
        };
        Ok(MgmtFrame { mgmt_hdr, body })
    }

    pub fn subtype(&self) -> MgmtSubtype {
        MgmtSubtype::from_raw(self.mgmt_hdr.frame_ctrl().frame_subtype())
    }

    pub fn is_protected(&self) -> bool {
        self.mgmt_hdr.frame_ctrl().protected()
    }

    pub fn into_body(self) -> MgmtBody<B> {
        MgmtBody::parse(self.subtype(), self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    fn auth_frame(frame_ctrl: [u8; 2]) -> Vec<u8> {
        vec![
            // Frame control
            frame_ctrl[0], frame_ctrl[1],
            // Duration
            0, 0,
            // addr1, addr2, addr3
            1, 1, 1, 1, 1, 1,
            2, 2, 2, 2, 2, 2,
            3, 3, 3, 3, 3, 3,
            // Sequence control
            0x10, 0,
            // Authentication: algorithm, sequence, status
            0, 0, 2, 0, 0, 0,
        ]
    }

    #[test]
    fn frame_control_bits() {
        let fc = FrameControl::mgmt(MgmtSubtype::AUTH);
        assert_eq!(fc.0, 0x00b0);
        assert_eq!(fc.frame_type(), FRAME_TYPE_MGMT);
        assert_eq!(fc.frame_subtype(), 0x0b);
        assert!(!fc.protected());

        let mut fc = FrameControl(0);
        fc.set_protected(true);
        assert_eq!(fc.0, 0x4000);
    }

    #[test]
    fn parse_mgmt_frame() {
        let bytes = auth_frame([0xb0, 0x00]);
        let frame = MgmtFrame::parse(&bytes[..]).expect("valid management frame");
        assert_eq!(frame.subtype(), MgmtSubtype::AUTH);
        assert_eq!(frame.mgmt_hdr.addr2, [2; 6]);
        assert_eq!(frame.mgmt_hdr.bssid(), [3; 6]);
        assert_eq!(frame.body, &[0, 0, 2, 0, 0, 0][..]);
    }

    #[test]
    fn reject_bad_protocol_version() {
        let bytes = auth_frame([0xb1, 0x00]);
        assert_eq!(
            MgmtFrame::parse(&bytes[..]).err(),
            Some(FrameParseError::UnsupportedVersion(1))
        );
    }

    #[test]
    fn reject_data_frame() {
        let bytes = auth_frame([0x08, 0x00]);
        assert_eq!(MgmtFrame::parse(&bytes[..]).err(), Some(FrameParseError::NotManagement(2)));
    }

    #[test]
    fn reject_short_frame() {
        let bytes = auth_frame([0xb0, 0x00]);
        assert_eq!(
            MgmtFrame::parse(&bytes[..20]).err(),
            Some(FrameParseError::TooShort { expected: 24, actual: 20 })
        );
    }

    #[test]
    fn skip_ht_control() {
        let mut bytes = auth_frame([0xb0, 0x80]);
        let body = bytes.split_off(MGMT_HDR_LEN);
        bytes.extend_from_slice(&[0xaa; 4]);
        bytes.extend_from_slice(&body);
        let frame = MgmtFrame::parse(&bytes[..]).expect("valid management frame");
        assert_eq!(frame.body, &body[..]);
    }

    #[test]
    fn capability_info_bits() {
        let mut cap = CapabilityInfo(0);
        cap.set_ess(true);
        cap.set_privacy(true);
        cap.set_short_slot_time(true);
        assert_eq!(cap.0, 0x0411);
        assert!(!cap.ibss());
    }
}
