// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

mod fields;
mod parse;
mod rates_writer;
mod reader;
pub mod rsn;
pub mod wpa;

pub use {fields::*, parse::*, rates_writer::*, reader::*};

use {
    crate::{
        appendable::Appendable,
        error::FrameWriteError,
        organization::Oui,
    },
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

#[repr(C)]
#[derive(AsBytes, FromBytes, Unaligned, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Id(pub u8);

// IEEE Std 802.11-2016, 9.4.2.1, Table 9-77
impl Id {
    pub const SSID: Self = Self(0);
    pub const SUPPORTED_RATES: Self = Self(1);
    pub const FH_PARAM_SET: Self = Self(2);
    pub const DSSS_PARAM_SET: Self = Self(3);
    pub const CF_PARAM_SET: Self = Self(4);
    pub const TIM: Self = Self(5);
    pub const IBSS_PARAM_SET: Self = Self(6);
    pub const COUNTRY: Self = Self(7);
    pub const CHALLENGE_TEXT: Self = Self(16);
    pub const POWER_CONSTRAINT: Self = Self(32);
    pub const POWER_CAPABILITY: Self = Self(33);
    pub const TPC_REPORT: Self = Self(35);
    pub const CHANNEL_SWITCH_ANNOUNCEMENT: Self = Self(37);
    pub const QUIET: Self = Self(40);
    pub const HT_CAPABILITIES: Self = Self(45);
    pub const QOS_CAPABILITY: Self = Self(46);
    pub const RSNE: Self = Self(48);
    pub const EXT_SUPPORTED_RATES: Self = Self(50);
    pub const HT_OPERATION: Self = Self(61);
    pub const VENDOR_SPECIFIC: Self = Self(221);
}

#[repr(C, packed)]
#[derive(AsBytes, FromBytes, Unaligned, Clone, Copy, Debug)]
pub struct Header {
    pub id: Id,
    pub body_len: u8,
}

pub const IE_HDR_LEN: usize = 2;
pub const IE_MAX_LEN: usize = 255;
pub const SSID_MAX_LEN: usize = 32;
pub const SUPPORTED_RATES_MAX_LEN: usize = 8;
/// Length of the challenge text sent by an AP during Shared Key authentication.
pub const CHALLENGE_TEXT_LEN: usize = 128;

/// Vendor element types carried under the Microsoft OUI.
pub const MSFT_WPA_TYPE: u8 = 1;
pub const MSFT_WME_TYPE: u8 = 2;
pub const MSFT_WSC_TYPE: u8 = 4;
pub const WME_INFO_SUBTYPE: u8 = 0;
pub const WME_PARAM_SUBTYPE: u8 = 1;
pub const WME_VERSION: u8 = 1;

pub fn write_ie<B: Appendable>(buf: &mut B, id: Id, body: &[u8]) -> Result<(), FrameWriteError> {
    if body.len() > IE_MAX_LEN {
        return Err(FrameWriteError::new_invalid_data(format!(
            "element {} body too long: {}",
            id.0,
            body.len()
        )));
    }
    if !buf.can_append(IE_HDR_LEN + body.len()) {
        return Err(FrameWriteError::BufferTooSmall);
    }
    buf.append_value(&Header { id, body_len: body.len() as u8 })?;
    buf.append_bytes(body)?;
    Ok(())
}

pub fn write_ssid<B: Appendable>(buf: &mut B, ssid: &[u8]) -> Result<(), FrameWriteError> {
    if ssid.len() > SSID_MAX_LEN {
        return Err(FrameWriteError::new_invalid_data(format!(
            "SSID too long: {}",
            ssid.len()
        )));
    }
    write_ie(buf, Id::SSID, ssid)
}

pub fn write_supported_rates<B: Appendable>(
    buf: &mut B,
    rates: &[u8],
) -> Result<(), FrameWriteError> {
    if rates.is_empty() || rates.len() > SUPPORTED_RATES_MAX_LEN {
        return Err(FrameWriteError::new_invalid_data(format!(
            "invalid number of supported rates: {}",
            rates.len()
        )));
    }
    write_ie(buf, Id::SUPPORTED_RATES, rates)
}

pub fn write_ext_supported_rates<B: Appendable>(
    buf: &mut B,
    rates: &[u8],
) -> Result<(), FrameWriteError> {
    if rates.is_empty() {
        return Err(FrameWriteError::new_invalid_data("no extended supported rates"));
    }
    write_ie(buf, Id::EXT_SUPPORTED_RATES, rates)
}

pub fn write_power_capability<B: Appendable>(
    buf: &mut B,
    power_cap: &PowerCapability,
) -> Result<(), FrameWriteError> {
    write_ie(buf, Id::POWER_CAPABILITY, power_cap.as_bytes())
}

pub fn write_challenge_text<B: Appendable>(
    buf: &mut B,
    challenge: &[u8],
) -> Result<(), FrameWriteError> {
    write_ie(buf, Id::CHALLENGE_TEXT, challenge)
}

pub fn write_ht_capabilities<B: Appendable>(
    buf: &mut B,
    ht_cap: &HtCapabilities,
) -> Result<(), FrameWriteError> {
    write_ie(buf, Id::HT_CAPABILITIES, ht_cap.as_bytes())
}

/// Writes a WME Information element (Microsoft OUI, type 2, subtype 0).
pub fn write_wme_info<B: Appendable>(buf: &mut B, qos_info: u8) -> Result<(), FrameWriteError> {
    let mut body = Vec::with_capacity(7);
    body.extend_from_slice(&Oui::MSFT[..]);
    body.extend_from_slice(&[MSFT_WME_TYPE, WME_INFO_SUBTYPE, WME_VERSION, qos_info]);
    write_ie(buf, Id::VENDOR_SPECIFIC, &body[..])
}

/// Writes a WPA1 vendor element: the vendor header followed by the WPA body.
pub fn write_wpa1_ie<B: Appendable>(
    buf: &mut B,
    wpa_ie: &wpa::WpaIe,
) -> Result<(), FrameWriteError> {
    let mut body = Vec::with_capacity(4 + wpa_ie.len());
    body.extend_from_slice(&wpa::OUI[..]);
    body.push(wpa::VENDOR_SPECIFIC_TYPE);
    wpa_ie.write_into(&mut body)?;
    write_ie(buf, Id::VENDOR_SPECIFIC, &body[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_ssid_ie() {
        let mut buf: Vec<u8> = vec![];
        write_ssid(&mut buf, b"foo").expect("valid SSID");
        assert_eq!(&buf[..], &[0, 3, b'f', b'o', b'o']);
    }

    #[test]
    fn ssid_too_long() {
        let mut buf: Vec<u8> = vec![];
        assert!(write_ssid(&mut buf, &[b'a'; 33][..]).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn supported_rates_limits() {
        let mut buf: Vec<u8> = vec![];
        assert!(write_supported_rates(&mut buf, &[]).is_err());
        assert!(write_supported_rates(&mut buf, &[1; 9][..]).is_err());
        write_supported_rates(&mut buf, &[0x82, 0x84]).expect("valid rates");
        assert_eq!(&buf[..], &[1, 2, 0x82, 0x84]);
    }

    #[test]
    fn write_wme_info_ie() {
        let mut buf: Vec<u8> = vec![];
        write_wme_info(&mut buf, 0x0f).expect("valid WME info");
        assert_eq!(&buf[..], &[221, 7, 0x00, 0x50, 0xf2, 2, 0, 1, 0x0f]);
    }

    #[test]
    fn write_challenge_text_ie() {
        let mut buf: Vec<u8> = vec![];
        write_challenge_text(&mut buf, &[7; 4][..]).expect("valid challenge");
        assert_eq!(&buf[..], &[16, 4, 7, 7, 7, 7]);
    }

    #[test]
    fn body_too_long() {
        let mut buf: Vec<u8> = vec![];
        assert!(write_ie(&mut buf, Id::VENDOR_SPECIFIC, &[0; 256][..]).is_err());
    }
}
