// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{
        fields::*, Id, Reader, IE_HDR_LEN, MSFT_WME_TYPE, MSFT_WPA_TYPE, MSFT_WSC_TYPE,
        SSID_MAX_LEN, SUPPORTED_RATES_MAX_LEN,
    },
    crate::{error::FrameParseResult, organization::Oui},
    log::{debug, warn},
    std::mem::size_of,
    zerocopy::{FromBytes, LayoutVerified, Unaligned},
};

/// Upper bound on the bytes of unrecognized elements kept for the upper layers.
pub const UNKNOWN_IE_MAX_LEN: usize = 300;

const VENDOR_HDR_LEN: usize = 4;
const COUNTRY_CODE_LEN: usize = 3;

/// Information elements recognized in a management frame body. Every element is optional; a
/// malformed optional element is left out as if it had not been sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedIes {
    pub ssid: Option<Vec<u8>>,
    pub supported_rates: Option<Vec<SupportedRate>>,
    pub ext_supported_rates: Option<Vec<SupportedRate>>,
    pub fh_param_set: Option<FhParamSet>,
    pub dsss_param_set: Option<DsssParamSet>,
    pub cf_param_set: Option<CfParamSet>,
    pub ibss_param_set: Option<IbssParamSet>,
    pub tim: Option<Tim>,
    pub country: Option<Country>,
    pub power_constraint: Option<PowerConstraint>,
    pub channel_switch: Option<ChannelSwitchAnnouncement>,
    pub quiet: Option<Quiet>,
    pub tpc_report: Option<TpcReport>,
    pub qos_capability: Option<QosCapability>,
    pub ht_capabilities: Option<HtCapabilities>,
    pub ht_operation: Option<HtOperation>,
    pub challenge_text: Option<Vec<u8>>,
    /// Complete RSN element, header included.
    pub rsne: Option<Vec<u8>>,
    /// WPA vendor element body following the OUI and vendor type.
    pub wpa_ie: Option<Vec<u8>>,
    /// WME vendor element body following the OUI and vendor type.
    pub wme: Option<Vec<u8>>,
    /// WSC vendor element body following the OUI and vendor type.
    pub wsc: Option<Vec<u8>>,
    /// Unrecognized elements copied verbatim, headers included.
    pub unknown: Vec<u8>,
}

impl ParsedIes {
    /// All supported rates, basic and extended, in the order they were advertised.
    pub fn all_rates(&self) -> Vec<SupportedRate> {
        self.supported_rates
            .iter()
            .chain(self.ext_supported_rates.iter())
            .flat_map(|rates| rates.iter().copied())
            .collect()
    }

    pub fn current_channel(&self) -> Option<u8> {
        self.dsss_param_set
            .map(|dsss| dsss.current_chan)
            .or_else(|| self.ht_operation.map(|ht_op| ht_op.primary_channel))
    }

    fn add_unknown(&mut self, id: Id, body: &[u8]) {
        if self.unknown.len() + IE_HDR_LEN + body.len() > UNKNOWN_IE_MAX_LEN {
            warn!("dropping element {}: unknown element buffer full", id.0);
            return;
        }
        self.unknown.push(id.0);
        self.unknown.push(body.len() as u8);
        self.unknown.extend_from_slice(body);
    }
}

fn parse_fixed<T: FromBytes + Unaligned + Copy>(id: Id, body: &[u8]) -> Option<T> {
    if body.len() != size_of::<T>() {
        debug!("skipping element {}: length {} != {}", id.0, body.len(), size_of::<T>());
        return None;
    }
    LayoutVerified::<_, T>::new_unaligned(body).map(|view| *view)
}

fn parse_rates(id: Id, body: &[u8], max_len: usize) -> Option<Vec<SupportedRate>> {
    if body.is_empty() || body.len() > max_len {
        debug!("skipping element {}: {} rates", id.0, body.len());
        return None;
    }
    Some(body.iter().map(|rate| SupportedRate::from_raw(*rate)).collect())
}

fn parse_tim(body: &[u8]) -> Option<Tim> {
    let (header, bitmap) = LayoutVerified::<_, TimHeader>::new_unaligned_from_prefix(body)?;
    if bitmap.is_empty() {
        return None;
    }
    Some(Tim { header: *header, bitmap: bitmap.to_vec() })
}

fn parse_country(body: &[u8]) -> Option<Country> {
    if body.len() < COUNTRY_CODE_LEN {
        return None;
    }
    let (code, triplets) = body.split_at(COUNTRY_CODE_LEN);
    let mut country_code = [0u8; COUNTRY_CODE_LEN];
    country_code.copy_from_slice(code);
    // An odd number of triplet bytes is padded with a single zero.
    let subbands = triplets
        .chunks_exact(size_of::<SubbandTriplet>())
        .filter_map(|chunk| LayoutVerified::<_, SubbandTriplet>::new_unaligned(chunk))
        .map(|triplet| *triplet)
        .collect();
    Some(Country { country_code, subbands })
}

/// Parses a chain of information elements. Fails only when an element's declared length runs
/// past the end of `bytes`.
pub fn parse_ies(bytes: &[u8]) -> FrameParseResult<ParsedIes> {
    let mut ies = ParsedIes::default();
    for element in Reader::new(bytes) {
        let (id, body) = element?;
        match id {
            Id::SSID => {
                if body.len() <= SSID_MAX_LEN {
                    ies.ssid = Some(body.to_vec());
                } else {
                    debug!("skipping SSID of {} bytes", body.len());
                }
            }
            Id::SUPPORTED_RATES => {
                ies.supported_rates = parse_rates(id, body, SUPPORTED_RATES_MAX_LEN)
            }
            Id::EXT_SUPPORTED_RATES => {
                ies.ext_supported_rates = parse_rates(id, body, std::u8::MAX as usize)
            }
            Id::FH_PARAM_SET => ies.fh_param_set = parse_fixed(id, body),
            Id::DSSS_PARAM_SET => ies.dsss_param_set = parse_fixed(id, body),
            Id::CF_PARAM_SET => ies.cf_param_set = parse_fixed(id, body),
            Id::IBSS_PARAM_SET => ies.ibss_param_set = parse_fixed(id, body),
            Id::TIM => ies.tim = parse_tim(body),
            Id::COUNTRY => ies.country = parse_country(body),
            Id::POWER_CONSTRAINT => ies.power_constraint = parse_fixed(id, body),
            Id::CHANNEL_SWITCH_ANNOUNCEMENT => ies.channel_switch = parse_fixed(id, body),
            Id::QUIET => ies.quiet = parse_fixed(id, body),
            Id::TPC_REPORT => ies.tpc_report = parse_fixed(id, body),
            Id::QOS_CAPABILITY => ies.qos_capability = parse_fixed(id, body),
            Id::HT_CAPABILITIES => ies.ht_capabilities = parse_fixed(id, body),
            Id::HT_OPERATION => ies.ht_operation = parse_fixed(id, body),
            Id::CHALLENGE_TEXT => ies.challenge_text = Some(body.to_vec()),
            Id::RSNE => {
                let mut rsne = Vec::with_capacity(IE_HDR_LEN + body.len());
                rsne.push(id.0);
                rsne.push(body.len() as u8);
                rsne.extend_from_slice(body);
                ies.rsne = Some(rsne);
            }
            Id::VENDOR_SPECIFIC => parse_vendor(&mut ies, body),
            _ => ies.add_unknown(id, body),
        }
    }
    Ok(ies)
}

fn parse_vendor(ies: &mut ParsedIes, body: &[u8]) {
    if body.len() >= VENDOR_HDR_LEN && body[..3] == Oui::MSFT[..] {
        let payload = body[VENDOR_HDR_LEN..].to_vec();
        match body[3] {
            MSFT_WPA_TYPE => {
                ies.wpa_ie = Some(payload);
                return;
            }
            MSFT_WME_TYPE => {
                ies.wme = Some(payload);
                return;
            }
            MSFT_WSC_TYPE => {
                ies.wsc = Some(payload);
                return;
            }
            _ => (),
        }
    }
    ies.add_unknown(Id::VENDOR_SPECIFIC, body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    fn beacon_ies() -> Vec<u8> {
        vec![
            // SSID
            0, 4, b'w', b'l', b'a', b'n',
            // Supported rates
            1, 4, 0x82, 0x84, 0x8b, 0x96,
            // DSSS parameter set
            3, 1, 6,
            // TIM
            5, 4, 0, 1, 0, 0,
            // Country: "US " with one triplet
            7, 6, b'U', b'S', b' ', 1, 11, 30,
            // RSNE
            48, 2, 1, 0,
            // Extended supported rates
            50, 2, 0x0c, 0x12,
            // WME parameter element
            221, 7, 0x00, 0x50, 0xf2, 2, 1, 1, 0x80,
            // WPA element
            221, 6, 0x00, 0x50, 0xf2, 1, 1, 0,
            // Unknown vendor element
            221, 4, 0x00, 0x11, 0x22, 9,
            // Unknown element id
            200, 1, 0xaa,
        ]
    }

    #[test]
    fn parse_beacon_elements() {
        let ies = parse_ies(&beacon_ies()[..]).expect("valid elements");
        assert_eq!(ies.ssid, Some(b"wlan".to_vec()));
        assert_eq!(ies.supported_rates.as_ref().map(|r| r.len()), Some(4));
        assert_eq!(ies.all_rates().len(), 6);
        assert_eq!(ies.current_channel(), Some(6));
        let tim = ies.tim.as_ref().expect("TIM");
        assert_eq!(tim.header.dtim_period, 1);
        assert_eq!(tim.bitmap, vec![0]);
        let country = ies.country.as_ref().expect("country");
        assert_eq!(&country.country_code, b"US ");
        assert_eq!(country.subbands.len(), 1);
        assert_eq!(country.subbands[0].max_tx_power, 30);
        assert_eq!(ies.rsne, Some(vec![48, 2, 1, 0]));
        assert_eq!(ies.wme, Some(vec![1, 1, 0x80]));
        assert_eq!(ies.wpa_ie, Some(vec![1, 0]));
        assert_eq!(ies.wsc, None);
        assert_eq!(ies.unknown, vec![221, 4, 0x00, 0x11, 0x22, 9, 200, 1, 0xaa]);
    }

    #[test]
    fn truncated_element_fails() {
        let mut bytes = beacon_ies();
        bytes.extend_from_slice(&[45, 26, 0, 0]);
        assert_eq!(
            parse_ies(&bytes[..]),
            Err(crate::error::FrameParseError::TruncatedIe { id: 45, declared: 26, remaining: 2 })
        );
    }

    #[test]
    fn malformed_optional_elements_are_absent() {
        // SSID longer than 32 bytes
        let mut bytes = vec![0, 33];
        bytes.extend_from_slice(&[b'a'; 33][..]);
        #[rustfmt::skip]
        let malformed = [
            // Empty supported rates
            1, 0,
            // DSSS parameter set with the wrong length
            3, 2, 6, 0,
            // HT capabilities with the wrong length
            45, 1, 0,
        ];
        bytes.extend_from_slice(&malformed[..]);
        let ies = parse_ies(&bytes[..]).expect("valid element chain");
        assert_eq!(ies, ParsedIes::default());
    }

    #[test]
    fn unknown_elements_are_bounded() {
        let mut bytes = vec![];
        for _ in 0..3 {
            bytes.extend_from_slice(&[200, 120]);
            bytes.extend_from_slice(&[0xbb; 120][..]);
        }
        let ies = parse_ies(&bytes[..]).expect("valid element chain");
        assert_eq!(ies.unknown.len(), 2 * (IE_HDR_LEN + 120));
    }

    #[test]
    fn short_vendor_element_is_unknown() {
        let ies = parse_ies(&[221, 3, 0x00, 0x50, 0xf2][..]).expect("valid element chain");
        assert_eq!(ies.wpa_ie, None);
        assert_eq!(ies.unknown, vec![221, 3, 0x00, 0x50, 0xf2]);
    }

    #[test]
    fn parse_ht_and_power_elements() {
        let mut bytes = vec![45, 26];
        bytes.extend_from_slice(&[0x6e; 26][..]);
        bytes.extend_from_slice(&[32, 1, 3, 35, 2, 20, 0, 37, 3, 1, 36, 5]);
        let ies = parse_ies(&bytes[..]).expect("valid element chain");
        assert_eq!(ies.ht_capabilities.map(|ht| ht.ampdu_params), Some(0x6e));
        assert_eq!(ies.power_constraint.map(|p| p.local_power_constraint), Some(3));
        assert_eq!(ies.tpc_report.map(|t| t.tx_power), Some(20));
        assert_eq!(ies.channel_switch.map(|c| c.new_channel_number), Some(36));
    }
}
