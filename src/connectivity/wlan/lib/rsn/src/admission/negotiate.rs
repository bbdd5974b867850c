// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Suite negotiation shared by the WPA and WPA2 strategies.

use {
    super::{table, Candidate, IeFamily, Policy, Selection},
    crate::{
        suite::{AkmSuite, CipherSuite},
        Error,
    },
    log::warn,
    wlan_common::{
        error::FrameWriteError,
        ie::{
            rsn::{
                cipher::Cipher,
                pmkid::Pmkid,
                rsne::{self, RsnCapabilities, Rsne},
            },
            wpa::{self, WpaIe},
            write_wpa1_ie, IE_HDR_LEN,
        },
        organization::Oui,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisedSuites {
    pub group: CipherSuite,
    pub pairwise: Vec<CipherSuite>,
    pub akms: Vec<AkmSuite>,
}

impl AdvertisedSuites {
    fn from_rsne(rsne: &Rsne) -> Self {
        let group = rsne
            .group_data_cipher_suite
            .as_ref()
            .map_or(CipherSuite::AesCcmp, CipherSuite::from_cipher);
        let mut pairwise: Vec<_> =
            rsne.pairwise_cipher_suites.iter().map(CipherSuite::from_cipher).collect();
        if pairwise.is_empty() {
            pairwise.push(CipherSuite::AesCcmp);
        }
        let mut akms: Vec<_> = rsne.akm_suites.iter().map(AkmSuite::from_akm).collect();
        if akms.is_empty() {
            akms.push(AkmSuite::Dot1x);
        }
        AdvertisedSuites { group, pairwise, akms }
    }

    fn from_wpa_ie(wpa_ie: &WpaIe) -> Self {
        let group = CipherSuite::from_cipher(&wpa_ie.multicast_cipher);
        let mut pairwise: Vec<_> =
            wpa_ie.unicast_cipher_list.iter().map(CipherSuite::from_cipher).collect();
        if pairwise.is_empty() {
            pairwise.push(CipherSuite::Tkip);
        }
        let mut akms: Vec<_> = wpa_ie.akm_list.iter().map(AkmSuite::from_akm).collect();
        if akms.is_empty() {
            akms.push(AkmSuite::Dot1x);
        }
        AdvertisedSuites { group, pairwise, akms }
    }
}

/// Suites the candidate advertises in the element of the given family. A malformed element is
/// treated as absent.
pub fn advertised_suites(family: IeFamily, candidate: &Candidate) -> Option<AdvertisedSuites> {
    match family {
        IeFamily::Rsn => {
            let bytes = candidate.rsne.as_ref()?;
            match rsne::from_bytes(&bytes[..]) {
                Ok(rsne) => Some(AdvertisedSuites::from_rsne(&rsne)),
                Err(e) => {
                    warn!("ignoring RSNE of {:02x?}: {}", candidate.bssid, e);
                    None
                }
            }
        }
        IeFamily::Wpa => {
            let bytes = candidate.wpa_ie.as_ref()?;
            match wpa::from_bytes(&bytes[..]) {
                Ok(wpa_ie) => Some(AdvertisedSuites::from_wpa_ie(&wpa_ie)),
                Err(e) => {
                    warn!("ignoring WPA IE of {:02x?}: {}", candidate.bssid, e);
                    None
                }
            }
        }
        IeFamily::None => None,
    }
}

/// Picks the best pairwise suite the site offers with the site's group suite.
pub fn negotiate(
    policy: &Policy,
    family: IeFamily,
    suites: &AdvertisedSuites,
) -> Option<Selection> {
    let akm = match policy.akm {
        AkmSuite::None => AkmSuite::None,
        required if suites.akms.contains(&required) => required,
        AkmSuite::Dot1x if policy.xcc_enabled && suites.akms.contains(&AkmSuite::Cckm) => {
            AkmSuite::Cckm
        }
        _ => return None,
    };

    let encryption =
        if policy.wpa_promote.cipher { CipherSuite::AesCcmp } else { policy.unicast };
    let mut best: Option<table::TableMatch> = None;
    for pairwise in &suites.pairwise {
        let candidate_match = match pairwise {
            CipherSuite::Ckip => {
                table::evaluate_ckip(suites.group, encryption, policy.xcc_enabled)
            }
            _ => table::evaluate(*pairwise, suites.group, encryption),
        };
        if let Some(m) = candidate_match {
            if best.map_or(true, |best| m.metric > best.metric) {
                best = Some(m);
            }
        }
    }
    best.map(|m| Selection {
        family,
        unicast: m.unicast,
        broadcast: m.broadcast,
        akm,
        metric: m.metric,
    })
}

/// Tries each family in order and keeps the first that negotiates.
pub fn evaluate_families(
    policy: &Policy,
    families: &[IeFamily],
    candidate: &Candidate,
) -> Option<Selection> {
    families
        .iter()
        .filter_map(|family| {
            advertised_suites(*family, candidate)
                .and_then(|suites| negotiate(policy, *family, &suites))
        })
        .next()
}

fn selector(suite: CipherSuite, oui: Oui) -> Option<Cipher> {
    match suite {
        CipherSuite::Unknown => None,
        _ => suite.to_cipher(oui),
    }
}

/// Group suite selector. Use-group is only meaningful as a pairwise suite.
fn group_selector(policy: &Policy, suite: CipherSuite, oui: Oui) -> Result<Cipher, Error> {
    match suite {
        CipherSuite::None => None,
        _ => selector(suite, oui),
    }
    .ok_or(Error::InvalidBroadcastSuite(suite, policy.network_mode))
}

fn replay_capabilities(policy: &Policy) -> Option<RsnCapabilities> {
    policy.replay_counters.map(|counters| {
        let mut caps = RsnCapabilities::default();
        caps.set_ptksa_replay_counter(counters.ptksa);
        caps.set_gtksa_replay_counter(counters.gtksa);
        caps
    })
}

/// Writes the security element announcing `selection` in a (re)association request.
pub fn build_ie(
    policy: &Policy,
    selection: &Selection,
    pmkid: Option<Pmkid>,
) -> Result<Vec<u8>, Error> {
    match selection.family {
        IeFamily::Rsn => {
            let mut rsne = Rsne::new();
            rsne.group_data_cipher_suite =
                Some(group_selector(policy, selection.broadcast, Oui::DOT11)?);
            rsne.pairwise_cipher_suites =
                selector(selection.unicast, Oui::DOT11).into_iter().collect();
            rsne.akm_suites = selection.akm.to_akm(Oui::DOT11).into_iter().collect();
            rsne.rsn_capabilities = replay_capabilities(policy);
            rsne.pmkids = pmkid.into_iter().collect();
            let mut buf: Vec<u8> = Vec::with_capacity(IE_HDR_LEN + rsne.len());
            rsne.write_into(&mut buf).map_err(FrameWriteError::from)?;
            Ok(buf)
        }
        IeFamily::Wpa => {
            let multicast_cipher = group_selector(policy, selection.broadcast, Oui::MSFT)?;
            let wpa_ie = WpaIe {
                multicast_cipher,
                unicast_cipher_list: selector(selection.unicast, Oui::MSFT).into_iter().collect(),
                akm_list: selection.akm.to_akm(Oui::MSFT).into_iter().collect(),
                capabilities: replay_capabilities(policy).map(|caps| caps.raw()),
            };
            let mut buf: Vec<u8> = vec![];
            write_wpa1_ie(&mut buf, &wpa_ie)?;
            Ok(buf)
        }
        IeFamily::None => Ok(vec![]),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{config::RsnConfig, suite::ExternalAuthMode},
        wlan_common::{
            assert_variant,
            ie::rsn::{
                akm::{self, Akm},
                cipher,
            },
        },
    };

    fn wpa2_psk_policy() -> Policy {
        let mut policy = Policy::from(&RsnConfig::default());
        policy.external_auth_mode = ExternalAuthMode::Wpa2Psk;
        policy.akm = AkmSuite::Psk;
        policy.unicast = CipherSuite::AesCcmp;
        policy.broadcast = CipherSuite::AesCcmp;
        policy
    }

    fn suites(
        group: CipherSuite,
        pairwise: Vec<CipherSuite>,
        akms: Vec<AkmSuite>,
    ) -> AdvertisedSuites {
        AdvertisedSuites { group, pairwise, akms }
    }

    #[test]
    fn rsne_defaults_when_lists_absent() {
        let rsne = Rsne::new();
        let suites = AdvertisedSuites::from_rsne(&rsne);
        assert_eq!(suites.group, CipherSuite::AesCcmp);
        assert_eq!(suites.pairwise, vec![CipherSuite::AesCcmp]);
        assert_eq!(suites.akms, vec![AkmSuite::Dot1x]);
    }

    #[test]
    fn picks_strongest_pairwise() {
        let policy = wpa2_psk_policy();
        let offered = suites(
            CipherSuite::Tkip,
            vec![CipherSuite::Tkip, CipherSuite::AesCcmp],
            vec![AkmSuite::Psk],
        );
        let selection = negotiate(&policy, IeFamily::Rsn, &offered).expect("negotiated");
        assert_eq!(selection.unicast, CipherSuite::AesCcmp);
        assert_eq!(selection.broadcast, CipherSuite::Tkip);
        assert_eq!(selection.metric, 6);
    }

    #[test]
    fn akm_mismatch_rejects() {
        let policy = wpa2_psk_policy();
        let offered =
            suites(CipherSuite::AesCcmp, vec![CipherSuite::AesCcmp], vec![AkmSuite::Dot1x]);
        assert_eq!(negotiate(&policy, IeFamily::Rsn, &offered), None);
    }

    #[test]
    fn promoted_cipher_accepts_stronger_site() {
        let mut policy = wpa2_psk_policy();
        policy.unicast = CipherSuite::Tkip;
        policy.broadcast = CipherSuite::Tkip;
        let offered =
            suites(CipherSuite::AesCcmp, vec![CipherSuite::AesCcmp], vec![AkmSuite::Psk]);
        assert_eq!(negotiate(&policy, IeFamily::Rsn, &offered), None);

        policy.wpa_promote.cipher = true;
        let selection = negotiate(&policy, IeFamily::Rsn, &offered).expect("negotiated");
        assert_eq!(selection.metric, 8);
    }

    #[test]
    fn ckip_needs_vendor_extension() {
        let mut policy = wpa2_psk_policy();
        policy.unicast = CipherSuite::Tkip;
        policy.akm = AkmSuite::Dot1x;
        let offered = suites(CipherSuite::Tkip, vec![CipherSuite::Ckip], vec![AkmSuite::Cckm]);
        assert_eq!(negotiate(&policy, IeFamily::Wpa, &offered), None);

        policy.xcc_enabled = true;
        let selection = negotiate(&policy, IeFamily::Wpa, &offered).expect("negotiated");
        assert_eq!(selection.unicast, CipherSuite::Ckip);
        assert_eq!(selection.akm, AkmSuite::Cckm);
        assert_eq!(selection.metric, 1);
    }

    #[test]
    fn build_rsne_with_pmkid() {
        let policy = wpa2_psk_policy();
        let selection = Selection {
            family: IeFamily::Rsn,
            unicast: CipherSuite::AesCcmp,
            broadcast: CipherSuite::AesCcmp,
            akm: AkmSuite::Psk,
            metric: 8,
        };
        let ie = build_ie(&policy, &selection, Some([0xaa; 16])).expect("built IE");
        assert_eq!(ie[1] as usize, ie.len() - IE_HDR_LEN);
        let rsne = rsne::from_bytes(&ie[..]).expect("valid RSNE");
        assert_eq!(rsne.pairwise_cipher_suites, vec![Cipher::new_dot11(cipher::CCMP_128)]);
        assert_eq!(rsne.akm_suites, vec![Akm::new_dot11(akm::PSK)]);
        assert_eq!(rsne.pmkids, vec![[0xaa; 16]]);
    }

    #[test]
    fn rsne_needs_a_group_suite() {
        let policy = wpa2_psk_policy();
        let selection = Selection {
            family: IeFamily::Rsn,
            unicast: CipherSuite::AesCcmp,
            broadcast: CipherSuite::None,
            akm: AkmSuite::Psk,
            metric: 8,
        };
        assert_variant!(
            build_ie(&policy, &selection, None),
            Err(Error::InvalidBroadcastSuite(CipherSuite::None, _))
        );
    }

    #[test]
    fn build_wpa_ie() {
        let mut policy = wpa2_psk_policy();
        policy.replay_counters = Some(crate::config::ReplayCounters { ptksa: 1, gtksa: 0 });
        let selection = Selection {
            family: IeFamily::Wpa,
            unicast: CipherSuite::Tkip,
            broadcast: CipherSuite::Tkip,
            akm: AkmSuite::Psk,
            metric: 7,
        };
        let ie = build_ie(&policy, &selection, None).expect("built IE");
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            221, 24,
            0x00, 0x50, 0xf2, 0x01,
            0x01, 0x00,
            0x00, 0x50, 0xf2, 0x02,
            0x01, 0x00, 0x00, 0x50, 0xf2, 0x02,
            0x01, 0x00, 0x00, 0x50, 0xf2, 0x02,
            0x04, 0x00,
        ];
        assert_eq!(ie, expected);
    }
}
