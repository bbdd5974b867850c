// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{
        akm::Akm,
        cipher::{self, Cipher},
        pmkid::{Pmkid, PMKID_LEN},
        suite_selector::{self, SuiteSelector, SUITE_SELECTOR_LEN},
    },
    crate::{
        appendable::{Appendable, BufferTooSmall},
        ie::{Id, IE_HDR_LEN, IE_MAX_LEN},
        LE16,
    },
    bitfield::bitfield,
    byteorder::{LittleEndian, ReadBytesExt},
    std::io::{Cursor, Read},
    thiserror::Error,
};

pub const VERSION: u16 = 1;

macro_rules! return_ok_on_empty {
    ( $rdr:expr, $result:expr ) => {{
        if remaining(&$rdr) == 0 {
            return Ok($result);
        }
    }};
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("invalid RSNE; too short")]
    TooShort,
    #[error("invalid RSNE; too long")]
    TooLong,
    #[error("invalid RSNE; unexpected element id {0}")]
    UnexpectedId(u8),
    #[error("invalid RSNE; length octet {declared} but body is {actual} bytes")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("invalid RSNE; unsupported version {0}")]
    UnsupportedVersion(u16),
    #[error("invalid RSNE; expected suite selector (group, pairwise or AKM) but was too short")]
    ExpectedSuiteSelector,
    #[error("invalid RSNE; expected pairwise cipher suite list count")]
    ExpectedPairwiseListCount,
    #[error("invalid RSNE; expected AKM suite list count")]
    ExpectedAkmListCount,
    #[error("invalid RSNE; expected RSN capabilities")]
    ExpectedCapabilities,
    #[error("invalid RSNE; expected PMKID list count")]
    ExpectedPmkidListCount,
    #[error("invalid RSNE; expected PMKID but was too short")]
    ExpectedPmkid,
}

pub type Result<T> = std::result::Result<T, Error>;

// IEEE Std 802.11-2016, 9.4.2.25.4
bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct RsnCapabilities(u16);
    impl Debug;
    pub preauth, set_preauth: 0;
    pub no_pairwise, set_no_pairwise: 1;
    pub ptksa_replay_counter, set_ptksa_replay_counter: 3, 2;
    pub gtksa_replay_counter, set_gtksa_replay_counter: 5, 4;
    pub mgmt_frame_protection_req, set_mgmt_frame_protection_req: 6;
    pub mgmt_frame_protection_cap, set_mgmt_frame_protection_cap: 7;
    pub joint_multiband, set_joint_multiband: 8;
    pub peerkey_enabled, set_peerkey_enabled: 9;
    pub ssp_amsdu_cap, set_ssp_amsdu_cap: 10;
    pub ssp_amsdu_req, set_ssp_amsdu_req: 11;
    pub pbac, set_pbac: 12;
    pub extended_key_id, set_extended_key_id: 13;
}

impl RsnCapabilities {
    pub fn from_raw(raw: u16) -> Self {
        RsnCapabilities(raw)
    }

    pub fn raw(&self) -> u16 {
        self.0
    }
}

// IEEE Std 802.11-2016, 9.4.2.25.1
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Rsne {
    pub version: u16,
    pub group_data_cipher_suite: Option<Cipher>,
    pub pairwise_cipher_suites: Vec<Cipher>,
    pub akm_suites: Vec<Akm>,
    pub rsn_capabilities: Option<RsnCapabilities>,
    pub pmkids: Vec<Pmkid>,
    pub group_mgmt_cipher_suite: Option<Cipher>,
}

fn remaining(rdr: &Cursor<&[u8]>) -> usize {
    rdr.get_ref().len().saturating_sub(rdr.position() as usize)
}

fn read_suite_list<T>(rdr: &mut Cursor<&[u8]>, count: u16) -> Result<Vec<T>>
where
    T: suite_selector::Factory<Suite = T>,
{
    let mut suites = Vec::with_capacity(count as usize);
    for _ in 0..count {
        suites.push(suite_selector::read::<T>(rdr).ok_or(Error::ExpectedSuiteSelector)?);
    }
    Ok(suites)
}

fn read_pmkid(rdr: &mut Cursor<&[u8]>) -> Result<Pmkid> {
    if remaining(rdr) < PMKID_LEN {
        return Err(Error::ExpectedPmkid);
    }
    let mut pmkid = [0u8; PMKID_LEN];
    rdr.read_exact(&mut pmkid).map_err(|_| Error::ExpectedPmkid)?;
    Ok(pmkid)
}

/// Parses a complete RSN element, header included. Trailing optional fields may be absent, but
/// a field that is started must be complete.
pub fn from_bytes(data: &[u8]) -> Result<Rsne> {
    if data.len() > IE_HDR_LEN + IE_MAX_LEN {
        return Err(Error::TooLong);
    }
    if data.len() < IE_HDR_LEN + 2 {
        return Err(Error::TooShort);
    }
    let mut rdr = Cursor::new(data);
    let element_id = rdr.read_u8().map_err(|_| Error::TooShort)?;
    if element_id != Id::RSNE.0 {
        return Err(Error::UnexpectedId(element_id));
    }
    let declared = rdr.read_u8().map_err(|_| Error::TooShort)? as usize;
    if declared != data.len() - IE_HDR_LEN {
        return Err(Error::LengthMismatch { declared, actual: data.len() - IE_HDR_LEN });
    }

    let mut rsne = Rsne::default();
    rsne.version = rdr.read_u16::<LittleEndian>().map_err(|_| Error::TooShort)?;
    if rsne.version != VERSION {
        return Err(Error::UnsupportedVersion(rsne.version));
    }

    return_ok_on_empty!(rdr, rsne);
    rsne.group_data_cipher_suite =
        Some(suite_selector::read::<Cipher>(&mut rdr).ok_or(Error::ExpectedSuiteSelector)?);

    return_ok_on_empty!(rdr, rsne);
    let count =
        rdr.read_u16::<LittleEndian>().map_err(|_| Error::ExpectedPairwiseListCount)?;
    rsne.pairwise_cipher_suites = read_suite_list::<Cipher>(&mut rdr, count)?;

    return_ok_on_empty!(rdr, rsne);
    let count = rdr.read_u16::<LittleEndian>().map_err(|_| Error::ExpectedAkmListCount)?;
    rsne.akm_suites = read_suite_list::<Akm>(&mut rdr, count)?;

    return_ok_on_empty!(rdr, rsne);
    let caps = rdr.read_u16::<LittleEndian>().map_err(|_| Error::ExpectedCapabilities)?;
    rsne.rsn_capabilities = Some(RsnCapabilities(caps));

    return_ok_on_empty!(rdr, rsne);
    let count = rdr.read_u16::<LittleEndian>().map_err(|_| Error::ExpectedPmkidListCount)?;
    for _ in 0..count {
        rsne.pmkids.push(read_pmkid(&mut rdr)?);
    }

    return_ok_on_empty!(rdr, rsne);
    rsne.group_mgmt_cipher_suite =
        Some(suite_selector::read::<Cipher>(&mut rdr).ok_or(Error::ExpectedSuiteSelector)?);

    Ok(rsne)
}

impl Rsne {
    pub fn new() -> Self {
        Rsne { version: VERSION, ..Default::default() }
    }

    // Optional fields are positional: a later field forces every earlier one onto the wire.
    fn last_field(&self) -> usize {
        if self.group_mgmt_cipher_suite.is_some() {
            6
        } else if !self.pmkids.is_empty() {
            5
        } else if self.rsn_capabilities.is_some() {
            4
        } else if !self.akm_suites.is_empty() {
            3
        } else if !self.pairwise_cipher_suites.is_empty() {
            2
        } else if self.group_data_cipher_suite.is_some() {
            1
        } else {
            0
        }
    }

    /// Length of the element body, excluding the two byte element header.
    pub fn len(&self) -> usize {
        let last = self.last_field();
        let mut len = 2;
        if last >= 1 {
            len += SUITE_SELECTOR_LEN;
        }
        if last >= 2 {
            len += 2 + SUITE_SELECTOR_LEN * self.pairwise_cipher_suites.len();
        }
        if last >= 3 {
            len += 2 + SUITE_SELECTOR_LEN * self.akm_suites.len();
        }
        if last >= 4 {
            len += 2;
        }
        if last >= 5 {
            len += 2 + PMKID_LEN * self.pmkids.len();
        }
        if last >= 6 {
            len += SUITE_SELECTOR_LEN;
        }
        len
    }

    /// Writes the complete element, header included.
    pub fn write_into<A: Appendable>(
        &self,
        buf: &mut A,
    ) -> std::result::Result<(), BufferTooSmall> {
        let body_len = self.len();
        if body_len > IE_MAX_LEN || !buf.can_append(IE_HDR_LEN + body_len) {
            return Err(BufferTooSmall);
        }
        let last = self.last_field();

        buf.append_byte(Id::RSNE.0)?;
        buf.append_byte(body_len as u8)?;
        buf.append_value(&LE16::new(self.version))?;

        if last >= 1 {
            // An absent group suite defaults to CCMP-128 (IEEE Std 802.11-2016, 9.4.2.25.1).
            let group = self
                .group_data_cipher_suite
                .unwrap_or_else(|| Cipher::new_dot11(cipher::CCMP_128));
            group.write_into(buf)?;
        }
        if last >= 2 {
            buf.append_value(&LE16::new(self.pairwise_cipher_suites.len() as u16))?;
            for cipher in &self.pairwise_cipher_suites {
                cipher.write_into(buf)?;
            }
        }
        if last >= 3 {
            buf.append_value(&LE16::new(self.akm_suites.len() as u16))?;
            for akm in &self.akm_suites {
                akm.write_into(buf)?;
            }
        }
        if last >= 4 {
            let caps = self.rsn_capabilities.unwrap_or_default();
            buf.append_value(&LE16::new(caps.0))?;
        }
        if last >= 5 {
            buf.append_value(&LE16::new(self.pmkids.len() as u16))?;
            for pmkid in &self.pmkids {
                buf.append_bytes(&pmkid[..])?;
            }
        }
        if let Some(cipher) = self.group_mgmt_cipher_suite.as_ref() {
            cipher.write_into(buf)?;
        }
        Ok(())
    }
}
