// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

mod fields;
mod reason;
mod status;

pub use {fields::*, reason::*, status::*};

use {
    crate::mac::MgmtSubtype,
    zerocopy::{ByteSlice, LayoutVerified},
};

/// A management frame body with its fixed fields verified. `elements` holds the trailing
/// information elements, which are left unparsed.
pub enum MgmtBody<B: ByteSlice> {
    Beacon { bcn_hdr: LayoutVerified<B, BeaconHdr>, elements: B },
    ProbeResp { probe_resp_hdr: LayoutVerified<B, ProbeRespHdr>, elements: B },
    Authentication { auth_hdr: LayoutVerified<B, AuthHdr>, elements: B },
    AssociationResp { assoc_resp_hdr: LayoutVerified<B, AssocRespHdr>, elements: B },
    ReassociationResp { assoc_resp_hdr: LayoutVerified<B, AssocRespHdr>, elements: B },
    Deauthentication { deauth_hdr: LayoutVerified<B, DeauthHdr>, elements: B },
    Disassociation { disassoc_hdr: LayoutVerified<B, DisassocHdr>, elements: B },
    /// A subtype the station does not process, or a body too short for its fixed fields.
    Unsupported { subtype: MgmtSubtype },
}

impl<B: ByteSlice> MgmtBody<B> {
    pub fn parse(subtype: MgmtSubtype, bytes: B) -> Self {
        match subtype {
            MgmtSubtype::BEACON => match LayoutVerified::new_unaligned_from_prefix(bytes) {
                Some((bcn_hdr, elements)) => MgmtBody::Beacon { bcn_hdr, elements },
                None => MgmtBody::Unsupported { subtype },
            },
            MgmtSubtype::PROBE_RESP => match LayoutVerified::new_unaligned_from_prefix(bytes) {
                Some((probe_resp_hdr, elements)) => {
                    MgmtBody::ProbeResp { probe_resp_hdr, elements }
                }
                None => MgmtBody::Unsupported { subtype },
            },
            MgmtSubtype::AUTH => match LayoutVerified::new_unaligned_from_prefix(bytes) {
                Some((auth_hdr, elements)) => MgmtBody::Authentication { auth_hdr, elements },
                None => MgmtBody::Unsupported { subtype },
            },
            MgmtSubtype::ASSOC_RESP => match LayoutVerified::new_unaligned_from_prefix(bytes) {
                Some((assoc_resp_hdr, elements)) => {
                    MgmtBody::AssociationResp { assoc_resp_hdr, elements }
                }
                None => MgmtBody::Unsupported { subtype },
            },
            MgmtSubtype::REASSOC_RESP => match LayoutVerified::new_unaligned_from_prefix(bytes) {
                Some((assoc_resp_hdr, elements)) => {
                    MgmtBody::ReassociationResp { assoc_resp_hdr, elements }
                }
                None => MgmtBody::Unsupported { subtype },
            },
            MgmtSubtype::DEAUTH => match LayoutVerified::new_unaligned_from_prefix(bytes) {
                Some((deauth_hdr, elements)) => MgmtBody::Deauthentication { deauth_hdr, elements },
                None => MgmtBody::Unsupported { subtype },
            },
            MgmtSubtype::DISASSOC => match LayoutVerified::new_unaligned_from_prefix(bytes) {
                Some((disassoc_hdr, elements)) => {
                    MgmtBody::Disassociation { disassoc_hdr, elements }
                }
                None => MgmtBody::Unsupported { subtype },
            },
            subtype => MgmtBody::Unsupported { subtype },
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::assert_variant};

    impl<B: ByteSlice> std::fmt::Debug for MgmtBody<B> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                MgmtBody::Beacon { .. } => write!(f, "Beacon"),
                MgmtBody::ProbeResp { .. } => write!(f, "ProbeResp"),
                MgmtBody::Authentication { .. } => write!(f, "Authentication"),
                MgmtBody::AssociationResp { .. } => write!(f, "AssociationResp"),
                MgmtBody::ReassociationResp { .. } => write!(f, "ReassociationResp"),
                MgmtBody::Deauthentication { .. } => write!(f, "Deauthentication"),
                MgmtBody::Disassociation { .. } => write!(f, "Disassociation"),
                MgmtBody::Unsupported { subtype } => write!(f, "Unsupported({:?})", subtype),
            }
        }
    }

    #[test]
    fn parse_auth_body() {
        let bytes = [1, 0, 2, 0, 0, 0, 16, 2, 0xaa, 0xbb];
        let (auth_hdr, elements) = assert_variant!(
            MgmtBody::parse(MgmtSubtype::AUTH, &bytes[..]),
            MgmtBody::Authentication { auth_hdr, elements } => (auth_hdr, elements)
        );
        assert_eq!(auth_hdr.auth_alg_num(), AuthAlgorithmNumber::SHARED_KEY);
        assert_eq!(auth_hdr.auth_txn_seq_num(), 2);
        assert_eq!(auth_hdr.status_code(), StatusCode::SUCCESS);
        assert_eq!(elements, &[16, 2, 0xaa, 0xbb][..]);
    }

    #[test]
    fn parse_deauth_body() {
        let bytes = [3, 0];
        let deauth_hdr = assert_variant!(
            MgmtBody::parse(MgmtSubtype::DEAUTH, &bytes[..]),
            MgmtBody::Deauthentication { deauth_hdr, .. } => deauth_hdr
        );
        assert_eq!(deauth_hdr.reason_code(), ReasonCode::LEAVING_NETWORK_DEAUTH);
    }

    #[test]
    fn short_body_is_unsupported() {
        let bytes = [1, 0, 2];
        assert_variant!(
            MgmtBody::parse(MgmtSubtype::AUTH, &bytes[..]),
            MgmtBody::Unsupported { subtype: MgmtSubtype::AUTH }
        );
    }

    #[test]
    fn unknown_subtype_is_unsupported() {
        assert_variant!(
            MgmtBody::parse(MgmtSubtype::ACTION, &[0u8; 8][..]),
            MgmtBody::Unsupported { subtype: MgmtSubtype::ACTION }
        );
    }
}
