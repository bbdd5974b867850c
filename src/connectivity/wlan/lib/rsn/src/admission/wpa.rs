// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{negotiate, Candidate, IeFamily, Policy, Selection, Strategy, StrategyKind},
    crate::Error,
    wlan_common::ie::rsn::pmkid::Pmkid,
};

const WPA_ONLY: [IeFamily; 1] = [IeFamily::Wpa];
const RSN_THEN_WPA: [IeFamily; 2] = [IeFamily::Rsn, IeFamily::Wpa];

/// WPA (vendor element) networks. Promotion lets an RSN site through, preferring its RSNE.
pub struct WpaStrategy;

impl Strategy for WpaStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Wpa
    }

    fn evaluate(&self, policy: &Policy, candidate: &Candidate) -> Option<Selection> {
        let families = if policy.wpa_promote.any() { &RSN_THEN_WPA[..] } else { &WPA_ONLY[..] };
        negotiate::evaluate_families(policy, families, candidate)
    }

    fn info_element(
        &self,
        policy: &Policy,
        selection: &Selection,
        pmkid: Option<Pmkid>,
    ) -> Result<Vec<u8>, Error> {
        negotiate::build_ie(policy, selection, pmkid)
    }
}
