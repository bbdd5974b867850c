// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{
        negotiate, pmkid_cache::PmkidCache, Candidate, IeFamily, Policy, Selection, Strategy,
        StrategyKind,
    },
    crate::Error,
    wlan_common::ie::rsn::pmkid::Pmkid,
};

const RSN_ONLY: [IeFamily; 1] = [IeFamily::Rsn];
const RSN_THEN_WPA: [IeFamily; 2] = [IeFamily::Rsn, IeFamily::Wpa];

/// RSN networks. The only strategy that keeps PMKIDs and supports pre-authentication.
pub struct Wpa2Strategy {
    pmkid_cache: PmkidCache,
}

impl Wpa2Strategy {
    pub fn new() -> Self {
        Wpa2Strategy { pmkid_cache: PmkidCache::new() }
    }
}

impl Strategy for Wpa2Strategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Wpa2
    }

    fn evaluate(&self, policy: &Policy, candidate: &Candidate) -> Option<Selection> {
        let families = if policy.wpa_promote.any() { &RSN_THEN_WPA[..] } else { &RSN_ONLY[..] };
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

    fn pmkid_cache(&self) -> Option<&PmkidCache> {
        Some(&self.pmkid_cache)
    }

    fn pmkid_cache_mut(&mut self) -> Option<&mut PmkidCache> {
        Some(&mut self.pmkid_cache)
    }
}
