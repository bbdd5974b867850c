// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{table, Candidate, IeFamily, Policy, Selection, Strategy, StrategyKind},
    crate::Error,
    log::debug,
    wlan_common::ie::rsn::pmkid::Pmkid,
};

/// Static WEP keys. Sites do not advertise WEP suites, so the configured pair is evaluated.
pub struct WepStrategy;

impl Strategy for WepStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Wep
    }

    fn evaluate(&self, policy: &Policy, candidate: &Candidate) -> Option<Selection> {
        if candidate.rsne.is_some() || candidate.wpa_ie.is_some() {
            debug!("WEP evaluation of {:02x?} ignores its security IEs", candidate.bssid);
        }
        let m = table::evaluate(policy.unicast, policy.broadcast, policy.unicast)?;
        Some(Selection {
            family: IeFamily::None,
            unicast: m.unicast,
            broadcast: m.broadcast,
            akm: policy.akm,
            metric: m.metric,
        })
    }

    fn info_element(
        &self,
        _policy: &Policy,
        _selection: &Selection,
        _pmkid: Option<Pmkid>,
    ) -> Result<Vec<u8>, Error> {
        Ok(vec![])
    }
}
