// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{table, Candidate, IeFamily, Policy, Selection, Strategy, StrategyKind},
    crate::{suite::CipherSuite, Error},
    wlan_common::ie::rsn::pmkid::Pmkid,
};

/// Open networks without any protection.
pub struct NoneStrategy;

impl Strategy for NoneStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::None
    }

    fn evaluate(&self, policy: &Policy, _candidate: &Candidate) -> Option<Selection> {
        let m = table::evaluate(CipherSuite::None, CipherSuite::None, CipherSuite::None)?;
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
