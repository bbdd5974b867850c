// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::suite::{CipherSuite, NetworkMode};

/// Suites chosen for a site and how well they rank. Higher metrics are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMatch {
    pub unicast: CipherSuite,
    pub broadcast: CipherSuite,
    pub metric: u32,
}

/// Whether the locally configured encryption can operate a suite advertised by the site.
fn supports(encryption: CipherSuite, suite: CipherSuite) -> bool {
    use crate::suite::CipherSuite::*;
    match (encryption, suite) {
        (None, None) => true,
        (Wep40, Wep40) | (Wep40, Wep104) | (Wep104, Wep40) | (Wep104, Wep104) => true,
        (Tkip, Wep40) | (Tkip, Wep104) | (Tkip, Tkip) => true,
        (AesWrap, Wep40) | (AesWrap, Wep104) | (AesWrap, Tkip) | (AesWrap, AesWrap) => true,
        (AesCcmp, Wep40) | (AesCcmp, Wep104) | (AesCcmp, Tkip) | (AesCcmp, AesCcmp) => true,
        _ => false,
    }
}

fn stronger(a: CipherSuite, b: CipherSuite) -> bool {
    match (a.strength(), b.strength()) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

/// Evaluates the (unicast, broadcast) pair advertised by a site against the local encryption.
/// Returns `None` when the pair cannot be used.
pub fn evaluate(
    unicast: CipherSuite,
    broadcast: CipherSuite,
    encryption: CipherSuite,
) -> Option<TableMatch> {
    use crate::suite::CipherSuite::*;
    let matched = |unicast, broadcast, metric| Some(TableMatch { unicast, broadcast, metric });
    match unicast {
        None => match (broadcast, encryption) {
            (None, None) => matched(None, None, 1),
            (b, enc) if b.is_wep() && supports(enc, b) => matched(b, b, 1),
            _ => Option::None,
        },
        Wep40 | Wep104 => {
            if broadcast == unicast && supports(encryption, unicast) {
                matched(unicast, broadcast, 1)
            } else {
                Option::None
            }
        }
        Tkip | AesWrap | AesCcmp => {
            if !supports(encryption, unicast)
                || !supports(encryption, broadcast)
                || broadcast == None
                || stronger(broadcast, unicast)
            {
                return Option::None;
            }
            let metric = match (unicast, broadcast) {
                (AesCcmp, AesCcmp) => 8,
                (Tkip, Tkip) if stronger(encryption, Tkip) => 5,
                (Tkip, Tkip) => 7,
                (AesWrap, AesWrap) => 6,
                (AesCcmp, Tkip) => 6,
                (AesWrap, Tkip) => 5,
                (AesCcmp, b) if b.is_wep() => 4,
                (Tkip, b) if b.is_wep() && stronger(encryption, Tkip) => 2,
                (Tkip, b) if b.is_wep() => 3,
                (AesWrap, b) if b.is_wep() => 3,
                _ => return Option::None,
            };
            matched(unicast, broadcast, metric)
        }
        Ckip | Unknown => Option::None,
    }
}

/// CKIP sites bypass the table: usable only with TKIP encryption and the vendor extension on.
pub fn evaluate_ckip(
    broadcast: CipherSuite,
    encryption: CipherSuite,
    xcc_enabled: bool,
) -> Option<TableMatch> {
    if encryption == CipherSuite::Tkip && xcc_enabled {
        Some(TableMatch { unicast: CipherSuite::Ckip, broadcast, metric: 1 })
    } else {
        None
    }
}

pub fn is_valid_broadcast(mode: NetworkMode, suite: CipherSuite) -> bool {
    use crate::suite::CipherSuite::*;
    match (mode, suite) {
        (_, None) | (_, Tkip) | (_, AesWrap) | (_, AesCcmp) => true,
        (NetworkMode::Infrastructure, Wep40) | (NetworkMode::Infrastructure, Wep104) => true,
        (NetworkMode::Infrastructure, Ckip) => true,
        (NetworkMode::Ibss, Wep40) | (NetworkMode::Ibss, Wep104) | (NetworkMode::Ibss, Ckip) => {
            false
        }
        (_, Unknown) => false,
    }
}
