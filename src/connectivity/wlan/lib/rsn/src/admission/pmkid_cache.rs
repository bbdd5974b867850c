// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    log::debug,
    wlan_common::{ie::rsn::pmkid::Pmkid, mac::MacAddr},
};

pub const PMKID_CACHE_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmkidEntry {
    pub bssid: MacAddr,
    pub pmkid: Pmkid,
    pub pre_authenticate: bool,
}

/// Ring of PMKIDs for the network identified by `ssid`. Once full, inserts overwrite the oldest
/// slot.
#[derive(Debug, Default)]
pub struct PmkidCache {
    ssid: Vec<u8>,
    entries: Vec<PmkidEntry>,
    next_free_entry: usize,
}

impl PmkidCache {
    pub fn new() -> Self {
        PmkidCache {
            ssid: vec![],
            entries: Vec::with_capacity(PMKID_CACHE_SIZE),
            next_free_entry: 0,
        }
    }

    pub fn ssid(&self) -> &[u8] {
        &self.ssid[..]
    }

    /// Entries cached for another network are dropped when the SSID changes.
    pub fn set_ssid(&mut self, ssid: &[u8]) {
        if self.ssid != ssid {
            if !self.entries.is_empty() {
                debug!("SSID changed; dropping {} cached PMKIDs", self.entries.len());
            }
            self.reset();
            self.ssid = ssid.to_vec();
        }
    }

    pub fn find(&self, bssid: &MacAddr) -> Option<&PmkidEntry> {
        self.entries.iter().find(|e| e.bssid == *bssid)
    }

    pub fn add(&mut self, bssid: MacAddr, pmkid: Pmkid, pre_authenticate: bool) {
        let entry = PmkidEntry { bssid, pmkid, pre_authenticate };
        if let Some(existing) = self.entries.iter_mut().find(|e| e.bssid == bssid) {
            *existing = entry;
            return;
        }
        if self.entries.len() < PMKID_CACHE_SIZE {
            self.entries.push(entry);
        } else {
            self.entries[self.next_free_entry] = entry;
        }
        self.next_free_entry = (self.next_free_entry + 1) % PMKID_CACHE_SIZE;
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.next_free_entry = 0;
    }

    pub fn entries(&self) -> &[PmkidEntry] {
        &self.entries[..]
    }

    pub fn entries_number(&self) -> usize {
        self.entries.len()
    }

    pub fn next_free_entry(&self) -> usize {
        self.next_free_entry
    }
}
