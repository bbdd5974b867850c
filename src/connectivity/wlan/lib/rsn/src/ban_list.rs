// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    log::info,
    std::time::{Duration, Instant},
    wlan_common::mac::MacAddr,
};

pub const MAX_BANNED_SITES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BanLevel {
    None,
    Half,
    Full,
}

#[derive(Debug, Clone, Copy)]
struct BanEntry {
    bssid: MacAddr,
    level: BanLevel,
    start: Instant,
    duration: Duration,
}

impl BanEntry {
    fn expired(&self, now: Instant) -> bool {
        now >= self.start + self.duration
    }
}

#[derive(Debug, Default)]
pub struct BanList {
    entries: Vec<BanEntry>,
}

impl BanList {
    pub fn new() -> Self {
        BanList { entries: Vec::with_capacity(MAX_BANNED_SITES) }
    }

    pub fn ban_site(&mut self, bssid: MacAddr, level: BanLevel, now: Instant, duration: Duration) {
        let entry = BanEntry { bssid, level, start: now, duration };
        if let Some(existing) = self.entries.iter_mut().find(|e| e.bssid == bssid) {
            *existing = entry;
        } else if self.entries.len() < MAX_BANNED_SITES {
            self.entries.push(entry);
        } else {
            let oldest = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.start)
                .map(|(idx, _)| idx)
                .unwrap_or(0);
            info!("ban list full; replacing entry for {:02x?}", self.entries[oldest].bssid);
            self.entries[oldest] = entry;
        }
    }

    /// Returns the current ban level of the site. Expired entries are dropped first.
    pub fn is_site_banned(&mut self, bssid: &MacAddr, now: Instant) -> BanLevel {
        self.compact(now);
        self.entries.iter().find(|e| e.bssid == *bssid).map_or(BanLevel::None, |e| e.level)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn compact(&mut self, now: Instant) {
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].expired(now) {
                self.entries.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BSSID: MacAddr = [1, 2, 3, 4, 5, 6];

    #[test]
    fn ban_and_expire() {
        let mut list = BanList::new();
        let now = Instant::now();
        list.ban_site(BSSID, BanLevel::Half, now, Duration::from_secs(60));
        assert_eq!(list.is_site_banned(&BSSID, now + Duration::from_secs(59)), BanLevel::Half);
        assert_eq!(list.is_site_banned(&BSSID, now + Duration::from_secs(60)), BanLevel::None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn rebanning_updates_in_place() {
        let mut list = BanList::new();
        let now = Instant::now();
        list.ban_site(BSSID, BanLevel::Half, now, Duration::from_secs(60));
        list.ban_site(BSSID, BanLevel::Full, now + Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(list.len(), 1);
        assert_eq!(list.is_site_banned(&BSSID, now + Duration::from_secs(60)), BanLevel::Full);
    }

    #[test]
    fn full_list_overwrites_oldest() {
        let mut list = BanList::new();
        let now = Instant::now();
        for i in 0..MAX_BANNED_SITES {
            let at = now + Duration::from_millis(i as u64);
            list.ban_site([0, 0, 0, 0, 0, i as u8], BanLevel::Half, at, Duration::from_secs(60));
        }
        let later = now + Duration::from_secs(1);
        list.ban_site(BSSID, BanLevel::Full, later, Duration::from_secs(60));
        assert_eq!(list.len(), MAX_BANNED_SITES);
        assert_eq!(list.is_site_banned(&[0, 0, 0, 0, 0, 0], later), BanLevel::None);
        assert_eq!(list.is_site_banned(&[0, 0, 0, 0, 0, 1], later), BanLevel::Half);
        assert_eq!(list.is_site_banned(&BSSID, later), BanLevel::Full);
    }

    #[test]
    fn compaction_keeps_live_entries() {
        let mut list = BanList::new();
        let now = Instant::now();
        list.ban_site([0; 6], BanLevel::Half, now, Duration::from_secs(1));
        list.ban_site([1; 6], BanLevel::Half, now, Duration::from_secs(10));
        list.ban_site([2; 6], BanLevel::Half, now, Duration::from_secs(1));
        let later = now + Duration::from_secs(2);
        assert_eq!(list.is_site_banned(&[1; 6], later), BanLevel::Half);
        assert_eq!(list.len(), 1);
    }
}
