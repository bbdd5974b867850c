// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        admission::{AdmCtrl, Candidate},
        ban_list::{BanLevel, BanList},
        config::RsnConfig,
        event::RoamingTrigger,
        key::{KeyCategory, KeyType, SecurityKey, MAX_KEYS},
        Error, RsnEvent, RsnTimeout, SecurityContext,
    },
    log::{debug, info, warn},
    std::time::Instant,
    wlan_common::{mac::MacAddr, timer::EventId},
};

#[derive(Debug, Default, Clone)]
struct KeySlot {
    pairwise: Option<SecurityKey>,
    group: Option<SecurityKey>,
}

impl KeySlot {
    fn get_mut(&mut self, category: KeyCategory) -> &mut Option<SecurityKey> {
        match category {
            KeyCategory::Pairwise => &mut self.pairwise,
            KeyCategory::Group => &mut self.group,
        }
    }

    fn is_empty(&self) -> bool {
        self.pairwise.is_none() && self.group.is_none()
    }
}

#[derive(Debug, Default)]
struct RekeyWindows {
    pairwise: Option<Instant>,
    group: Option<Instant>,
}

impl RekeyWindows {
    fn get_mut(&mut self, category: KeyCategory) -> &mut Option<Instant> {
        match category {
            KeyCategory::Pairwise => &mut self.pairwise,
            KeyCategory::Group => &mut self.group,
        }
    }
}

/// Owns the security state of one station: admission control, installed keys, the transmit
/// header reserve, the 802.1X controlled port, and the MIC failure countermeasures.
pub struct KeyManager {
    config: RsnConfig,
    adm_ctrl: AdmCtrl,
    slots: [KeySlot; MAX_KEYS],
    default_key_id: Option<u8>,
    tx_header_reserve: usize,
    rekey_windows: RekeyWindows,
    ban_list: BanList,
    mic_report_wait: Option<EventId>,
    port_open: bool,
}

impl KeyManager {
    pub fn new(config: RsnConfig) -> Self {
        let adm_ctrl = AdmCtrl::new(&config);
        KeyManager {
            config,
            adm_ctrl,
            slots: Default::default(),
            default_key_id: None,
            tx_header_reserve: 0,
            rekey_windows: RekeyWindows::default(),
            ban_list: BanList::new(),
            mic_report_wait: None,
            port_open: false,
        }
    }

    pub fn adm_ctrl(&self) -> &AdmCtrl {
        &self.adm_ctrl
    }

    pub fn adm_ctrl_mut(&mut self) -> &mut AdmCtrl {
        &mut self.adm_ctrl
    }

    /// Ranks the candidate. Fully banned sites are rejected before policy evaluation.
    pub fn eval_site<C: SecurityContext>(&mut self, ctx: &C, candidate: &Candidate) -> u32 {
        if self.ban_list.is_site_banned(&candidate.bssid, ctx.now()) == BanLevel::Full {
            debug!("rejecting banned site {:02x?}", candidate.bssid);
            return 0;
        }
        self.adm_ctrl.eval_site(candidate)
    }

    pub fn set_site<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        candidate: &Candidate,
    ) -> Result<Vec<u8>, Error> {
        if self.ban_list.is_site_banned(&candidate.bssid, ctx.now()) == BanLevel::Full {
            info!("refusing banned site {:02x?}", candidate.bssid);
            return Err(Error::SiteRejected);
        }
        self.adm_ctrl.set_site(ctx, candidate)
    }

    pub fn ban_site<C: SecurityContext>(&mut self, ctx: &C, bssid: MacAddr, level: BanLevel) {
        let duration = match level {
            BanLevel::Full => self.config.full_ban_duration,
            _ => self.config.half_ban_duration,
        };
        self.ban_list.ban_site(bssid, level, ctx.now(), duration);
    }

    pub fn is_site_banned<C: SecurityContext>(&mut self, ctx: &C, bssid: &MacAddr) -> BanLevel {
        self.ban_list.is_site_banned(bssid, ctx.now())
    }

    pub fn default_key_id(&self) -> Option<u8> {
        self.default_key_id
    }

    pub fn tx_header_reserve(&self) -> usize {
        self.tx_header_reserve
    }

    pub fn port_open(&self) -> bool {
        self.port_open
    }

    pub fn installed_key(&self, index: u8, category: KeyCategory) -> Option<&SecurityKey> {
        let slot = self.slots.get(index as usize)?;
        match category {
            KeyCategory::Pairwise => slot.pairwise.as_ref(),
            KeyCategory::Group => slot.group.as_ref(),
        }
    }

    pub fn set_key<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        key: SecurityKey,
    ) -> Result<(), Error> {
        let idx = key.index as usize;
        if idx >= MAX_KEYS {
            return Err(Error::InvalidKeyIndex(key.index));
        }
        if key.key_type == KeyType::Null {
            return Err(Error::NullKey);
        }

        let category = key.category();
        let (index, key_type, is_default) = (key.index, key.key_type, key.is_default);
        let reserve = key_type.cipher_suite(key.len).header_reserve();
        ctx.hw().install_key(&key)?;
        info!("installed {:?} {:?} key at index {}", category, key_type, index);
        *self.slots[idx].get_mut(category) = Some(key);
        *self.rekey_windows.get_mut(category) = Some(ctx.now() + self.config.rekey_window);

        match category {
            KeyCategory::Pairwise => {
                ctx.hw().set_encryption_field_size(reserve)?;
                self.tx_header_reserve = reserve;
            }
            KeyCategory::Group => {
                if let Some(stale) = self.slots[idx].pairwise.as_ref() {
                    debug!("removing stale pairwise key at index {}", index);
                    ctx.hw().remove_key(&stale.removal_descriptor())?;
                    self.slots[idx].pairwise = None;
                }
            }
        }
        if is_default {
            ctx.hw().set_default_key_id(index)?;
            for (i, slot) in self.slots.iter_mut().enumerate() {
                for installed in slot.pairwise.iter_mut().chain(slot.group.iter_mut()) {
                    installed.is_default = i == idx;
                }
            }
            self.default_key_id = Some(index);
        }
        Ok(())
    }

    /// Removes the installed key matching the index and category of `key`. Removing a key that
    /// is not installed does nothing.
    pub fn remove_key<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        key: &SecurityKey,
    ) -> Result<(), Error> {
        let idx = key.index as usize;
        if idx >= MAX_KEYS {
            return Err(Error::InvalidKeyIndex(key.index));
        }
        let installed = match self.slots[idx].get_mut(key.category()).take() {
            Some(installed) => installed,
            None => {
                debug!("no {:?} key installed at index {}", key.category(), key.index);
                return Ok(());
            }
        };
        ctx.hw().remove_key(&installed.removal_descriptor())?;
        if self.default_key_id == Some(key.index) && self.slots[idx].is_empty() {
            self.default_key_id = None;
        }
        Ok(())
    }

    pub fn set_default_key<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        index: u8,
    ) -> Result<(), Error> {
        if index as usize >= MAX_KEYS {
            return Err(Error::InvalidKeyIndex(index));
        }
        ctx.hw().set_default_key_id(index)?;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let is_default = i == index as usize;
            for installed in slot.pairwise.iter_mut().chain(slot.group.iter_mut()) {
                installed.is_default = is_default;
            }
        }
        self.default_key_id = Some(index);
        Ok(())
    }

    /// Opens or closes the 802.1X controlled port for received data.
    pub fn set_port_status<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        open: bool,
    ) -> Result<(), Error> {
        ctx.hw().set_rx_port(open)?;
        self.port_open = open;
        Ok(())
    }

    /// Drops every installed key and closes the port. Used when the connection ends.
    pub fn clear_keys<C: SecurityContext>(&mut self, ctx: &mut C) -> Result<(), Error> {
        for slot in self.slots.iter_mut() {
            for installed in slot.pairwise.take().into_iter().chain(slot.group.take()) {
                ctx.hw().remove_key(&installed.removal_descriptor())?;
            }
        }
        self.default_key_id = None;
        self.tx_header_reserve = 0;
        self.rekey_windows = RekeyWindows::default();
        if let Some(id) = self.mic_report_wait.take() {
            ctx.cancel_timeout(id);
        }
        self.set_port_status(ctx, false)
    }

    fn in_rekey_window(&self, category: KeyCategory, now: Instant) -> bool {
        let deadline = match category {
            KeyCategory::Pairwise => self.rekey_windows.pairwise,
            KeyCategory::Group => self.rekey_windows.group,
        };
        deadline.map_or(false, |deadline| now < deadline)
    }

    /// Handles a MIC failure detected on a received frame. The first failure bans the site for
    /// a while; a second one during that ban starts countermeasures.
    pub fn report_mic_failure<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        category: KeyCategory,
        payload: Vec<u8>,
    ) -> Result<(), Error> {
        let now = ctx.now();
        if self.in_rekey_window(category, now) {
            info!("ignoring {:?} MIC failure during rekey", category);
            return Ok(());
        }
        let bssid = match self.adm_ctrl.site_bssid() {
            Some(bssid) => bssid,
            None => {
                warn!("ignoring {:?} MIC failure without a site", category);
                return Ok(());
            }
        };
        ctx.send_event(RsnEvent::MicFailure { bssid, category, payload });

        match self.ban_list.is_site_banned(&bssid, now) {
            BanLevel::None => {
                warn!("MIC failure from {:02x?}", bssid);
                self.ban_list.ban_site(bssid, BanLevel::Half, now, self.config.half_ban_duration);
            }
            BanLevel::Half | BanLevel::Full => {
                warn!("second MIC failure from {:02x?}; starting countermeasures", bssid);
                self.ban_list.ban_site(bssid, BanLevel::Full, now, self.config.full_ban_duration);
                self.set_port_status(ctx, false)?;
                if let Some(id) = self.mic_report_wait.take() {
                    ctx.cancel_timeout(id);
                }
                let wait = self.config.mic_report_wait;
                self.mic_report_wait =
                    Some(ctx.schedule_timeout(wait, RsnTimeout::MicReportWait));
            }
        }
        Ok(())
    }

    pub fn handle_timeout<C: SecurityContext>(&mut self, ctx: &mut C, timeout: RsnTimeout) {
        match timeout {
            RsnTimeout::MicReportWait => {
                self.mic_report_wait = None;
                info!("MIC failure report sent; leaving the site");
                ctx.send_event(RsnEvent::Roaming(RoamingTrigger::SecurityAttack));
            }
            RsnTimeout::PreAuthComplete => self.adm_ctrl.handle_pre_auth_timeout(ctx),
        }
    }
}
