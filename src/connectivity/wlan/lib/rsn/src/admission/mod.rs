// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Admission control decides whether a candidate site is acceptable under the configured
//! security policy, ranks acceptable sites, and produces the security element for the
//! (re)association request once a site is chosen.

mod negotiate;
mod none;
pub mod pmkid_cache;
mod pre_auth;
pub mod table;
mod wep;
mod wpa;
mod wpa2;

use {
    crate::{
        config::{ReplayCounters, RsnConfig, WpaPromoteFlags},
        event::PaeConfig,
        suite::{AkmSuite, AuthSuite, CipherSuite, ExternalAuthMode, NetworkMode},
        Error, RsnEvent, SecurityContext,
    },
    log::{debug, info},
    pmkid_cache::{PmkidCache, PmkidEntry},
    pre_auth::PreAuth,
    std::time::Duration,
    wlan_common::{
        ie::{rsn::pmkid::Pmkid, ParsedIes},
        mac::{CapabilityInfo, MacAddr},
    },
};

/// A site as seen by admission control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub bssid: MacAddr,
    pub ssid: Vec<u8>,
    pub privacy: bool,
    pub network_mode: NetworkMode,
    /// Complete RSN element, header included.
    pub rsne: Option<Vec<u8>>,
    /// Body of the WPA vendor element following the OUI and vendor type.
    pub wpa_ie: Option<Vec<u8>>,
}

impl Candidate {
    pub fn from_ies(bssid: MacAddr, capabilities: CapabilityInfo, ies: &ParsedIes) -> Self {
        Candidate {
            bssid,
            ssid: ies.ssid.clone().unwrap_or_default(),
            privacy: capabilities.privacy(),
            network_mode: if capabilities.ibss() {
                NetworkMode::Ibss
            } else {
                NetworkMode::Infrastructure
            },
            rsne: ies.rsne.clone(),
            wpa_ie: ies.wpa_ie.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IeFamily {
    None,
    Rsn,
    Wpa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    None,
    Wep,
    Wpa,
    Wpa2,
}

impl StrategyKind {
    fn for_mode(mode: ExternalAuthMode, unicast: CipherSuite) -> Self {
        match mode {
            ExternalAuthMode::Open | ExternalAuthMode::SharedKey | ExternalAuthMode::AutoSwitch => {
                if unicast == CipherSuite::None {
                    StrategyKind::None
                } else {
                    StrategyKind::Wep
                }
            }
            ExternalAuthMode::Wpa | ExternalAuthMode::WpaPsk | ExternalAuthMode::WpaNone => {
                StrategyKind::Wpa
            }
            ExternalAuthMode::Wpa2 | ExternalAuthMode::Wpa2Psk => StrategyKind::Wpa2,
        }
    }

    fn primary_family(&self) -> IeFamily {
        match self {
            StrategyKind::None | StrategyKind::Wep => IeFamily::None,
            StrategyKind::Wpa => IeFamily::Wpa,
            StrategyKind::Wpa2 => IeFamily::Rsn,
        }
    }

    fn default_suites(&self, unicast: CipherSuite) -> (CipherSuite, CipherSuite) {
        match self {
            StrategyKind::None => (CipherSuite::None, CipherSuite::None),
            StrategyKind::Wep if unicast == CipherSuite::Wep104 => {
                (CipherSuite::Wep104, CipherSuite::Wep104)
            }
            StrategyKind::Wep => (CipherSuite::Wep40, CipherSuite::Wep40),
            StrategyKind::Wpa => (CipherSuite::Tkip, CipherSuite::Tkip),
            StrategyKind::Wpa2 => (CipherSuite::AesCcmp, CipherSuite::AesCcmp),
        }
    }
}

/// The admission control context every strategy evaluates against.
#[derive(Debug, Clone)]
pub struct Policy {
    pub network_mode: NetworkMode,
    pub auth_suite: AuthSuite,
    pub external_auth_mode: ExternalAuthMode,
    pub unicast: CipherSuite,
    pub broadcast: CipherSuite,
    pub akm: AkmSuite,
    pub mixed_mode: bool,
    pub wpa_promote: WpaPromoteFlags,
    pub pre_auth_enabled: bool,
    pub pre_auth_timeout: Duration,
    pub xcc_enabled: bool,
    pub replay_counters: Option<ReplayCounters>,
}

impl From<&RsnConfig> for Policy {
    fn from(config: &RsnConfig) -> Self {
        Policy {
            network_mode: config.network_mode,
            auth_suite: config.auth_suite,
            external_auth_mode: config.external_auth_mode,
            unicast: config.unicast_suite,
            broadcast: config.broadcast_suite,
            akm: config.external_auth_mode.akm(),
            mixed_mode: config.mixed_mode,
            wpa_promote: config.wpa_promote,
            pre_auth_enabled: config.pre_auth_enabled,
            pre_auth_timeout: config.pre_auth_timeout,
            xcc_enabled: config.xcc_enabled,
            replay_counters: config.replay_counters,
        }
    }
}

/// Suites negotiated with a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub family: IeFamily,
    pub unicast: CipherSuite,
    pub broadcast: CipherSuite,
    pub akm: AkmSuite,
    pub metric: u32,
}

pub trait Strategy: Send {
    fn kind(&self) -> StrategyKind;

    /// Returns the best usable suites for the candidate, or `None` to reject it.
    fn evaluate(&self, policy: &Policy, candidate: &Candidate) -> Option<Selection>;

    /// Security element for a (re)association request; empty when none is carried.
    fn info_element(
        &self,
        policy: &Policy,
        selection: &Selection,
        pmkid: Option<Pmkid>,
    ) -> Result<Vec<u8>, Error>;

    fn pmkid_cache(&self) -> Option<&PmkidCache> {
        None
    }

    fn pmkid_cache_mut(&mut self) -> Option<&mut PmkidCache> {
        None
    }
}

fn new_strategy(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::None => Box::new(none::NoneStrategy),
        StrategyKind::Wep => Box::new(wep::WepStrategy),
        StrategyKind::Wpa => Box::new(wpa::WpaStrategy),
        StrategyKind::Wpa2 => Box::new(wpa2::Wpa2Strategy::new()),
    }
}

#[derive(Debug, Clone, Copy)]
struct CommittedSite {
    bssid: MacAddr,
    selection: Selection,
}

pub struct AdmCtrl {
    policy: Policy,
    strategy: Box<dyn Strategy>,
    site: Option<CommittedSite>,
    pre_auth: PreAuth,
}

impl AdmCtrl {
    pub fn new(config: &RsnConfig) -> Self {
        let policy = Policy::from(config);
        let kind = StrategyKind::for_mode(policy.external_auth_mode, policy.unicast);
        let strategy = new_strategy(kind);
        let mut adm_ctrl = AdmCtrl { policy, strategy, site: None, pre_auth: PreAuth::default() };
        adm_ctrl.apply_mode(config.external_auth_mode);
        adm_ctrl
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn site_bssid(&self) -> Option<MacAddr> {
        self.site.map(|site| site.bssid)
    }

    pub fn external_auth_mode(&self) -> ExternalAuthMode {
        self.policy.external_auth_mode
    }

    pub fn akm(&self) -> AkmSuite {
        self.site.map_or(self.policy.akm, |site| site.selection.akm)
    }

    /// Switches to the given external authentication mode and announces the result to the
    /// port access entity.
    pub fn configure<C: SecurityContext>(&mut self, ctx: &mut C, mode: ExternalAuthMode) {
        self.apply_mode(mode);
        self.push_pae_config(ctx);
    }

    fn apply_mode(&mut self, mode: ExternalAuthMode) {
        let kind = StrategyKind::for_mode(mode, self.policy.unicast);
        if mode != self.policy.external_auth_mode || kind != self.strategy.kind() {
            info!("security mode {:?} -> {:?} ({:?})", self.policy.external_auth_mode, mode, kind);
        }
        self.policy.external_auth_mode = mode;
        self.policy.akm = mode.akm();
        self.policy.auth_suite = match mode {
            ExternalAuthMode::SharedKey => AuthSuite::SharedKey,
            ExternalAuthMode::AutoSwitch => AuthSuite::AutoSwitch,
            _ => AuthSuite::Open,
        };
        let (unicast, broadcast) = kind.default_suites(self.policy.unicast);
        self.policy.unicast = unicast;
        self.policy.broadcast = broadcast;
        self.strategy = new_strategy(kind);
        self.site = None;
    }

    /// Rebuilds the strategy after a suite change. The PMKID cache survives when the strategy
    /// kind does not change.
    fn reconfigure<C: SecurityContext>(&mut self, ctx: &mut C) {
        let kind = StrategyKind::for_mode(self.policy.external_auth_mode, self.policy.unicast);
        if kind != self.strategy.kind() {
            self.strategy = new_strategy(kind);
        }
        self.site = None;
        self.push_pae_config(ctx);
    }

    fn push_pae_config<C: SecurityContext>(&self, ctx: &mut C) {
        let (unicast, broadcast) = self.cipher_suite();
        ctx.send_event(RsnEvent::PaeConfig(PaeConfig {
            auth_protocol: self.policy.external_auth_mode,
            unicast,
            broadcast,
            akm: self.akm(),
        }));
    }

    fn select(&self, candidate: &Candidate) -> Option<Selection> {
        let expect_privacy = self.policy.unicast != CipherSuite::None;
        if !self.policy.mixed_mode && candidate.privacy != expect_privacy {
            debug!(
                "rejecting {:02x?}: privacy {} but {:?} configured",
                candidate.bssid, candidate.privacy, self.policy.unicast
            );
            return None;
        }
        self.strategy.evaluate(&self.policy, candidate)
    }

    /// Ranks the candidate. Zero rejects it; higher is better.
    pub fn eval_site(&self, candidate: &Candidate) -> u32 {
        self.select(candidate).map_or(0, |selection| selection.metric)
    }

    /// Commits to the candidate and returns the security element for the association request.
    /// A rejected site leaves the context untouched.
    pub fn set_site<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        candidate: &Candidate,
    ) -> Result<Vec<u8>, Error> {
        let selection = match self.select(candidate) {
            Some(selection) => selection,
            None => {
                let kind = self.strategy.kind();
                info!("site {:02x?} rejected by {:?} policy", candidate.bssid, kind);
                return Err(Error::SiteRejected);
            }
        };
        let pmkid = self
            .strategy
            .pmkid_cache()
            .filter(|cache| cache.ssid() == &candidate.ssid[..])
            .and_then(|cache| cache.find(&candidate.bssid))
            .map(|entry| entry.pmkid);
        let ie = self.strategy.info_element(&self.policy, &selection, pmkid)?;
        ctx.hw().set_security_mode(selection.unicast)?;
        if let Some(cache) = self.strategy.pmkid_cache_mut() {
            cache.set_ssid(&candidate.ssid[..]);
        }
        self.site = Some(CommittedSite { bssid: candidate.bssid, selection });
        self.push_pae_config(ctx);
        Ok(ie)
    }

    fn cached_pmkid(&self, bssid: &MacAddr) -> Option<Pmkid> {
        self.strategy.pmkid_cache().and_then(|cache| cache.find(bssid)).map(|entry| entry.pmkid)
    }

    /// Security element for the committed site, or for the configured suites if no site has
    /// been chosen yet.
    pub fn info_element(&self) -> Result<Vec<u8>, Error> {
        match self.site {
            Some(site) => self.strategy.info_element(
                &self.policy,
                &site.selection,
                self.cached_pmkid(&site.bssid),
            ),
            None => {
                let selection = Selection {
                    family: self.strategy.kind().primary_family(),
                    unicast: self.policy.unicast,
                    broadcast: self.policy.broadcast,
                    akm: self.policy.akm,
                    metric: 0,
                };
                self.strategy.info_element(&self.policy, &selection, None)
            }
        }
    }

    /// Active (unicast, broadcast) suites: those negotiated with the committed site, else the
    /// configured ones.
    pub fn cipher_suite(&self) -> (CipherSuite, CipherSuite) {
        match self.site {
            Some(site) => (site.selection.unicast, site.selection.broadcast),
            None => (self.policy.unicast, self.policy.broadcast),
        }
    }

    fn suites_valid(&self, unicast: CipherSuite, broadcast: CipherSuite) -> bool {
        if self.policy.external_auth_mode.is_legacy()
            && unicast != CipherSuite::None
            && !unicast.is_wep()
        {
            return false;
        }
        if unicast == CipherSuite::Ckip {
            return self.policy.xcc_enabled;
        }
        table::evaluate(unicast, broadcast, unicast).is_some()
    }

    pub fn set_unicast_suite<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        suite: CipherSuite,
    ) -> Result<(), Error> {
        let legacy = self.policy.external_auth_mode.is_legacy();
        let broadcast = if legacy { suite } else { self.policy.broadcast };
        if !self.suites_valid(suite, broadcast) {
            return Err(Error::InvalidUnicastSuite(suite));
        }
        let mode = self.policy.network_mode;
        if !table::is_valid_broadcast(mode, broadcast) {
            return Err(Error::InvalidBroadcastSuite(broadcast, mode));
        }
        self.policy.unicast = suite;
        self.policy.broadcast = broadcast;
        self.reconfigure(ctx);
        Ok(())
    }

    pub fn set_broadcast_suite<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        suite: CipherSuite,
    ) -> Result<(), Error> {
        let mode = self.policy.network_mode;
        if !table::is_valid_broadcast(mode, suite) || !self.suites_valid(self.policy.unicast, suite)
        {
            return Err(Error::InvalidBroadcastSuite(suite, mode));
        }
        self.policy.broadcast = suite;
        self.reconfigure(ctx);
        Ok(())
    }

    pub fn auth_suite(&self) -> AuthSuite {
        self.policy.auth_suite
    }

    /// Selects the legacy authentication algorithm. In a legacy mode this also switches the
    /// external authentication mode to match.
    pub fn set_auth_suite<C: SecurityContext>(&mut self, ctx: &mut C, suite: AuthSuite) {
        if self.policy.external_auth_mode.is_legacy() {
            let mode = match suite {
                AuthSuite::SharedKey => ExternalAuthMode::SharedKey,
                AuthSuite::AutoSwitch => ExternalAuthMode::AutoSwitch,
                AuthSuite::Open | AuthSuite::None => ExternalAuthMode::Open,
            };
            self.configure(ctx, mode);
        }
        self.policy.auth_suite = suite;
    }

    pub fn mixed_mode(&self) -> bool {
        self.policy.mixed_mode
    }

    pub fn set_mixed_mode<C: SecurityContext>(&mut self, ctx: &mut C, mixed_mode: bool) {
        self.policy.mixed_mode = mixed_mode;
        self.reconfigure(ctx);
    }

    pub fn network_mode(&self) -> NetworkMode {
        self.policy.network_mode
    }

    pub fn set_network_mode(&mut self, mode: NetworkMode) {
        self.policy.network_mode = mode;
        self.site = None;
    }

    pub fn pmkid_list(&self) -> Result<Vec<PmkidEntry>, Error> {
        let cache = self.strategy.pmkid_cache().ok_or(Error::FeatureNotAvailable)?;
        Ok(cache.entries().to_vec())
    }

    /// Loads PMKIDs supplied by the supplicant for the network `ssid`.
    pub fn set_pmkid_list(&mut self, ssid: &[u8], entries: &[PmkidEntry]) -> Result<(), Error> {
        let cache = self.strategy.pmkid_cache_mut().ok_or(Error::FeatureNotAvailable)?;
        cache.set_ssid(ssid);
        for entry in entries {
            cache.add(entry.bssid, entry.pmkid, entry.pre_authenticate);
        }
        Ok(())
    }

    pub fn reset_pmkid_list(&mut self) -> Result<(), Error> {
        let cache = self.strategy.pmkid_cache_mut().ok_or(Error::FeatureNotAvailable)?;
        cache.reset();
        Ok(())
    }

    /// Whether a PMKID is already cached for the BSSID.
    pub fn pre_auth_status(&self, bssid: &MacAddr) -> Result<bool, Error> {
        let cache = self.strategy.pmkid_cache().ok_or(Error::FeatureNotAvailable)?;
        Ok(cache.find(bssid).is_some())
    }

    pub fn start_pre_auth<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        candidates: &[MacAddr],
    ) -> Result<(), Error> {
        if self.strategy.pmkid_cache().is_none() || !self.policy.pre_auth_enabled {
            return Err(Error::FeatureNotAvailable);
        }
        self.pre_auth.start(ctx, candidates, self.policy.pre_auth_timeout);
        Ok(())
    }

    pub fn pre_auth_complete<C: SecurityContext>(&mut self, ctx: &mut C, bssid: &MacAddr) {
        self.pre_auth.complete(ctx, bssid);
    }

    pub fn handle_pre_auth_timeout<C: SecurityContext>(&mut self, ctx: &mut C) {
        self.pre_auth.on_timeout(ctx);
    }
}
