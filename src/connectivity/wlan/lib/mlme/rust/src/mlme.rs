// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        assoc::{AssocInfo, AssocSm, AssocStatus, RequestParams},
        auth::{AuthSm, AuthStatus},
        bss::BssDescription,
        device::DeviceOps,
        error::Error,
        event::{ConnectionEvent, MlmeStatus, ResultCode},
        Context,
    },
    log::{debug, error, info},
    wlan_common::mac::{AssocRespHdr, AuthAlgorithmNumber, AuthHdr, MacAddr, ReasonCode, StatusCode},
    wlan_rsn::{suite::AuthSuite, KeyManager},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlmeState {
    Idle,
    AuthWait,
    AssocWait,
    Associated,
}

/// The site being joined and what was negotiated for it at `start`.
struct Attempt {
    site: BssDescription,
    params: RequestParams,
    /// Shared Key is still allowed to fall back to Open System once.
    fallback_to_open: bool,
}

/// Sequences authentication and association towards one BSS and reports a single outcome
/// per connection attempt.
pub struct Mlme {
    state: MlmeState,
    attempt: Option<Attempt>,
    auth: AuthSm,
    assoc: AssocSm,
}

impl Mlme {
    pub fn new() -> Self {
        Mlme { state: MlmeState::Idle, attempt: None, auth: AuthSm::new(), assoc: AssocSm::new() }
    }

    pub fn state(&self) -> MlmeState {
        self.state
    }

    pub fn assoc_info(&self) -> AssocInfo {
        self.assoc.assoc_info()
    }

    pub fn assoc(&self) -> &AssocSm {
        &self.assoc
    }

    /// The BSS the station is joining or joined.
    pub fn current_bss(&self) -> Option<&BssDescription> {
        self.attempt.as_ref().map(|attempt| &attempt.site)
    }

    /// Commits the key manager to `site` and sends the first authentication frame. An attempt
    /// already in progress is abandoned without notice.
    pub fn start<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        keys: &mut KeyManager,
        site: BssDescription,
        current_ap: Option<MacAddr>,
    ) -> Result<(), Error> {
        let auth_suite = keys.adm_ctrl().auth_suite();
        let (algorithm, fallback_to_open) = match auth_suite {
            AuthSuite::None => return Err(Error::NoAuthType),
            AuthSuite::Open => (AuthAlgorithmNumber::OPEN, false),
            AuthSuite::SharedKey => (AuthAlgorithmNumber::SHARED_KEY, false),
            AuthSuite::AutoSwitch => (AuthAlgorithmNumber::SHARED_KEY, true),
        };
        if self.state != MlmeState::Idle {
            debug!("abandoning connection attempt in state {:?}", self.state);
            self.stop(ctx, false);
        }

        let security_ie = keys.set_site(ctx, &site.candidate())?;
        let (unicast, _) = keys.adm_ctrl().cipher_suite();
        self.auth.start(ctx, site.bssid, algorithm)?;

        info!("joining {:02x?} with {:?} authentication", site.bssid, auth_suite);
        let params = RequestParams { current_ap, security_ie, unicast };
        self.attempt = Some(Attempt { site, params, fallback_to_open });
        self.state = MlmeState::AuthWait;
        Ok(())
    }

    /// Abandons the current attempt or association. Only a Disassociation may be sent, and
    /// only when `send_disassoc` is set.
    pub fn stop<D: DeviceOps>(&mut self, ctx: &mut Context<D>, send_disassoc: bool) {
        self.assoc.stop(ctx, send_disassoc);
        self.auth.stop(ctx);
        self.attempt = None;
        self.state = MlmeState::Idle;
    }

    fn is_current_bss(&self, bssid: MacAddr) -> bool {
        self.attempt.as_ref().map_or(false, |attempt| attempt.site.bssid == bssid)
    }

    pub fn on_auth_frame<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        bssid: MacAddr,
        auth_hdr: &AuthHdr,
        elements: &[u8],
    ) {
        if self.state != MlmeState::AuthWait || !self.is_current_bss(bssid) {
            debug!("ignoring authentication frame from {:02x?}", bssid);
            return;
        }
        let status = self.auth.on_frame(ctx, auth_hdr, elements);
        self.on_auth_status(ctx, status);
    }

    pub fn handle_auth_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        if self.state != MlmeState::AuthWait {
            return;
        }
        let status = self.auth.on_timeout(ctx);
        self.on_auth_status(ctx, status);
    }

    fn on_auth_status<D: DeviceOps>(&mut self, ctx: &mut Context<D>, status: AuthStatus) {
        match status {
            AuthStatus::Pending => (),
            AuthStatus::Success => self.start_assoc(ctx),
            AuthStatus::Rejected(code) => {
                if !self.fall_back_to_open(ctx) {
                    self.finish(ctx, MlmeStatus::refused(code));
                }
            }
            AuthStatus::TimedOut => self.finish(ctx, MlmeStatus::timeout()),
        }
    }

    /// Restarts authentication with Open System after an Auto Switch site refused Shared Key.
    /// Returns false if no fallback is left.
    fn fall_back_to_open<D: DeviceOps>(&mut self, ctx: &mut Context<D>) -> bool {
        let bssid = match self.attempt.as_mut() {
            Some(attempt) if attempt.fallback_to_open => {
                attempt.fallback_to_open = false;
                attempt.site.bssid
            }
            _ => return false,
        };
        info!("shared key refused by {:02x?}; retrying with open system", bssid);
        if let Err(e) = self.auth.start(ctx, bssid, AuthAlgorithmNumber::OPEN) {
            error!("cannot restart authentication: {}", e);
            self.finish(ctx, failure(&e));
        }
        true
    }

    fn start_assoc<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        let result = match self.attempt.as_ref() {
            Some(attempt) => self.assoc.start(ctx, &attempt.site, &attempt.params),
            None => return,
        };
        match result {
            Ok(()) => self.state = MlmeState::AssocWait,
            Err(e) => {
                error!("cannot start association: {}", e);
                self.finish(ctx, failure(&e));
            }
        }
    }

    pub fn on_assoc_resp<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        keys: &mut KeyManager,
        bssid: MacAddr,
        resp_hdr: &AssocRespHdr,
        elements: &[u8],
    ) {
        if self.state != MlmeState::AssocWait {
            debug!("ignoring association response in state {:?}", self.state);
            return;
        }
        let status = match self.attempt.as_ref() {
            Some(attempt) if attempt.site.bssid == bssid => {
                self.assoc.on_response(ctx, keys, &attempt.site, resp_hdr, elements)
            }
            _ => {
                debug!("ignoring association response from {:02x?}", bssid);
                return;
            }
        };
        self.on_assoc_status(ctx, status);
    }

    pub fn handle_assoc_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        if self.state != MlmeState::AssocWait {
            return;
        }
        let status = self.assoc.on_timeout(ctx);
        self.on_assoc_status(ctx, status);
    }

    fn on_assoc_status<D: DeviceOps>(&mut self, ctx: &mut Context<D>, status: AssocStatus) {
        match status {
            AssocStatus::Pending => (),
            AssocStatus::Success { .. } => {
                self.state = MlmeState::Associated;
                ctx.sink.send(ConnectionEvent::MlmeStatus(MlmeStatus::success()));
            }
            AssocStatus::Rejected(code) => self.finish(ctx, MlmeStatus::refused(code)),
            AssocStatus::TimedOut => self.finish(ctx, MlmeStatus::timeout()),
        }
    }

    /// Ends a failed attempt and reports it.
    fn finish<D: DeviceOps>(&mut self, ctx: &mut Context<D>, status: MlmeStatus) {
        info!("connection attempt failed: {:?}", status);
        self.assoc.stop(ctx, false);
        self.auth.stop(ctx);
        self.state = MlmeState::Idle;
        ctx.sink.send(ConnectionEvent::MlmeStatus(status));
    }

    pub fn on_deauth<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        bssid: MacAddr,
        reason: ReasonCode,
    ) {
        if self.state == MlmeState::Idle || !self.is_current_bss(bssid) {
            return;
        }
        info!("deauthenticated by {:02x?}: {:?}", bssid, reason);
        self.stop(ctx, false);
        ctx.sink.send(ConnectionEvent::Deauthenticated { bssid, reason });
    }

    pub fn on_disassoc<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        bssid: MacAddr,
        reason: ReasonCode,
    ) {
        match self.state {
            MlmeState::AssocWait | MlmeState::Associated if self.is_current_bss(bssid) => (),
            _ => return,
        }
        info!("disassociated by {:02x?}: {:?}", bssid, reason);
        self.stop(ctx, false);
        ctx.sink.send(ConnectionEvent::Disassociated { bssid, reason });
    }
}

fn failure(e: &Error) -> MlmeStatus {
    MlmeStatus { status: ResultCode::from(e), code: StatusCode::SUCCESS }
}
