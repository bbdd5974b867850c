// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! This crate implements the station side of 802.11 connection establishment: the
//! authentication and association state machines, the MLME that sequences them, and the
//! `Station` that ties them to the security core in `wlan-rsn`.
//!
//! Every entry point of a `Station` takes `&mut self`. A station is driven from a single event
//! loop which feeds it received frames and expired timeouts.

pub mod assoc;
pub mod auth;
pub mod bss;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod mlme;

pub use wlan_common as common;

use {
    crate::{
        assoc::AssocInfo,
        bss::BssDescription,
        config::StationConfig,
        device::{DeviceOps, TxFlags},
        error::Error,
        event::{ConnectionEvent, TimedEvent},
        mlme::{Mlme, MlmeState},
    },
    log::{debug, warn},
    std::time::{Duration, Instant},
    wlan_common::{
        appendable::Appendable,
        mac::{MacAddr, MgmtBody, MgmtFrame, MgmtHdr, MgmtSubtype, BCAST_ADDR, MGMT_HDR_LEN},
        sink::UnboundedSink,
        timer::{EventId, Scheduler, Timer},
    },
    wlan_rsn::{
        admission::pmkid_cache::PmkidEntry,
        key::{KeyCategory, SecurityKey},
        suite::{AuthSuite, CipherSuite, ExternalAuthMode},
        KeyManager, RsnConfig, RsnEvent, RsnTimeout, SecurityContext, SecurityHw,
    },
};

/// Collaborators shared by the state machines of one station.
pub struct Context<D> {
    pub config: StationConfig,
    pub device: D,
    pub timer: Timer<TimedEvent>,
    pub sink: UnboundedSink<ConnectionEvent>,
}

impl<D: DeviceOps> Context<D> {
    /// Prepends a management header addressed to `bssid` and hands the frame to the device.
    pub fn send_mgmt_frame(
        &mut self,
        subtype: MgmtSubtype,
        bssid: MacAddr,
        body: &[u8],
        flags: TxFlags,
    ) -> Result<(), Error> {
        let mut buf: Vec<u8> = Vec::with_capacity(MGMT_HDR_LEN + body.len());
        buf.append_value(&MgmtHdr::new(subtype, bssid, self.device.sta_addr(), bssid))?;
        buf.append_bytes(body)?;
        self.device.send_mgmt_frame(subtype, buf, flags)?;
        Ok(())
    }
}

impl<D: DeviceOps> SecurityContext for Context<D> {
    fn hw(&mut self) -> &mut dyn SecurityHw {
        &mut self.device
    }

    fn send_event(&mut self, event: RsnEvent) {
        self.sink.send(ConnectionEvent::Rsn(event));
    }

    fn now(&self) -> Instant {
        self.timer.now()
    }

    fn schedule_timeout(&mut self, after: Duration, timeout: RsnTimeout) -> EventId {
        self.timer.schedule_after(after, timeout.into())
    }

    fn cancel_timeout(&mut self, id: EventId) {
        self.timer.cancel_event(id);
    }
}

/// A client station: the MLME and the key manager of one interface, plus the collaborators
/// they share.
pub struct Station<D> {
    ctx: Context<D>,
    mlme: Mlme,
    keys: KeyManager,
}

impl<D: DeviceOps> Station<D> {
    pub fn new(
        config: StationConfig,
        rsn_config: RsnConfig,
        device: D,
        scheduler: Box<dyn Scheduler + Send>,
        sink: UnboundedSink<ConnectionEvent>,
    ) -> Self {
        let ctx = Context { config, device, timer: Timer::new(scheduler), sink };
        Station { ctx, mlme: Mlme::new(), keys: KeyManager::new(rsn_config) }
    }

    pub fn context(&self) -> &Context<D> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context<D> {
        &mut self.ctx
    }

    pub fn mlme_state(&self) -> MlmeState {
        self.mlme.state()
    }

    pub fn key_manager(&self) -> &KeyManager {
        &self.keys
    }

    pub fn assoc_info(&self) -> AssocInfo {
        self.mlme.assoc_info()
    }

    pub fn configure_security(&mut self, mode: ExternalAuthMode) {
        self.keys.adm_ctrl_mut().configure(&mut self.ctx, mode);
    }

    pub fn set_auth_suite(&mut self, suite: AuthSuite) {
        self.keys.adm_ctrl_mut().set_auth_suite(&mut self.ctx, suite);
    }

    pub fn set_unicast_suite(&mut self, suite: CipherSuite) -> Result<(), Error> {
        Ok(self.keys.adm_ctrl_mut().set_unicast_suite(&mut self.ctx, suite)?)
    }

    pub fn set_broadcast_suite(&mut self, suite: CipherSuite) -> Result<(), Error> {
        Ok(self.keys.adm_ctrl_mut().set_broadcast_suite(&mut self.ctx, suite)?)
    }

    pub fn set_mixed_mode(&mut self, mixed_mode: bool) {
        self.keys.adm_ctrl_mut().set_mixed_mode(&mut self.ctx, mixed_mode);
    }

    pub fn pmkid_list(&self) -> Result<Vec<PmkidEntry>, Error> {
        Ok(self.keys.adm_ctrl().pmkid_list()?)
    }

    pub fn set_pmkid_list(&mut self, ssid: &[u8], entries: &[PmkidEntry]) -> Result<(), Error> {
        Ok(self.keys.adm_ctrl_mut().set_pmkid_list(ssid, entries)?)
    }

    pub fn start_pre_auth(&mut self, candidates: &[MacAddr]) -> Result<(), Error> {
        Ok(self.keys.adm_ctrl_mut().start_pre_auth(&mut self.ctx, candidates)?)
    }

    pub fn pre_auth_complete(&mut self, bssid: &MacAddr) {
        self.keys.adm_ctrl_mut().pre_auth_complete(&mut self.ctx, bssid);
    }

    /// Ranks a scanned BSS for connection. Zero means the BSS must not be joined.
    pub fn eval_candidate(&mut self, bss: &BssDescription) -> u32 {
        self.keys.eval_site(&self.ctx, &bss.candidate())
    }

    /// Commits to `bss` and starts authentication. With `current_ap` set the station
    /// reassociates from that AP.
    pub fn connect(
        &mut self,
        bss: BssDescription,
        current_ap: Option<MacAddr>,
    ) -> Result<(), Error> {
        self.mlme.start(&mut self.ctx, &mut self.keys, bss, current_ap)
    }

    /// Leaves the current BSS and drops every installed key.
    pub fn disconnect(&mut self, send_disassoc: bool) -> Result<(), Error> {
        self.mlme.stop(&mut self.ctx, send_disassoc);
        Ok(self.keys.clear_keys(&mut self.ctx)?)
    }

    pub fn set_key(&mut self, key: SecurityKey) -> Result<(), Error> {
        Ok(self.keys.set_key(&mut self.ctx, key)?)
    }

    pub fn remove_key(&mut self, key: &SecurityKey) -> Result<(), Error> {
        Ok(self.keys.remove_key(&mut self.ctx, key)?)
    }

    pub fn set_default_key(&mut self, index: u8) -> Result<(), Error> {
        Ok(self.keys.set_default_key(&mut self.ctx, index)?)
    }

    pub fn set_port_status(&mut self, open: bool) -> Result<(), Error> {
        Ok(self.keys.set_port_status(&mut self.ctx, open)?)
    }

    /// Reports a MIC failure detected by the receive path.
    pub fn report_mic_failure(
        &mut self,
        category: KeyCategory,
        payload: Vec<u8>,
    ) -> Result<(), Error> {
        Ok(self.keys.report_mic_failure(&mut self.ctx, category, payload)?)
    }

    pub fn handle_mac_frame_rx(&mut self, bytes: &[u8]) {
        let frame = match MgmtFrame::parse(bytes) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("discarding frame: {}", e);
                return;
            }
        };
        let bssid = frame.mgmt_hdr.bssid();
        let dst = frame.mgmt_hdr.addr1;
        if dst != self.ctx.device.sta_addr() && dst != BCAST_ADDR {
            return;
        }
        match frame.into_body() {
            MgmtBody::Authentication { auth_hdr, elements } => {
                self.mlme.on_auth_frame(&mut self.ctx, bssid, &auth_hdr, elements)
            }
            MgmtBody::AssociationResp { assoc_resp_hdr, elements }
            | MgmtBody::ReassociationResp { assoc_resp_hdr, elements } => self.mlme.on_assoc_resp(
                &mut self.ctx,
                &mut self.keys,
                bssid,
                &assoc_resp_hdr,
                elements,
            ),
            MgmtBody::Deauthentication { deauth_hdr, .. } => {
                self.mlme.on_deauth(&mut self.ctx, bssid, deauth_hdr.reason_code())
            }
            MgmtBody::Disassociation { disassoc_hdr, .. } => {
                self.mlme.on_disassoc(&mut self.ctx, bssid, disassoc_hdr.reason_code())
            }
            MgmtBody::Beacon { .. } | MgmtBody::ProbeResp { .. } => {}
            MgmtBody::Unsupported { subtype } => {
                debug!("ignoring management frame of subtype {:?}", subtype)
            }
        }
    }

    pub fn handle_timeout(&mut self, event_id: EventId) {
        match self.ctx.timer.triggered(&event_id) {
            Some(TimedEvent::Auth) => self.mlme.handle_auth_timeout(&mut self.ctx),
            Some(TimedEvent::Assoc) => self.mlme.handle_assoc_timeout(&mut self.ctx),
            Some(TimedEvent::Rsn(timeout)) => self.keys.handle_timeout(&mut self.ctx, timeout),
            None => warn!("timeout {:?} is not scheduled", event_id),
        }
    }
}
