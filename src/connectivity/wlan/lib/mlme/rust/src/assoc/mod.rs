// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

mod builder;

use {
    crate::{
        bss::BssDescription,
        device::{DeviceOps, TxFlags},
        error::Error,
        event::{ConnectionEvent, TimedEvent},
        Context,
    },
    bytes::Bytes,
    log::{debug, info, warn},
    wlan_common::{
        appendable::Appendable,
        ie::parse_ies,
        mac::{
            AssocRespHdr, CapabilityInfo, DisassocHdr, MacAddr, MgmtSubtype, ReasonCode,
            StatusCode, NULL_ADDR,
        },
        timer::EventId,
    },
    wlan_rsn::{suite::CipherSuite, KeyManager},
    zerocopy::AsBytes,
};

pub use builder::{capability_info, write_request_body};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssocStatus {
    Pending,
    Success { aid: u16 },
    Rejected(StatusCode),
    TimedOut,
}

/// What the (Re)Association Request carries beyond the site itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// The AP the station is associated with, if reassociating.
    pub current_ap: Option<MacAddr>,
    /// RSN or WPA element chosen by admission control; empty for open and WEP sites.
    pub security_ie: Vec<u8>,
    pub unicast: CipherSuite,
}

/// The last request sent and response received, as handed to the supplicant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssocInfo {
    pub request: Option<Bytes>,
    pub response: Option<Bytes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Wait,
    Associated,
}

pub struct AssocSm {
    state: State,
    bssid: MacAddr,
    subtype: MgmtSubtype,
    request: Option<Bytes>,
    response: Option<Bytes>,
    retries: u8,
    timeout: Option<EventId>,
    reject_count: u32,
    aid: Option<u16>,
    site_capabilities: Option<CapabilityInfo>,
    qos: bool,
}

impl AssocSm {
    pub fn new() -> Self {
        AssocSm {
            state: State::Idle,
            bssid: NULL_ADDR,
            subtype: MgmtSubtype::ASSOC_REQ,
            request: None,
            response: None,
            retries: 0,
            timeout: None,
            reject_count: 0,
            aid: None,
            site_capabilities: None,
            qos: false,
        }
    }

    pub fn is_associated(&self) -> bool {
        self.state == State::Associated
    }

    /// Number of refused association attempts since the station was created.
    pub fn reject_count(&self) -> u32 {
        self.reject_count
    }

    pub fn aid(&self) -> Option<u16> {
        self.aid
    }

    /// Capability Information the associated AP answered with.
    pub fn site_capabilities(&self) -> Option<CapabilityInfo> {
        self.site_capabilities
    }

    /// Whether QoS is in use on the current association.
    pub fn qos(&self) -> bool {
        self.qos
    }

    pub fn assoc_info(&self) -> AssocInfo {
        AssocInfo { request: self.request.clone(), response: self.response.clone() }
    }

    pub fn start<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        site: &BssDescription,
        params: &RequestParams,
    ) -> Result<(), Error> {
        self.reset(ctx);
        let mut body: Vec<u8> = vec![];
        write_request_body(&mut body, &ctx.config, &ctx.device, site, params)?;
        self.subtype = match params.current_ap {
            Some(_) => MgmtSubtype::REASSOC_REQ,
            None => MgmtSubtype::ASSOC_REQ,
        };
        self.bssid = site.bssid;
        let request = Bytes::from(body);
        ctx.send_mgmt_frame(self.subtype, self.bssid, &request[..], TxFlags::NONE)?;
        self.request = Some(request);
        self.arm_timeout(ctx);
        self.state = State::Wait;
        info!("associating with {:02x?}", self.bssid);
        Ok(())
    }

    pub fn on_response<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        keys: &mut KeyManager,
        site: &BssDescription,
        resp_hdr: &AssocRespHdr,
        elements: &[u8],
    ) -> AssocStatus {
        if self.state != State::Wait {
            debug!("ignoring association response in state {:?}", self.state);
            return AssocStatus::Pending;
        }

        let status = resp_hdr.status_code();
        if !status.is_success() {
            self.reject_count += 1;
            info!("association with {:02x?} refused: {:?}", self.bssid, status);
            if status == StatusCode::DENIED_OTHER_REASON
                || status == StatusCode::UNSUPPORTED_AUTH_ALGORITHM
            {
                ctx.sink.send(ConnectionEvent::AuthFailure { bssid: self.bssid, code: status });
            }
            self.reset(ctx);
            return AssocStatus::Rejected(status);
        }

        let ies = match parse_ies(elements) {
            Ok(ies) => ies,
            Err(e) => {
                warn!("discarding association response: {}", e);
                return AssocStatus::Pending;
            }
        };

        self.cancel_timeout(ctx);
        let aid = resp_hdr.aid();
        if let Err(e) = ctx.device.set_aid(aid) {
            warn!("failed to set AID {}: {}", aid, e);
        }
        let hdr_bytes = resp_hdr.as_bytes();
        let mut response: Vec<u8> = Vec::with_capacity(hdr_bytes.len() + elements.len());
        response.extend_from_slice(hdr_bytes);
        response.extend_from_slice(elements);
        self.response = Some(Bytes::from(response));

        if ies.rsne.is_some() || ies.wpa_ie.is_some() {
            let mut candidate = site.candidate();
            candidate.rsne = ies.rsne.clone();
            candidate.wpa_ie = ies.wpa_ie.clone();
            if let Err(e) = keys.set_site(ctx, &candidate) {
                warn!("security element in association response not accepted: {}", e);
            }
        }

        let capabilities = resp_hdr.capabilities();
        self.site_capabilities = Some(capabilities);
        self.qos = ctx.config.qos_enabled && (capabilities.qos() || ies.wme.is_some());
        self.aid = Some(aid);
        self.retries = 0;
        self.state = State::Associated;
        info!("associated with {:02x?}, aid {}", self.bssid, aid);
        AssocStatus::Success { aid }
    }

    /// Retransmits the buffered request, or gives up on the last allowed timeout.
    pub fn on_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) -> AssocStatus {
        if self.timeout.take().is_none() {
            return AssocStatus::Pending;
        }
        self.retries += 1;
        if self.retries >= ctx.config.assoc_max_retries {
            info!("association with {:02x?} timed out after {} tries", self.bssid, self.retries);
            self.reset(ctx);
            return AssocStatus::TimedOut;
        }
        debug!("association timeout {}; retransmitting", self.retries);
        if let Err(e) = self.resend(ctx) {
            warn!("failed to retransmit association request: {}", e);
        }
        self.arm_timeout(ctx);
        AssocStatus::Pending
    }

    /// Tears the state machine down. A Disassociation is sent only when asked for and the
    /// station is actually associated.
    pub fn stop<D: DeviceOps>(&mut self, ctx: &mut Context<D>, send_disassoc: bool) {
        if send_disassoc && self.state == State::Associated {
            if let Err(e) = self.send_disassoc(ctx) {
                warn!("failed to send disassociation: {}", e);
            }
        }
        self.reset(ctx);
    }

    fn send_disassoc<D: DeviceOps>(&self, ctx: &mut Context<D>) -> Result<(), Error> {
        let mut body: Vec<u8> = vec![];
        body.append_value(&DisassocHdr::new(ReasonCode::LEAVING_NETWORK_DISASSOC))?;
        ctx.send_mgmt_frame(MgmtSubtype::DISASSOC, self.bssid, &body[..], TxFlags::NONE)
    }

    fn resend<D: DeviceOps>(&self, ctx: &mut Context<D>) -> Result<(), Error> {
        match self.request.as_ref() {
            Some(request) => {
                ctx.send_mgmt_frame(self.subtype, self.bssid, &request[..], TxFlags::NONE)
            }
            None => Ok(()),
        }
    }

    fn reset<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        self.cancel_timeout(ctx);
        self.retries = 0;
        self.aid = None;
        self.site_capabilities = None;
        self.qos = false;
        self.state = State::Idle;
    }

    fn arm_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        let timeout = ctx.config.assoc_timeout;
        self.timeout = Some(ctx.timer.schedule_after(timeout, TimedEvent::Assoc));
    }

    fn cancel_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        if let Some(id) = self.timeout.take() {
            ctx.timer.cancel_event(id);
        }
    }
}
