// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        device::{DeviceOps, TxFlags},
        error::Error,
        event::{ConnectionEvent, TimedEvent},
        Context,
    },
    log::{debug, info, warn},
    wlan_common::{
        appendable::Appendable,
        ie::{parse_ies, write_challenge_text},
        mac::{AuthAlgorithmNumber, AuthHdr, MacAddr, MgmtSubtype, StatusCode, NULL_ADDR},
        timer::EventId,
    },
};

/// Outcome of feeding an event to the authentication state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// No outcome yet; the exchange continues or the event was not for us.
    Pending,
    Success,
    Rejected(StatusCode),
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    /// Waiting for the Open System result or the Shared Key challenge.
    WaitSeq2,
    /// Waiting for the Shared Key result.
    WaitSeq4,
    Authenticated,
}

struct OutstandingFrame {
    body: Vec<u8>,
    flags: TxFlags,
}

/// IEEE Std 802.11-2016, 12.3.3: Open System and Shared Key authentication, client side.
pub struct AuthSm {
    state: State,
    bssid: MacAddr,
    algorithm: AuthAlgorithmNumber,
    retries: u8,
    timeout: Option<EventId>,
    outstanding: Option<OutstandingFrame>,
}

impl AuthSm {
    pub fn new() -> Self {
        AuthSm {
            state: State::Idle,
            bssid: NULL_ADDR,
            algorithm: AuthAlgorithmNumber::OPEN,
            retries: 0,
            timeout: None,
            outstanding: None,
        }
    }

    pub fn algorithm(&self) -> AuthAlgorithmNumber {
        self.algorithm
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == State::Authenticated
    }

    /// Sends the first frame of the exchange. Any exchange in progress is abandoned.
    pub fn start<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        bssid: MacAddr,
        algorithm: AuthAlgorithmNumber,
    ) -> Result<(), Error> {
        self.stop(ctx);
        self.bssid = bssid;
        self.algorithm = algorithm;
        let mut body: Vec<u8> = vec![];
        body.append_value(&AuthHdr::new(algorithm, 1, StatusCode::SUCCESS))?;
        self.send(ctx, body, TxFlags::NONE)?;
        self.arm_timeout(ctx);
        self.state = State::WaitSeq2;
        info!("authenticating with {:02x?} using algorithm {}", bssid, algorithm.0);
        Ok(())
    }

    pub fn stop<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        if let Some(id) = self.timeout.take() {
            ctx.timer.cancel_event(id);
        }
        self.outstanding = None;
        self.retries = 0;
        self.state = State::Idle;
    }

    pub fn on_frame<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        auth_hdr: &AuthHdr,
        elements: &[u8],
    ) -> AuthStatus {
        let expected_seq = match self.state {
            State::WaitSeq2 => 2,
            State::WaitSeq4 => 4,
            State::Idle | State::Authenticated => {
                debug!("ignoring authentication frame in state {:?}", self.state);
                return AuthStatus::Pending;
            }
        };
        if auth_hdr.auth_alg_num() != self.algorithm {
            warn!(
                "authentication algorithm mismatch: sent {}, received {}",
                self.algorithm.0,
                auth_hdr.auth_alg_num().0
            );
            return self.fail(ctx, StatusCode::UNSUPPORTED_AUTH_ALGORITHM);
        }
        let seq = auth_hdr.auth_txn_seq_num();
        if seq != expected_seq {
            debug!("ignoring authentication frame seq {}; expected {}", seq, expected_seq);
            return AuthStatus::Pending;
        }
        let status = auth_hdr.status_code();
        if !status.is_success() {
            return self.fail(ctx, status);
        }

        if self.state == State::WaitSeq2 && self.algorithm == AuthAlgorithmNumber::SHARED_KEY {
            return self.answer_challenge(ctx, elements);
        }
        self.cancel_timeout(ctx);
        self.outstanding = None;
        self.state = State::Authenticated;
        info!("authenticated with {:02x?}", self.bssid);
        AuthStatus::Success
    }

    /// Echoes the challenge text in frame 3. The transport encrypts it with the default WEP
    /// key, which is what proves possession of the key to the AP.
    fn answer_challenge<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        elements: &[u8],
    ) -> AuthStatus {
        let challenge = match parse_ies(elements).map(|ies| ies.challenge_text) {
            Ok(Some(challenge)) => challenge,
            Ok(None) => {
                warn!("shared key challenge missing");
                return self.fail(ctx, StatusCode::CHALLENGE_FAILURE);
            }
            Err(e) => {
                warn!("malformed shared key challenge: {}", e);
                return self.fail(ctx, StatusCode::CHALLENGE_FAILURE);
            }
        };
        let body = match challenge_response(self.algorithm, &challenge[..]) {
            Ok(body) => body,
            Err(e) => {
                warn!("cannot echo shared key challenge: {}", e);
                return self.fail(ctx, StatusCode::CHALLENGE_FAILURE);
            }
        };

        self.cancel_timeout(ctx);
        self.retries = 0;
        if let Err(e) = self.send(ctx, body, TxFlags::PROTECTED) {
            warn!("failed to send shared key challenge response: {}", e);
        }
        self.arm_timeout(ctx);
        self.state = State::WaitSeq4;
        AuthStatus::Pending
    }

    /// Retransmits the outstanding frame, or gives up on the last allowed timeout.
    pub fn on_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) -> AuthStatus {
        if self.timeout.take().is_none() {
            return AuthStatus::Pending;
        }
        self.retries += 1;
        if self.retries >= ctx.config.auth_max_retries {
            info!("authentication with {:02x?} timed out after {} tries", self.bssid, self.retries);
            self.stop(ctx);
            return AuthStatus::TimedOut;
        }
        debug!("authentication timeout {}; retransmitting", self.retries);
        if let Err(e) = self.resend(ctx) {
            warn!("failed to retransmit authentication frame: {}", e);
        }
        self.arm_timeout(ctx);
        AuthStatus::Pending
    }

    fn fail<D: DeviceOps>(&mut self, ctx: &mut Context<D>, code: StatusCode) -> AuthStatus {
        info!("authentication with {:02x?} refused: {:?}", self.bssid, code);
        self.stop(ctx);
        ctx.sink.send(ConnectionEvent::AuthFailure { bssid: self.bssid, code });
        AuthStatus::Rejected(code)
    }

    fn send<D: DeviceOps>(
        &mut self,
        ctx: &mut Context<D>,
        body: Vec<u8>,
        flags: TxFlags,
    ) -> Result<(), Error> {
        self.outstanding = Some(OutstandingFrame { body, flags });
        self.resend(ctx)
    }

    fn resend<D: DeviceOps>(&self, ctx: &mut Context<D>) -> Result<(), Error> {
        match self.outstanding.as_ref() {
            Some(frame) => {
                ctx.send_mgmt_frame(MgmtSubtype::AUTH, self.bssid, &frame.body[..], frame.flags)
            }
            None => Ok(()),
        }
    }

    fn arm_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        let timeout = ctx.config.auth_timeout;
        self.timeout = Some(ctx.timer.schedule_after(timeout, TimedEvent::Auth));
    }

    fn cancel_timeout<D: DeviceOps>(&mut self, ctx: &mut Context<D>) {
        if let Some(id) = self.timeout.take() {
            ctx.timer.cancel_event(id);
        }
    }
}

fn challenge_response(alg: AuthAlgorithmNumber, challenge: &[u8]) -> Result<Vec<u8>, Error> {
    let mut body: Vec<u8> = vec![];
    body.append_value(&AuthHdr::new(alg, 3, StatusCode::SUCCESS))?;
    write_challenge_text(&mut body, challenge)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::{drain_events, expire, fake_context, BSSID},
        std::time::Duration,
        wlan_common::ie::{self, CHALLENGE_TEXT_LEN},
    };

    fn resp(alg: AuthAlgorithmNumber, seq: u16, status: StatusCode) -> AuthHdr {
        AuthHdr::new(alg, seq, status)
    }

    fn challenge_ie() -> Vec<u8> {
        let mut buf: Vec<u8> = vec![];
        ie::write_challenge_text(&mut buf, &[0x5a; CHALLENGE_TEXT_LEN][..]).expect("challenge");
        buf
    }

    #[test]
    fn open_system_success() {
        let (mut ctx, scheduler, mut events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::OPEN).expect("start");
        assert_eq!(ctx.device.last_body(), Some(&[0, 0, 1, 0, 0, 0][..]));
        assert_eq!(ctx.device.wlan_queue[0].2, TxFlags::NONE);
        assert_eq!(scheduler.pending_count(), 1);

        let seq2 = resp(AuthAlgorithmNumber::OPEN, 2, StatusCode::SUCCESS);
        assert_eq!(auth.on_frame(&mut ctx, &seq2, &[]), AuthStatus::Success);
        assert!(auth.is_authenticated());
        assert_eq!(scheduler.pending_count(), 0);
        assert!(drain_events(&mut events).is_empty());
    }

    #[test]
    fn shared_key_echoes_challenge_protected() {
        let (mut ctx, _scheduler, _events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::SHARED_KEY).expect("start");
        assert_eq!(ctx.device.last_body(), Some(&[1, 0, 1, 0, 0, 0][..]));

        let seq2 = resp(AuthAlgorithmNumber::SHARED_KEY, 2, StatusCode::SUCCESS);
        assert_eq!(auth.on_frame(&mut ctx, &seq2, &challenge_ie()[..]), AuthStatus::Pending);
        assert_eq!(ctx.device.wlan_queue.len(), 2);
        let (subtype, _, flags) = &ctx.device.wlan_queue[1];
        assert_eq!(*subtype, MgmtSubtype::AUTH);
        assert!(flags.protected());
        let body = ctx.device.last_body().expect("seq 3");
        assert_eq!(&body[..6], &[1, 0, 3, 0, 0, 0]);
        assert_eq!(&body[6..], &challenge_ie()[..]);

        let seq4 = resp(AuthAlgorithmNumber::SHARED_KEY, 4, StatusCode::SUCCESS);
        assert_eq!(auth.on_frame(&mut ctx, &seq4, &[]), AuthStatus::Success);
    }

    #[test]
    fn shared_key_without_challenge() {
        let (mut ctx, _scheduler, mut events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::SHARED_KEY).expect("start");
        let seq2 = resp(AuthAlgorithmNumber::SHARED_KEY, 2, StatusCode::SUCCESS);
        assert_eq!(
            auth.on_frame(&mut ctx, &seq2, &[]),
            AuthStatus::Rejected(StatusCode::CHALLENGE_FAILURE)
        );
        assert_eq!(
            drain_events(&mut events),
            vec![ConnectionEvent::AuthFailure { bssid: BSSID, code: StatusCode::CHALLENGE_FAILURE }]
        );
    }

    #[test]
    fn refused_status_raises_auth_failure() {
        let (mut ctx, scheduler, mut events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::OPEN).expect("start");
        let refused = resp(AuthAlgorithmNumber::OPEN, 2, StatusCode::REFUSED_REASON_UNSPECIFIED);
        assert_eq!(
            auth.on_frame(&mut ctx, &refused, &[]),
            AuthStatus::Rejected(StatusCode::REFUSED_REASON_UNSPECIFIED)
        );
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(
            drain_events(&mut events),
            vec![ConnectionEvent::AuthFailure {
                bssid: BSSID,
                code: StatusCode::REFUSED_REASON_UNSPECIFIED
            }]
        );
    }

    #[test]
    fn algorithm_mismatch_fails() {
        let (mut ctx, _scheduler, _events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::SHARED_KEY).expect("start");
        let open = resp(AuthAlgorithmNumber::OPEN, 2, StatusCode::SUCCESS);
        assert_eq!(
            auth.on_frame(&mut ctx, &open, &[]),
            AuthStatus::Rejected(StatusCode::UNSUPPORTED_AUTH_ALGORITHM)
        );
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn unexpected_sequence_ignored() {
        let (mut ctx, scheduler, _events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::OPEN).expect("start");
        let seq4 = resp(AuthAlgorithmNumber::OPEN, 4, StatusCode::SUCCESS);
        assert_eq!(auth.on_frame(&mut ctx, &seq4, &[]), AuthStatus::Pending);
        assert_eq!(scheduler.pending_count(), 1);

        let mut idle = AuthSm::new();
        let seq2 = resp(AuthAlgorithmNumber::OPEN, 2, StatusCode::SUCCESS);
        assert_eq!(idle.on_frame(&mut ctx, &seq2, &[]), AuthStatus::Pending);
    }

    #[test]
    fn retries_are_bounded() {
        let (mut ctx, scheduler, mut events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::OPEN).expect("start");

        for sent in 2..=3 {
            let fired = expire(&mut ctx, &scheduler, Duration::from_millis(500));
            assert_eq!(fired, vec![TimedEvent::Auth]);
            assert_eq!(auth.on_timeout(&mut ctx), AuthStatus::Pending);
            assert_eq!(ctx.device.wlan_queue.len(), sent);
        }
        let fired = expire(&mut ctx, &scheduler, Duration::from_millis(500));
        assert_eq!(fired, vec![TimedEvent::Auth]);
        assert_eq!(auth.on_timeout(&mut ctx), AuthStatus::TimedOut);
        assert_eq!(ctx.device.wlan_queue.len(), 3);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(drain_events(&mut events).is_empty());

        assert_eq!(auth.on_timeout(&mut ctx), AuthStatus::Pending);
        assert_eq!(ctx.device.wlan_queue.len(), 3);
    }

    #[test]
    fn challenge_response_resets_retries() {
        let (mut ctx, scheduler, _events) = fake_context();
        let mut auth = AuthSm::new();
        auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::SHARED_KEY).expect("start");
        expire(&mut ctx, &scheduler, Duration::from_millis(500));
        assert_eq!(auth.on_timeout(&mut ctx), AuthStatus::Pending);
        expire(&mut ctx, &scheduler, Duration::from_millis(500));
        assert_eq!(auth.on_timeout(&mut ctx), AuthStatus::Pending);

        let seq2 = resp(AuthAlgorithmNumber::SHARED_KEY, 2, StatusCode::SUCCESS);
        auth.on_frame(&mut ctx, &seq2, &challenge_ie()[..]);
        expire(&mut ctx, &scheduler, Duration::from_millis(500));
        assert_eq!(auth.on_timeout(&mut ctx), AuthStatus::Pending);
        assert!(ctx.device.wlan_queue.last().expect("retransmitted seq 3").2.protected());
    }

    #[test]
    fn send_failure_aborts_start() {
        let (mut ctx, scheduler, _events) = fake_context();
        ctx.device.fail_send = true;
        let mut auth = AuthSm::new();
        assert!(auth.start(&mut ctx, BSSID, AuthAlgorithmNumber::OPEN).is_err());
        assert_eq!(scheduler.pending_count(), 0);
        let seq2 = resp(AuthAlgorithmNumber::OPEN, 2, StatusCode::SUCCESS);
        assert_eq!(auth.on_frame(&mut ctx, &seq2, &[]), AuthStatus::Pending);
    }
}
