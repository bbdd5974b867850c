// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{RsnEvent, RsnTimeout, SecurityContext},
    log::{debug, info},
    std::{convert::TryFrom, time::Duration},
    wlan_common::{mac::MacAddr, timer::EventId},
};

/// Upper bound on how long a pre-authentication round may run.
pub const MAX_PRE_AUTH_TIMEOUT: Duration = Duration::from_secs(60);

/// Tracks one round of pre-authentication with neighbouring APs. A round ends when every
/// candidate reported completion or when its deadline passes, whichever comes first.
#[derive(Debug, Default)]
pub struct PreAuth {
    pending: Vec<MacAddr>,
    timeout: Option<EventId>,
}

impl PreAuth {
    pub fn is_active(&self) -> bool {
        self.timeout.is_some()
    }

    pub fn start<C: SecurityContext>(
        &mut self,
        ctx: &mut C,
        candidates: &[MacAddr],
        per_candidate: Duration,
    ) {
        if let Some(id) = self.timeout.take() {
            debug!("restarting pre-authentication with {} candidates", candidates.len());
            ctx.cancel_timeout(id);
        }
        self.pending = candidates.to_vec();
        ctx.send_event(RsnEvent::PreAuthCandidates(candidates.to_vec()));
        if candidates.is_empty() {
            ctx.send_event(RsnEvent::PreAuthFinished);
            return;
        }
        let deadline = u32::try_from(candidates.len())
            .ok()
            .and_then(|count| per_candidate.checked_mul(count))
            .map_or(MAX_PRE_AUTH_TIMEOUT, |deadline| deadline.min(MAX_PRE_AUTH_TIMEOUT));
        self.timeout = Some(ctx.schedule_timeout(deadline, RsnTimeout::PreAuthComplete));
    }

    pub fn complete<C: SecurityContext>(&mut self, ctx: &mut C, bssid: &MacAddr) {
        if !self.is_active() {
            return;
        }
        self.pending.retain(|pending| pending != bssid);
        if self.pending.is_empty() {
            if let Some(id) = self.timeout.take() {
                ctx.cancel_timeout(id);
            }
            ctx.send_event(RsnEvent::PreAuthFinished);
        }
    }

    pub fn on_timeout<C: SecurityContext>(&mut self, ctx: &mut C) {
        if self.timeout.take().is_some() {
            info!("pre-authentication timed out with {} candidates pending", self.pending.len());
            self.pending.clear();
            ctx.send_event(RsnEvent::PreAuthFinished);
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::test_utils::FakeContext};

    const A: MacAddr = [1; 6];
    const B: MacAddr = [2; 6];

    #[test]
    fn last_completion_finishes_once() {
        let mut ctx = FakeContext::new();
        let mut pre_auth = PreAuth::default();
        pre_auth.start(&mut ctx, &[A, B], Duration::from_millis(100));
        assert_eq!(ctx.drain_events(), vec![RsnEvent::PreAuthCandidates(vec![A, B])]);
        assert_eq!(ctx.scheduler.pending_count(), 1);

        pre_auth.complete(&mut ctx, &A);
        assert!(ctx.drain_events().is_empty());
        pre_auth.complete(&mut ctx, &B);
        assert_eq!(ctx.drain_events(), vec![RsnEvent::PreAuthFinished]);
        assert_eq!(ctx.scheduler.pending_count(), 0);

        assert!(ctx.advance(Duration::from_millis(200)).is_empty());
        pre_auth.complete(&mut ctx, &B);
        assert!(ctx.drain_events().is_empty());
    }

    #[test]
    fn deadline_scales_with_candidates() {
        let mut ctx = FakeContext::new();
        let mut pre_auth = PreAuth::default();
        pre_auth.start(&mut ctx, &[A, B], Duration::from_millis(100));
        ctx.drain_events();

        assert!(ctx.advance(Duration::from_millis(199)).is_empty());
        let fired = ctx.advance(Duration::from_millis(1));
        assert_eq!(fired, vec![RsnTimeout::PreAuthComplete]);
        pre_auth.on_timeout(&mut ctx);
        assert_eq!(ctx.drain_events(), vec![RsnEvent::PreAuthFinished]);

        pre_auth.on_timeout(&mut ctx);
        assert!(ctx.drain_events().is_empty());
    }

    #[test]
    fn deadline_is_bounded() {
        let mut ctx = FakeContext::new();
        let mut pre_auth = PreAuth::default();
        pre_auth.start(&mut ctx, &[A, B], Duration::from_secs(u64::MAX));
        ctx.drain_events();

        assert!(ctx.advance(MAX_PRE_AUTH_TIMEOUT - Duration::from_millis(1)).is_empty());
        let fired = ctx.advance(Duration::from_millis(1));
        assert_eq!(fired, vec![RsnTimeout::PreAuthComplete]);
    }

    #[test]
    fn no_candidates_finishes_immediately() {
        let mut ctx = FakeContext::new();
        let mut pre_auth = PreAuth::default();
        pre_auth.start(&mut ctx, &[], Duration::from_millis(100));
        assert_eq!(
            ctx.drain_events(),
            vec![RsnEvent::PreAuthCandidates(vec![]), RsnEvent::PreAuthFinished]
        );
        assert!(!pre_auth.is_active());
    }
}
