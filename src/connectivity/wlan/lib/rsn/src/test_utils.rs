// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        admission::Candidate,
        key::SecurityKey,
        suite::{CipherSuite, NetworkMode},
        RsnEvent, RsnTimeout, SecurityContext, SecurityHw,
    },
    anyhow::format_err,
    std::time::{Duration, Instant},
    wlan_common::{
        ie::rsn::{
            akm::{self, Akm},
            cipher::{self, Cipher},
            rsne::Rsne,
        },
        mac::MacAddr,
        test_utils::FakeScheduler,
        timer::{EventId, Timer},
    },
};

/// A protected infrastructure site advertising CCMP-128 and PSK in its RSNE.
pub fn wpa2_psk_candidate(bssid: MacAddr) -> Candidate {
    let mut rsne = Rsne::new();
    rsne.group_data_cipher_suite = Some(Cipher::new_dot11(cipher::CCMP_128));
    rsne.pairwise_cipher_suites = vec![Cipher::new_dot11(cipher::CCMP_128)];
    rsne.akm_suites = vec![Akm::new_dot11(akm::PSK)];
    let mut rsne_bytes: Vec<u8> = vec![];
    rsne.write_into(&mut rsne_bytes).expect("write RSNE");
    Candidate {
        bssid,
        ssid: b"fuchsia".to_vec(),
        privacy: true,
        network_mode: NetworkMode::Infrastructure,
        rsne: Some(rsne_bytes),
        wpa_ie: None,
    }
}

#[derive(Debug, Default)]
pub struct FakeHw {
    pub security_mode: Option<CipherSuite>,
    pub default_key_id: Option<u8>,
    pub installed: Vec<SecurityKey>,
    pub removed: Vec<SecurityKey>,
    pub encryption_field_size: Option<usize>,
    pub rx_port_open: Option<bool>,
    pub fail_install: bool,
    pub fail_security_mode: bool,
}

impl SecurityHw for FakeHw {
    fn set_security_mode(&mut self, mode: CipherSuite) -> Result<(), anyhow::Error> {
        if self.fail_security_mode {
            return Err(format_err!("security mode rejected"));
        }
        self.security_mode = Some(mode);
        Ok(())
    }

    fn set_default_key_id(&mut self, index: u8) -> Result<(), anyhow::Error> {
        self.default_key_id = Some(index);
        Ok(())
    }

    fn install_key(&mut self, key: &SecurityKey) -> Result<(), anyhow::Error> {
        if self.fail_install {
            return Err(format_err!("key table full"));
        }
        self.installed.push(key.clone());
        Ok(())
    }

    fn remove_key(&mut self, key: &SecurityKey) -> Result<(), anyhow::Error> {
        self.removed.push(key.clone());
        Ok(())
    }

    fn set_encryption_field_size(&mut self, size: usize) -> Result<(), anyhow::Error> {
        self.encryption_field_size = Some(size);
        Ok(())
    }

    fn set_rx_port(&mut self, open: bool) -> Result<(), anyhow::Error> {
        self.rx_port_open = Some(open);
        Ok(())
    }
}

pub struct FakeContext {
    pub hw: FakeHw,
    pub events: Vec<RsnEvent>,
    pub scheduler: FakeScheduler,
    pub timer: Timer<RsnTimeout>,
}

impl FakeContext {
    pub fn new() -> Self {
        let scheduler = FakeScheduler::new();
        let timer = Timer::new(Box::new(scheduler.clone()));
        FakeContext { hw: FakeHw::default(), events: vec![], scheduler, timer }
    }

    /// Moves the clock forward and returns the timeouts that fired, earliest first.
    pub fn advance(&mut self, duration: Duration) -> Vec<RsnTimeout> {
        let timer = &mut self.timer;
        self.scheduler.advance(duration).into_iter().filter_map(|id| timer.triggered(&id)).collect()
    }

    pub fn drain_events(&mut self) -> Vec<RsnEvent> {
        std::mem::replace(&mut self.events, vec![])
    }
}

impl SecurityContext for FakeContext {
    fn hw(&mut self) -> &mut dyn SecurityHw {
        &mut self.hw
    }

    fn send_event(&mut self, event: RsnEvent) {
        self.events.push(event);
    }

    fn now(&self) -> Instant {
        self.timer.now()
    }

    fn schedule_timeout(&mut self, after: Duration, timeout: RsnTimeout) -> EventId {
        self.timer.schedule_after(after, timeout)
    }

    fn cancel_timeout(&mut self, id: EventId) {
        self.timer.cancel_event(id);
    }
}
