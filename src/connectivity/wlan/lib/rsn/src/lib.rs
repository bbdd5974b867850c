// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Station-side security policy: admission control over candidate sites, the security IE
//! placed in (re)association requests, key installation, and MIC failure countermeasures.

pub mod admission;
pub mod ban_list;
pub mod config;
pub mod event;
pub mod key;
pub mod key_manager;
pub mod suite;
#[cfg(test)]
pub mod test_utils;

pub use {
    admission::{AdmCtrl, Candidate},
    config::RsnConfig,
    event::{RsnEvent, RsnTimeout},
    key_manager::KeyManager,
};

use {
    crate::{
        key::SecurityKey,
        suite::{CipherSuite, NetworkMode},
    },
    std::time::{Duration, Instant},
    thiserror::Error,
    wlan_common::{
        error::FrameWriteError,
        ie::{rsn::rsne, wpa},
        timer::EventId,
    },
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("site rejected by admission control")]
    SiteRejected,
    #[error("invalid key index {0}; at most 4 keys are supported")]
    InvalidKeyIndex(u8),
    #[error("refusing to install a null key")]
    NullKey,
    #[error("operation not available in the current security mode")]
    FeatureNotAvailable,
    #[error("invalid unicast cipher suite {0:?}")]
    InvalidUnicastSuite(CipherSuite),
    #[error("invalid broadcast cipher suite {0:?} in {1:?} mode")]
    InvalidBroadcastSuite(CipherSuite, NetworkMode),
    #[error("invalid RSNE: {0}")]
    InvalidRsne(#[from] rsne::Error),
    #[error("invalid WPA IE: {0}")]
    InvalidWpaIe(#[from] wpa::Error),
    #[error("error writing security IE: {0}")]
    WritingIe(#[from] FrameWriteError),
    #[error("hardware error: {0}")]
    Hardware(#[from] anyhow::Error),
}

/// The security engine of the device. Every call is a fire-and-forget configuration command;
/// failures are reported but never retried here.
pub trait SecurityHw {
    fn set_security_mode(&mut self, mode: CipherSuite) -> Result<(), anyhow::Error>;
    fn set_default_key_id(&mut self, index: u8) -> Result<(), anyhow::Error>;
    fn install_key(&mut self, key: &SecurityKey) -> Result<(), anyhow::Error>;
    fn remove_key(&mut self, key: &SecurityKey) -> Result<(), anyhow::Error>;
    fn set_encryption_field_size(&mut self, size: usize) -> Result<(), anyhow::Error>;
    fn set_rx_port(&mut self, open: bool) -> Result<(), anyhow::Error>;
}

/// Collaborators borrowed for the duration of a single call into the security core.
pub trait SecurityContext {
    fn hw(&mut self) -> &mut dyn SecurityHw;
    fn send_event(&mut self, event: RsnEvent);
    fn now(&self) -> Instant;
    fn schedule_timeout(&mut self, after: Duration, timeout: RsnTimeout) -> EventId;
    fn cancel_timeout(&mut self, id: EventId);
}
