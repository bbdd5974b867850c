// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::event::ResultCode,
    thiserror::Error,
    wlan_common::{
        appendable::BufferTooSmall,
        error::{FrameParseError, FrameWriteError},
    },
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("provided buffer to small")]
    BufferTooSmall,
    #[error("error parsing frame: {0}")]
    ParsingFrame(#[from] FrameParseError),
    #[error("error writing frame: {0}")]
    WritingFrame(#[from] FrameWriteError),
    #[error("security error: {0}")]
    Rsn(#[from] wlan_rsn::Error),
    #[error("no legacy authentication type configured")]
    NoAuthType,
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<BufferTooSmall> for Error {
    fn from(_: BufferTooSmall) -> Self {
        Error::BufferTooSmall
    }
}

impl From<&Error> for ResultCode {
    fn from(e: &Error) -> Self {
        match e {
            Error::Rsn(wlan_rsn::Error::SiteRejected) => ResultCode::Refused,
            Error::NoAuthType => ResultCode::NotSupported,
            _ => ResultCode::InternalError,
        }
    }
}
