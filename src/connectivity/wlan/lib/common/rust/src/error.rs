// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {crate::appendable::BufferTooSmall, thiserror::Error};

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FrameParseError {
    #[error("frame too short; need {expected} bytes but got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u16),
    #[error("not a management frame; frame type {0}")]
    NotManagement(u16),
    #[error("element {id} declares {declared} bytes but only {remaining} bytes remain")]
    TruncatedIe { id: u8, declared: usize, remaining: usize },
    #[error("malformed {0}")]
    Malformed(&'static str),
}

pub type FrameParseResult<T> = Result<T, FrameParseError>;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FrameWriteError {
    #[error("buffer is too small")]
    BufferTooSmall,
    #[error("error writing frame: {0}")]
    InvalidData(String),
}

impl FrameWriteError {
    pub fn new_invalid_data<S: Into<String>>(debug_message: S) -> Self {
        FrameWriteError::InvalidData(debug_message.into())
    }
}

impl From<BufferTooSmall> for FrameWriteError {
    fn from(_: BufferTooSmall) -> Self {
        FrameWriteError::BufferTooSmall
    }
}
