// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    std::{fmt, ops::Deref},
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

/// IEEE organizationally unique identifier.
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(C)]
pub struct Oui([u8; 3]);

impl Oui {
    pub const DOT11: Self = Self([0x00, 0x0F, 0xAC]);
    pub const MSFT: Self = Self([0x00, 0x50, 0xF2]);
    pub const CISCO: Self = Self([0x00, 0x40, 0x96]);

    pub fn new(oui: [u8; 3]) -> Self {
        Self(oui)
    }
}

impl Deref for Oui {
    type Target = [u8; 3];

    fn deref(&self) -> &[u8; 3] {
        &self.0
    }
}

impl fmt::Debug for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{:02x}:{:02x}", self.0[0], self.0[1], self.0[2])
    }
}
