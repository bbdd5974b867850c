// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{appendable::{Appendable, BufferTooSmall}, organization::Oui},
    byteorder::ReadBytesExt,
    std::io::{Cursor, Read},
};

pub const SUITE_SELECTOR_LEN: usize = 4;

pub trait Factory {
    type Suite;

    fn new(oui: Oui, suite_type: u8) -> Self::Suite;
}

/// A four byte suite selector: an OUI followed by a suite type.
pub trait SuiteSelector {
    fn oui(&self) -> Oui;

    fn suite_type(&self) -> u8;

    fn write_into<A: Appendable>(&self, buf: &mut A) -> Result<(), BufferTooSmall> {
        buf.append_bytes(&self.oui()[..])?;
        buf.append_byte(self.suite_type())
    }
}

/// Reads a suite selector, or returns `None` if fewer than four bytes remain.
pub fn read<T>(rdr: &mut Cursor<&[u8]>) -> Option<T>
where
    T: Factory<Suite = T>,
{
    let remaining = rdr.get_ref().len().saturating_sub(rdr.position() as usize);
    if remaining < SUITE_SELECTOR_LEN {
        return None;
    }
    let mut oui = [0u8; 3];
    rdr.read_exact(&mut oui).ok()?;
    let suite_type = rdr.read_u8().ok()?;
    Some(T::new(Oui::new(oui), suite_type))
}
