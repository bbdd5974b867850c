// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {thiserror::Error, zerocopy::AsBytes};

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[error("buffer is too small")]
pub struct BufferTooSmall;

/// A growable output buffer that frames and elements are serialized into.
pub trait Appendable {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall>;

    fn bytes_written(&self) -> usize;

    fn can_append(&self, bytes: usize) -> bool;

    fn append_value<T: AsBytes + ?Sized>(&mut self, value: &T) -> Result<(), BufferTooSmall> {
        self.append_bytes(value.as_bytes())
    }

    fn append_byte(&mut self, byte: u8) -> Result<(), BufferTooSmall> {
        self.append_bytes(&[byte])
    }
}

impl Appendable for Vec<u8> {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn bytes_written(&self) -> usize {
        self.len()
    }

    fn can_append(&self, _bytes: usize) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::LE16};

    #[test]
    fn append_to_vec() {
        let mut buf: Vec<u8> = vec![];
        buf.append_byte(1).expect("append byte");
        buf.append_value(&LE16::new(0x0302)).expect("append value");
        buf.append_bytes(&[4, 5]).expect("append bytes");
        assert_eq!(&buf[..], &[1, 2, 3, 4, 5]);
        assert_eq!(buf.bytes_written(), 5);
    }
}
