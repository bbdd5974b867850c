// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{Header, Id},
    crate::{buffer_reader::BufferReader, error::FrameParseError},
    std::mem::size_of,
    zerocopy::ByteSlice,
};

/// Iterates over a chain of information elements. An element whose declared length runs past
/// the end of the buffer is reported once as `TruncatedIe`, after which iteration stops. A
/// single trailing byte that cannot hold a header is ignored.
pub struct Reader<B> {
    reader: BufferReader<B>,
    done: bool,
}

impl<B: ByteSlice> Reader<B> {
    pub fn new(bytes: B) -> Self {
        Reader { reader: BufferReader::new(bytes), done: false }
    }
}

impl<B: ByteSlice> Iterator for Reader<B> {
    type Item = Result<(Id, B), FrameParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (id, body_len) = match self.reader.peek::<Header>() {
            Some(header) => (header.id, header.body_len as usize),
            None => {
                self.done = true;
                return None;
            }
        };
        let remaining = self.reader.bytes_remaining() - size_of::<Header>();
        if remaining < body_len {
            self.done = true;
            return Some(Err(FrameParseError::TruncatedIe {
                id: id.0,
                declared: body_len,
                remaining,
            }));
        }
        let body = self
            .reader
            .read::<Header>()
            .and_then(|_| self.reader.read_bytes(body_len));
        match body {
            Some(body) => Some(Ok((id, body))),
            None => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn empty() {
        assert!(Reader::new(&[][..]).next().is_none());
    }

    #[test]
    pub fn less_than_header() {
        assert!(Reader::new(&[0][..]).next().is_none());
    }

    #[test]
    pub fn body_too_short() {
        let mut reader = Reader::new(&[0, 2, 10][..]);
        assert_eq!(
            reader.next(),
            Some(Err(FrameParseError::TruncatedIe { id: 0, declared: 2, remaining: 1 }))
        );
        assert_eq!(reader.next(), None);
    }

    #[test]
    pub fn empty_body() {
        let elems: Vec<_> = Reader::new(&[0, 0][..]).collect();
        assert_eq!(&[Ok((Id::SSID, &[][..]))], &elems[..]);
    }

    #[test]
    pub fn two_elements() {
        let bytes = vec![0, 2, 10, 20, 1, 3, 11, 22, 33];
        let elems: Vec<_> = Reader::new(&bytes[..]).collect();
        assert_eq!(
            &[Ok((Id::SSID, &[10, 20][..])), Ok((Id::SUPPORTED_RATES, &[11, 22, 33][..]))],
            &elems[..]
        );
    }

    #[test]
    pub fn truncated_after_valid_element() {
        let bytes = vec![0, 1, 10, 48, 20, 1, 0];
        let elems: Vec<_> = Reader::new(&bytes[..]).collect();
        assert_eq!(
            &[
                Ok((Id::SSID, &[10][..])),
                Err(FrameParseError::TruncatedIe { id: 48, declared: 20, remaining: 2 }),
            ],
            &elems[..]
        );
    }
}
