// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Shared building blocks for the station security and association core: the 802.11
//! management frame codec (MAC header, fixed management fields, information elements), buffer
//! helpers, a timer abstraction, and the unbounded event sink used to report upwards.

pub mod appendable;
pub mod buffer_reader;
pub mod error;
pub mod ie;
pub mod mac;
pub mod organization;
pub mod sink;
pub mod test_utils;
pub mod timer;

pub use zerocopy::byteorder::{LittleEndian, U16, U32, U64};

/// Little-endian wire integers. Fields of packed frame structs use these so that parsing and
/// writing is independent of the host byte order.
pub type LE16 = U16<LittleEndian>;
pub type LE32 = U32<LittleEndian>;
pub type LE64 = U64<LittleEndian>;

#[macro_export]
macro_rules! assert_variant {
    ($test:expr, $variant:pat => $e:expr, $fmt:expr $(, $args:tt)* $(,)?) => {
        match $test {
            $variant => $e,
            other => panic!("unexpected variant: {:?}; {}", other, format!($fmt $(, $args)*)),
        }
    };
    ($test:expr, $variant:pat => $e:expr $(,)?) => {
        match $test {
            $variant => $e,
            other => panic!("unexpected variant: {:?}", other),
        }
    };
    ($test:expr, $variant:pat $(,)?) => {
        $crate::assert_variant!($test, $variant => {})
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug)]
    enum Foo {
        A(u8),
        B,
    }

    #[test]
    fn assert_variant_extracts_value() {
        let value = assert_variant!(Foo::A(7), Foo::A(v) => v);
        assert_eq!(value, 7);
        assert_variant!(Foo::B, Foo::B);
    }

    #[test]
    #[should_panic(expected = "unexpected variant")]
    fn assert_variant_panics_on_mismatch() {
        assert_variant!(Foo::B, Foo::A(_));
    }
}
