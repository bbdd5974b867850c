// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        appendable::Appendable,
        error::FrameWriteError,
        ie::{
            write_ext_supported_rates, write_supported_rates, IE_MAX_LEN, SUPPORTED_RATES_MAX_LEN,
        },
    },
    zerocopy::ByteSlice,
};

/// Splits a rate set across the Supported Rates element (first eight rates) and the
/// Extended Supported Rates element (the rest).
pub struct RatesWriter<S>(S);

impl<S: ByteSlice> RatesWriter<S> {
    pub fn try_new(rates: S) -> Result<RatesWriter<S>, FrameWriteError> {
        if rates.len() == 0 {
            Err(FrameWriteError::new_invalid_data("no rates to write"))
        } else if rates.len() > SUPPORTED_RATES_MAX_LEN + IE_MAX_LEN {
            Err(FrameWriteError::new_invalid_data("rates will not fit in elements"))
        } else {
            Ok(RatesWriter(rates))
        }
    }

    pub fn write_supported_rates<B: Appendable>(&self, buf: &mut B) -> Result<(), FrameWriteError> {
        let num_rates = std::cmp::min(self.0.len(), SUPPORTED_RATES_MAX_LEN);
        write_supported_rates(buf, &self.0[..num_rates])
    }

    pub fn write_ext_supported_rates<B: Appendable>(
        &self,
        buf: &mut B,
    ) -> Result<(), FrameWriteError> {
        if self.0.len() > SUPPORTED_RATES_MAX_LEN {
            write_ext_supported_rates(buf, &self.0[SUPPORTED_RATES_MAX_LEN..])
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rates_error() {
        let rates: [u8; 0] = [];
        assert!(RatesWriter::try_new(&rates[..]).is_err());
    }

    #[test]
    fn too_many_rates_error() {
        let rates = [0u8; 1 + SUPPORTED_RATES_MAX_LEN + IE_MAX_LEN];
        assert!(RatesWriter::try_new(&rates[..]).is_err());
    }

    #[test]
    fn rates_fit_in_supp_rates() {
        let rates: Vec<u8> = (0..SUPPORTED_RATES_MAX_LEN as u8).collect();
        let rates_writer = RatesWriter::try_new(&rates[..]).expect("valid RatesWriter");
        let mut buf: Vec<u8> = vec![];
        rates_writer.write_supported_rates(&mut buf).expect("write rates");
        rates_writer.write_ext_supported_rates(&mut buf).expect("write ext rates");
        #[rustfmt::skip]
        let expected = [
            1, 8, // ID and length
            0, 1, 2, 3, 4, 5, 6, 7, // rates
        ];
        assert_eq!(&buf[..], &expected[..]);
    }

    #[test]
    fn rates_span_two_elements() {
        let rates: Vec<u8> = (0..(1 + SUPPORTED_RATES_MAX_LEN as u8)).collect();
        let rates_writer = RatesWriter::try_new(&rates[..]).expect("valid RatesWriter");
        let mut buf: Vec<u8> = vec![];
        rates_writer.write_supported_rates(&mut buf).expect("write rates");
        rates_writer.write_ext_supported_rates(&mut buf).expect("write ext rates");
        #[rustfmt::skip]
        let expected = [
            1, 8, // Supported Rates ID and length
            0, 1, 2, 3, 4, 5, 6, 7,
            50, 1, // Extended Supported Rates ID and length
            8,
        ];
        assert_eq!(&buf[..], &expected[..]);
    }
}
