// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::rsn::{
        akm::Akm,
        cipher::Cipher,
        suite_selector::{self, SuiteSelector, SUITE_SELECTOR_LEN},
    },
    crate::{
        appendable::{Appendable, BufferTooSmall},
        organization::Oui,
        LE16,
    },
    byteorder::{LittleEndian, ReadBytesExt},
    std::io::Cursor,
    thiserror::Error,
};

// The WPA1 IE is not fully specified by IEEE. This format was derived from pcap.
// Note that this file only parses fields specific to WPA -- IE headers and MSFT-specific fields
// are omitted.
// (3B) OUI
pub const OUI: Oui = Oui::MSFT;
// (1B) OUI-specific element type
pub const VENDOR_SPECIFIC_TYPE: u8 = 1;
// (2B) WPA type
pub const WPA_TYPE: u16 = 1;
// (4B) multicast cipher
//     0-2 cipher suite (OUI)
//     3   cipher type
// (2B) unicast cipher count
// (4B x N) unicast cipher list
// (2B) AKM count
// (4B x N) AKM list
// (2B, optional) capabilities, same layout as the RSN capabilities
#[derive(Debug, PartialOrd, PartialEq, Eq, Clone)]
pub struct WpaIe {
    pub multicast_cipher: Cipher,
    pub unicast_cipher_list: Vec<Cipher>,
    pub akm_list: Vec<Akm>,
    pub capabilities: Option<u16>,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("invalid WPA IE; too short")]
    TooShort,
    #[error("invalid WPA IE; unsupported WPA type {0}")]
    UnsupportedType(u16),
    #[error("invalid WPA IE; expected suite selector")]
    ExpectedSuiteSelector,
    #[error("invalid WPA IE; unexpected trailing bytes")]
    TrailingBytes,
}

impl WpaIe {
    const FIXED_FIELDS_LENGTH: usize = 10;

    pub fn len(&self) -> usize {
        let caps_len = if self.capabilities.is_some() { 2 } else { 0 };
        Self::FIXED_FIELDS_LENGTH
            + self.unicast_cipher_list.len() * SUITE_SELECTOR_LEN
            + self.akm_list.len() * SUITE_SELECTOR_LEN
            + caps_len
    }

    pub fn write_into<A: Appendable>(&self, buf: &mut A) -> Result<(), BufferTooSmall> {
        if !buf.can_append(self.len()) {
            return Err(BufferTooSmall);
        }

        buf.append_value(&LE16::new(WPA_TYPE))?;
        self.multicast_cipher.write_into(buf)?;

        buf.append_value(&LE16::new(self.unicast_cipher_list.len() as u16))?;
        for cipher in &self.unicast_cipher_list {
            cipher.write_into(buf)?;
        }

        buf.append_value(&LE16::new(self.akm_list.len() as u16))?;
        for akm in &self.akm_list {
            akm.write_into(buf)?;
        }

        if let Some(caps) = self.capabilities {
            buf.append_value(&LE16::new(caps))?;
        }
        Ok(())
    }
}

fn read_list<T>(rdr: &mut Cursor<&[u8]>) -> Result<Vec<T>, Error>
where
    T: suite_selector::Factory<Suite = T>,
{
    let count = rdr.read_u16::<LittleEndian>().map_err(|_| Error::TooShort)?;
    let mut list = Vec::with_capacity(count as usize);
    for _ in 0..count {
        list.push(suite_selector::read::<T>(rdr).ok_or(Error::ExpectedSuiteSelector)?);
    }
    Ok(list)
}

/// Converts the body of a WPA vendor element, following the OUI and vendor type, into a
/// `WpaIe`. In practice this IE is sometimes zero-padded; an all-zero tail is not mistaken for
/// the capabilities field.
pub fn from_bytes(bytes: &[u8]) -> Result<WpaIe, Error> {
    let mut rdr = Cursor::new(bytes);
    let wpa_type = rdr.read_u16::<LittleEndian>().map_err(|_| Error::TooShort)?;
    if wpa_type != WPA_TYPE {
        return Err(Error::UnsupportedType(wpa_type));
    }
    let multicast_cipher =
        suite_selector::read::<Cipher>(&mut rdr).ok_or(Error::ExpectedSuiteSelector)?;
    let unicast_cipher_list = read_list::<Cipher>(&mut rdr)?;
    let akm_list = read_list::<Akm>(&mut rdr)?;

    let tail = &bytes[rdr.position() as usize..];
    let capabilities = if tail.iter().all(|b| *b == 0) {
        None
    } else if tail.len() >= 2 && tail[2..].iter().all(|b| *b == 0) {
        Some(u16::from_le_bytes([tail[0], tail[1]]))
    } else {
        return Err(Error::TrailingBytes);
    };

    Ok(WpaIe { multicast_cipher, unicast_cipher_list, akm_list, capabilities })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::ie::rsn::{akm, cipher},
    };

    #[rustfmt::skip]
    const DEFAULT_FRAME: [u8; 18] = [
        // WPA version
        0x01, 0x00,
        // Multicast cipher
        0x00, 0x50, 0xf2, 0x02,
        // Unicast cipher list
        0x01, 0x00, 0x00, 0x50, 0xf2, 0x02,
        // AKM list
        0x01, 0x00, 0x00, 0x50, 0xf2, 0x02,
    ];

    fn tkip_psk() -> WpaIe {
        WpaIe {
            multicast_cipher: Cipher::new_msft(cipher::TKIP),
            unicast_cipher_list: vec![Cipher::new_msft(cipher::TKIP)],
            akm_list: vec![Akm::new_msft(akm::PSK)],
            capabilities: None,
        }
    }

    #[test]
    fn test_write_into() {
        let mut wpa_frame_bytes: Vec<u8> = vec![];
        tkip_psk().write_into(&mut wpa_frame_bytes).expect("failed to write frame");
        assert_eq!(&wpa_frame_bytes[..], &DEFAULT_FRAME[..]);
        assert_eq!(tkip_psk().len(), DEFAULT_FRAME.len());
    }

    #[test]
    fn test_parse_correct() {
        let wpa_frame = from_bytes(&DEFAULT_FRAME[..]).expect("valid WPA IE");
        assert_eq!(wpa_frame, tkip_psk());
    }

    #[test]
    fn test_parse_bad_frame() {
        #[rustfmt::skip]
        let bad_frame: Vec<u8> = vec![
            // WPA version
            0x01, 0x00,
            // Multicast cipher
            0x00, 0x50, 0xf2, 0x02,
            // Unicast cipher list (count is incorrect)
            0x16, 0x00, 0x00, 0x50, 0xf2, 0x02,
            // AKM list
            0x01, 0x00, 0x00, 0x50, 0xf2, 0x02,
        ];
        assert_eq!(from_bytes(&bad_frame[..]), Err(Error::ExpectedSuiteSelector));
    }

    #[test]
    fn test_truncated_frame() {
        #[rustfmt::skip]
        let bad_frame: Vec<u8> = vec![
            // WPA version
            0x01, 0x00,
            // Multicast ciph... truncated frame.
            0x00, 0x50
        ];
        assert_eq!(from_bytes(&bad_frame[..]), Err(Error::ExpectedSuiteSelector));
    }

    #[test]
    fn test_parse_with_padding() {
        let mut frame = DEFAULT_FRAME.to_vec();
        frame.resize(DEFAULT_FRAME.len() + 5, 0);
        assert_eq!(from_bytes(&frame[..]), Ok(tkip_psk()));

        frame[DEFAULT_FRAME.len() + 3] = 1;
        assert_eq!(from_bytes(&frame[..]), Err(Error::TrailingBytes));
    }

    #[test]
    fn test_capabilities() {
        let mut frame = DEFAULT_FRAME.to_vec();
        frame.extend_from_slice(&[0x0c, 0x00]);
        let wpa_frame = from_bytes(&frame[..]).expect("valid WPA IE");
        assert_eq!(wpa_frame.capabilities, Some(0x000c));

        let mut buf: Vec<u8> = vec![];
        wpa_frame.write_into(&mut buf).expect("failed to write frame");
        assert_eq!(&buf[..], &frame[..]);
    }

    #[test]
    fn test_unsupported_type() {
        let mut frame = DEFAULT_FRAME.to_vec();
        frame[0] = 2;
        assert_eq!(from_bytes(&frame[..]), Err(Error::UnsupportedType(2)));
    }
}
