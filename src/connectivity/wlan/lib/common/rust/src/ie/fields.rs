// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{LE16, LE32},
    bitfield::bitfield,
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

// IEEE Std 802.11-2016, 9.4.2.3
bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SupportedRate(u8);
    impl Debug;
    pub rate, set_rate: 6, 0;
    pub basic, set_basic: 7;
}

impl SupportedRate {
    pub fn from_raw(raw: u8) -> Self {
        SupportedRate(raw)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }

    /// BSS membership selector values share the rate octet. They announce PHY requirements
    /// (HT, VHT) rather than an actual data rate. IEEE Std 802.11-2016, 9.4.2.3, Table 9-78
    pub fn is_bss_membership_selector(&self) -> bool {
        self.basic() && (self.rate() == 127 || self.rate() == 126)
    }

    /// Rate in units of 500 kb/s.
    pub fn rate_500kbps(&self) -> u8 {
        self.rate()
    }

    /// DSSS and HR/DSSS rates: 1, 2, 5.5 and 11 Mb/s. Every other rate is OFDM or ERP-OFDM.
    pub fn is_dsss(&self) -> bool {
        match self.rate() {
            2 | 4 | 11 | 22 => true,
            _ => false,
        }
    }
}

// IEEE Std 802.11-2016, 9.4.2.5
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct FhParamSet {
    pub dwell_time: LE16,
    pub hop_set: u8,
    pub hop_pattern: u8,
    pub hop_index: u8,
}

// IEEE Std 802.11-2016, 9.4.2.4
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct DsssParamSet {
    pub current_chan: u8,
}

// IEEE Std 802.11-2016, 9.4.2.5 (CF Parameter Set)
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct CfParamSet {
    pub count: u8,
    pub period: u8,
    pub max_duration: LE16,
    pub dur_remaining: LE16,
}

// IEEE Std 802.11-2016, 9.4.2.7
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct IbssParamSet {
    pub atim_window: LE16,
}

// IEEE Std 802.11-2016, 9.4.2.6
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct TimHeader {
    pub dtim_count: u8,
    pub dtim_period: u8,
    pub bmp_ctrl: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tim {
    pub header: TimHeader,
    pub bitmap: Vec<u8>,
}

// IEEE Std 802.11-2016, 9.4.2.9
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct SubbandTriplet {
    pub first_channel: u8,
    pub num_channels: u8,
    pub max_tx_power: i8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Country {
    pub country_code: [u8; 3],
    pub subbands: Vec<SubbandTriplet>,
}

// IEEE Std 802.11-2016, 9.4.2.14
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct PowerConstraint {
    pub local_power_constraint: u8,
}

// IEEE Std 802.11-2016, 9.4.2.15
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct PowerCapability {
    pub min_tx_power: i8,
    pub max_tx_power: i8,
}

// IEEE Std 802.11-2016, 9.4.2.17
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct TpcReport {
    pub tx_power: i8,
    pub link_margin: i8,
}

// IEEE Std 802.11-2016, 9.4.2.19
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct ChannelSwitchAnnouncement {
    pub mode: u8,
    pub new_channel_number: u8,
    pub channel_switch_count: u8,
}

// IEEE Std 802.11-2016, 9.4.2.23
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct Quiet {
    pub count: u8,
    pub period: u8,
    pub duration: LE16,
    pub offset: LE16,
}

// IEEE Std 802.11-2016, 9.4.2.56
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct HtCapabilities {
    pub ht_cap_info: LE16,
    pub ampdu_params: u8,
    pub mcs_set: [u8; 16],
    pub ht_ext_cap: LE16,
    pub txbf_cap: LE32,
    pub asel_cap: u8,
}

// IEEE Std 802.11-2016, 9.4.2.57
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct HtOperation {
    pub primary_channel: u8,
    pub ht_op_info: [u8; 5],
    pub basic_ht_mcs_set: [u8; 16],
}

// IEEE Std 802.11-2016, 9.4.2.35
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct QosCapability {
    pub qos_info: u8,
}
