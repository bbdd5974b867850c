// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        assoc::RequestParams,
        bss::BssDescription,
        config::{PhyMode, StationConfig},
        device::{Band, DeviceOps},
        error::Error,
    },
    wlan_common::{
        appendable::Appendable,
        ie::{self, PowerCapability, RatesWriter},
        mac::{AssocReqHdr, CapabilityInfo, ReassocReqHdr},
    },
    wlan_rsn::suite::{CipherSuite, NetworkMode},
};

/// Transmit power the station can always go down to, in dBm.
const MIN_TX_POWER: i8 = 0;

/// Capability Information the station advertises when joining `site`.
pub fn capability_info<D: DeviceOps>(
    config: &StationConfig,
    device: &D,
    site: &BssDescription,
    params: &RequestParams,
) -> CapabilityInfo {
    let mut cap = CapabilityInfo::from_raw(0);
    match site.candidate().network_mode {
        NetworkMode::Infrastructure => cap.set_ess(true),
        NetworkMode::Ibss => cap.set_ibss(true),
    }
    cap.set_privacy(params.unicast != CipherSuite::None);
    cap.set_short_preamble(config.short_preamble && site.capabilities.short_preamble());
    cap.set_pbcc(config.pbcc);
    cap.set_spectrum_mgmt(spectrum_mgmt(device, site));
    cap.set_short_slot_time(short_slot(config, device, site));
    cap
}

fn spectrum_mgmt<D: DeviceOps>(device: &D, site: &BssDescription) -> bool {
    device.spectrum_mgmt_enabled() && site.capabilities.spectrum_mgmt()
}

// Short slot is only negotiated in 802.11g when no DSSS rate is in use.
fn short_slot<D: DeviceOps>(config: &StationConfig, device: &D, site: &BssDescription) -> bool {
    config.phy_mode == PhyMode::Dot11g
        && device.band() == Band::TwoGhz
        && site.ies.all_rates().iter().all(|rate| !rate.is_dsss())
}

/// Writes the body of an (Re)Association Request for `site`. The body goes out with a
/// reassociation header when `params.current_ap` is set.
pub fn write_request_body<B: Appendable, D: DeviceOps>(
    buf: &mut B,
    config: &StationConfig,
    device: &D,
    site: &BssDescription,
    params: &RequestParams,
) -> Result<(), Error> {
    let cap = capability_info(config, device, site, params);
    match params.current_ap {
        Some(current_ap) => {
            buf.append_value(&ReassocReqHdr::new(cap, config.listen_interval, current_ap))?
        }
        None => buf.append_value(&AssocReqHdr::new(cap, config.listen_interval))?,
    }

    ie::write_ssid(buf, site.ssid())?;

    let rates: Vec<u8> = site
        .ies
        .all_rates()
        .into_iter()
        .filter(|rate| !rate.is_bss_membership_selector())
        .map(|rate| rate.raw())
        .collect();
    let rates_writer = RatesWriter::try_new(&rates[..])?;
    rates_writer.write_supported_rates(buf)?;

    if spectrum_mgmt(device, site) {
        let power_cap =
            PowerCapability { min_tx_power: MIN_TX_POWER, max_tx_power: device.max_tx_power() };
        ie::write_power_capability(buf, &power_cap)?;
    }

    rates_writer.write_ext_supported_rates(buf)?;

    if config.qos_enabled && site.ies.wme.is_some() {
        ie::write_wme_info(buf, config.wme_qos_info)?;
    }

    if !params.security_ie.is_empty() {
        buf.append_bytes(&params.security_ie[..])?;
    }

    if site.ies.ht_capabilities.is_some() && params.unicast != CipherSuite::Tkip {
        if let Some(ht_cap) = device.ht_capabilities() {
            ie::write_ht_capabilities(buf, &ht_cap)?;
        }
    }
    Ok(())
}
