//! The standard building-floor design: one core switch, a configurable
//! number of access switches dual-homed to it, and access points hanging
//! off access-switch ports.

use crate::config::{Config, OOB_SUBNET};
use crate::design::Design;
use crate::device::{roles, InterfaceProfile, InterfaceUpdate};
use crate::error::DesignError;
use crate::ip::Subnet;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};

/// Build a complete design from a validated configuration
pub fn build_std_design(config: &Config) -> Result<Design> {
    let general = &config.general;
    let network = &config.network;
    let (bld, flr) = (general.building, general.floor);

    info!("Building design '{}'", general.name);
    let mut design = Design::new(&general.name, general.net_id, config.native_vlan());

    // Address plan
    design.plan.add(Subnet::new(OOB_SUBNET, config.oob_network()?))?;
    for vlan in &config.vlans {
        if let Some(subnet) = vlan.network()? {
            design.plan.add(Subnet::new(&vlan.name, subnet).with_vlan(vlan.id))?;
        }
    }

    // Devices
    let core = design.add_device("core01", roles::core_switch(1, bld, flr)?)?;
    let mut access = Vec::new();
    for id in 1..=config.devices.access_switches {
        let hostname = design.add_device(&format!("acc{:02}", id), roles::access_switch(id, bld, flr)?)?;
        access.push(hostname);
    }

    // Access ports
    for port in &config.access_ports {
        let vlan = config.vlan(port.vlan).ok_or_else(|| DesignError::UnknownSubnet {
            name: format!("VLAN {}", port.vlan),
        })?;
        let mut update = InterfaceUpdate::new().profile(InterfaceProfile::Access { kind: port.profile, vlan });
        if let Some(desc) = &port.desc {
            update = update.desc(desc.clone());
        }
        let switch = access_switch(&access, port.access_switch)?;
        design.inventory.get_mut(switch)?.update(&port.port, update)?;
        debug!("{} {} -> {:?}", switch, port.port, port.profile);
    }

    // Cabling
    for switch in &access {
        design
            .cabling
            .build_uplink_to_core(&mut design.inventory, switch, &core)
            .wrap_err_with(|| format!("Failed to uplink {} to {}", switch, core))?;
    }

    for (index, ap) in config.devices.access_points.iter().enumerate() {
        let ordinal = index as u32 + 1;
        let vlans = ap.vlans.iter().filter_map(|id| config.vlan(*id)).collect();
        let hostname = design.add_device(
            &format!("ap{:02}", ordinal),
            roles::access_point(ordinal, bld, flr, config.native_vlan(), vlans)?,
        )?;
        let switch = access_switch(&access, ap.access_switch)?;
        design
            .cabling
            .build_ap_uplink(&mut design.inventory, &hostname, switch, &ap.port)
            .wrap_err_with(|| format!("Failed to attach {} to {}:{}", hostname, switch, ap.port))?;
    }

    // Management addressing: core first, then each access switch in order
    design.set_mgmt_ipaddr(
        &core,
        network.core_host_offset,
        network.oob_block_prefix,
        network.mgmt_prefix_len,
    )?;
    for (index, switch) in access.iter().enumerate() {
        let offset = network.core_host_offset + index as u32 + 1;
        design.set_mgmt_ipaddr(switch, offset, network.oob_block_prefix, network.mgmt_prefix_len)?;
    }

    // Routed VLANs terminate on the core
    let svis = design.create_vlan_interfaces(&core, network.svi_host_offset)?;

    info!(
        "Design '{}': {} devices, {} cables, {} SVIs",
        design.name,
        design.inventory.len(),
        design.cabling.cables().len(),
        svis.len()
    );
    Ok(design)
}

/// Hostname of the access switch with the given 1-based ordinal
fn access_switch(access: &[String], ordinal: u32) -> Result<&str, DesignError> {
    ordinal
        .checked_sub(1)
        .and_then(|index| access.get(index as usize))
        .map(String::as_str)
        .ok_or(DesignError::InvalidOrdinal { ordinal })
}
