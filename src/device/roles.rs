//! Role builder functions.
//!
//! Each role has a declarative port table listing the interfaces a device of
//! that role owns and the profile each one starts with. Tables are built
//! fresh for every device, so changes to one design's devices never leak into
//! another design.

use super::types::{Device, Interface, InterfaceProfile, Role};
use crate::error::DesignError;
use crate::vlan::VlanProfile;

/// Front-panel data ports on the cEOS-8 device type
pub const CEOS_DATA_PORTS: u32 = 8;

/// Management interface on cEOS devices
pub const MGMT_PORT: &str = "Management0";

/// Access-switch ports cabled to the core, in order
pub const ACCESS_UPLINK_PORTS: [&str; 2] = ["Ethernet7", "Ethernet8"];

/// Wired uplink on an access point
pub const AP_UPLINK_PORT: &str = "wired0";

/// Port table shared by every cEOS-8 device: management plus eight data ports
fn ceos8_port_table() -> Vec<Interface> {
    let mut ports = vec![Interface::new(MGMT_PORT).with_profile(InterfaceProfile::Management { address: None })];
    ports.extend((1..=CEOS_DATA_PORTS).map(|n| Interface::new(format!("Ethernet{}", n))));
    ports
}

/// Core switch aggregating the floor's access switches
pub fn core_switch(dev_id: u32, bld_id: u32, flr_id: u32) -> Result<Device, DesignError> {
    Device::new(Role::Core, dev_id, bld_id, flr_id, ceos8_port_table())
}

/// Access switch; its uplinks are `Ethernet7` and `Ethernet8`
pub fn access_switch(dev_id: u32, bld_id: u32, flr_id: u32) -> Result<Device, DesignError> {
    Device::new(Role::Access, dev_id, bld_id, flr_id, ceos8_port_table())
}

/// Floor access point. The wired port is a fixed trunk carrying the SSID
/// VLANs, so the switch it attaches to can learn them from the peer.
pub fn access_point(
    dev_id: u32,
    bld_id: u32,
    flr_id: u32,
    native_vlan: Option<VlanProfile>,
    vlans: Vec<VlanProfile>,
) -> Result<Device, DesignError> {
    let wired = Interface::new(AP_UPLINK_PORT).with_profile(InterfaceProfile::ApTrunk { native_vlan, vlans });
    Device::new(Role::AccessPoint, dev_id, bld_id, flr_id, vec![wired])
}
