//! # Design aggregate
//!
//! A `Design` owns everything produced while evaluating one building-floor
//! description: the device inventory, the cable registry, the subnet plan
//! and the interface address book. Nothing is shared between designs, so
//! several can be built side by side from the same configuration layer.
//!
//! ## Build order
//!
//! 1. Subnets are added to the address plan
//! 2. Devices are created from their role port tables
//! 3. Access ports get their profiles
//! 4. The cabling planner wires uplinks and access points
//! 5. Management addresses are carved from the design's OOB block
//! 6. SVIs are created on the core for every routed VLAN it carries
//!
//! `standard::build_std_design` runs these steps from a `Config`.

pub mod inventory;
pub mod standard;

pub use inventory::Inventory;
pub use standard::build_std_design;

use crate::config::OOB_SUBNET;
use crate::device::roles::MGMT_PORT;
use crate::device::{Device, InterfaceProfile, InterfaceUpdate};
use crate::error::DesignError;
use crate::ip::{carve, AddressAssignment, AddressBook, AddressPlan};
use crate::topology::{CablingPlanner, TopologyGraph, TopologyGraphBuilder};
use crate::vlan::{device_vlans, VlanProfile};
use std::collections::BTreeMap;

/// One evaluated building-floor design
#[derive(Debug, Clone)]
pub struct Design {
    pub name: String,
    pub net_id: u32,
    pub inventory: Inventory,
    pub cabling: CablingPlanner,
    pub plan: AddressPlan,
    pub addresses: AddressBook,
    /// Short names (`core01`, `acc02`, ...) to hostnames
    pub nicknames: BTreeMap<String, String>,
}

impl Design {
    pub fn new(name: impl Into<String>, net_id: u32, native_vlan: Option<VlanProfile>) -> Self {
        let name = name.into();
        Self {
            plan: AddressPlan::new(name.clone()),
            name,
            net_id,
            inventory: Inventory::new(),
            cabling: CablingPlanner::new(native_vlan),
            addresses: AddressBook::new(),
            nicknames: BTreeMap::new(),
        }
    }

    /// Add a device under a nickname and return its hostname
    pub fn add_device(&mut self, nickname: &str, device: Device) -> Result<String, DesignError> {
        let hostname = self.inventory.add(device)?;
        self.nicknames.insert(nickname.to_string(), hostname.clone());
        Ok(hostname)
    }

    /// Look a device up by nickname or hostname
    pub fn device(&self, name: &str) -> Result<&Device, DesignError> {
        let hostname = self.nicknames.get(name).map(String::as_str).unwrap_or(name);
        self.inventory.get(hostname)
    }

    /// Assign the management address at `host_offset` inside this design's
    /// OOB block. The block is the `net_id`-th `/block_prefix` of the OOB
    /// subnet; the interface itself is addressed with `prefix_len`.
    pub fn set_mgmt_ipaddr(
        &mut self,
        device: &str,
        host_offset: u32,
        block_prefix: u8,
        prefix_len: u8,
    ) -> Result<AddressAssignment, DesignError> {
        let oob = self.plan.get(OOB_SUBNET).ok_or_else(|| DesignError::UnknownSubnet {
            name: OOB_SUBNET.to_string(),
        })?;
        let block = carve(oob.network, block_prefix, self.net_id)?;

        // Fail on a missing device or port before recording the address
        self.inventory.get(device)?.interface(MGMT_PORT)?;

        let assignment = self
            .addresses
            .assign(device, MGMT_PORT, OOB_SUBNET, block, host_offset, prefix_len)?;

        let dev = self.inventory.get_mut(device)?;
        dev.update(
            MGMT_PORT,
            InterfaceUpdate::new().profile(InterfaceProfile::Management {
                address: Some(assignment.address),
            }),
        )?;
        dev.set_primary_ip(assignment.address.ip());

        log::info!("{} {} -> {}", device, MGMT_PORT, assignment.address);
        Ok(assignment)
    }

    /// Create a `Vlan<id>` SVI on `device` for every VLAN it carries that has
    /// a subnet in the plan, addressed at `host_offset` in that subnet.
    pub fn create_vlan_interfaces(
        &mut self,
        device: &str,
        host_offset: u32,
    ) -> Result<Vec<AddressAssignment>, DesignError> {
        let vlans = device_vlans(&self.inventory, &self.cabling, device)?;
        let mut assignments = Vec::new();

        for vlan in vlans {
            let Some(subnet) = self.plan.by_vlan(vlan.id) else {
                continue;
            };
            let if_name = format!("Vlan{}", vlan.id);
            let assignment = self.addresses.assign(
                device,
                &if_name,
                &subnet.name,
                subnet.network,
                host_offset,
                subnet.network.prefix(),
            )?;

            let dev = self.inventory.get_mut(device)?;
            dev.ensure_interface(&if_name);
            dev.update(
                &if_name,
                InterfaceUpdate::new().desc(vlan.name.clone()).profile(InterfaceProfile::Svi {
                    vlan,
                    address: assignment.address,
                }),
            )?;

            log::info!("{} {} -> {}", device, if_name, assignment.address);
            assignments.push(assignment);
        }
        Ok(assignments)
    }

    /// Classify every emulated interface for rendering
    pub fn topology_graph(&self) -> Result<TopologyGraph, DesignError> {
        TopologyGraphBuilder::new(&self.inventory).build(&self.cabling.cables())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::roles;
    use crate::ip::Subnet;

    fn design_with_oob(net_id: u32) -> Design {
        let mut design = Design::new("b1_f1", net_id, None);
        design
            .plan
            .add(Subnet::new(OOB_SUBNET, "172.20.20.0/24".parse().unwrap()))
            .unwrap();
        design.add_device("core01", roles::core_switch(1, 1, 1).unwrap()).unwrap();
        design.add_device("acc01", roles::access_switch(1, 1, 1).unwrap()).unwrap();
        design
    }

    #[test]
    fn test_mgmt_addresses_in_first_block() {
        let mut design = design_with_oob(1);
        let core = design.set_mgmt_ipaddr("core01.11", 2, 28, 24).unwrap();
        let acc = design.set_mgmt_ipaddr("acc01.11", 3, 28, 24).unwrap();

        assert_eq!(core.address.to_string(), "172.20.20.2/24");
        assert_eq!(acc.address.to_string(), "172.20.20.3/24");
        assert_eq!(
            design.device("core01").unwrap().primary_ip(),
            Some("172.20.20.2".parse().unwrap())
        );

        let profile = design.device("acc01").unwrap().interface(MGMT_PORT).unwrap().profile.clone();
        assert_eq!(
            profile,
            Some(InterfaceProfile::Management {
                address: Some("172.20.20.3/24".parse().unwrap())
            })
        );
    }

    #[test]
    fn test_mgmt_addresses_follow_net_id() {
        let mut design = design_with_oob(3);
        let core = design.set_mgmt_ipaddr("core01.11", 2, 28, 24).unwrap();
        assert_eq!(core.address.to_string(), "172.20.20.34/24");
    }

    #[test]
    fn test_mgmt_net_id_out_of_range() {
        let mut design = design_with_oob(17);
        let result = design.set_mgmt_ipaddr("core01.11", 2, 28, 24);
        assert!(matches!(result, Err(DesignError::OutOfRange { .. })));
        assert!(design.addresses.is_empty());
    }

    #[test]
    fn test_mgmt_offset_overflow_leaves_device_untouched() {
        let mut design = design_with_oob(1);
        let result = design.set_mgmt_ipaddr("core01.11", 16, 28, 24);
        assert!(matches!(result, Err(DesignError::OffsetOverflow { .. })));
        assert!(design.device("core01").unwrap().primary_ip().is_none());
    }

    #[test]
    fn test_device_lookup_by_nickname_or_hostname() {
        let design = design_with_oob(1);
        assert_eq!(design.device("acc01").unwrap().name(), "acc01.11");
        assert_eq!(design.device("acc01.11").unwrap().name(), "acc01.11");
        assert!(design.device("acc09").is_err());
    }
}
