//! VLAN profiles and per-device VLAN resolution.
//!
//! Trunk ports do not always list their VLANs: an access-switch uplink
//! carries every VLAN present on the switch's other ports, and a peering
//! trunk carries whatever its cabled peer carries. Resolution follows those
//! links through the cable registry, visiting each interface at most once.

use crate::design::Inventory;
use crate::device::{InterfaceProfile, Role};
use crate::error::DesignError;
use crate::topology::{CablingPlanner, Endpoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A VLAN known to the design
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VlanProfile {
    pub id: u16,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VlanProfile {
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

struct Resolver<'a> {
    inventory: &'a Inventory,
    cabling: &'a CablingPlanner,
    visited: BTreeSet<Endpoint>,
}

impl Resolver<'_> {
    /// VLANs carried by one interface
    fn interface_vlans(&mut self, endpoint: &Endpoint) -> Result<BTreeSet<VlanProfile>, DesignError> {
        let mut vlans = BTreeSet::new();
        if !self.visited.insert(endpoint.clone()) {
            return Ok(vlans);
        }

        let inventory = self.inventory;
        let device = inventory.get(&endpoint.device)?;
        let iface = device.interface(&endpoint.interface)?;

        match &iface.profile {
            Some(InterfaceProfile::Access { vlan, .. }) | Some(InterfaceProfile::Svi { vlan, .. }) => {
                vlans.insert(vlan.clone());
            }
            Some(InterfaceProfile::ApTrunk { native_vlan, vlans: members }) => {
                vlans.extend(native_vlan.iter().cloned());
                vlans.extend(members.iter().cloned());
            }
            Some(InterfaceProfile::UplinkTrunk { native_vlan }) => {
                vlans.extend(native_vlan.iter().cloned());
                let others: Vec<Endpoint> = device
                    .interfaces()
                    .iter()
                    .filter(|other| other.name != iface.name)
                    .filter(|other| !matches!(other.profile, Some(InterfaceProfile::UplinkTrunk { .. })))
                    .map(|other| Endpoint::new(device.name(), other.name.clone()))
                    .collect();
                for other in others {
                    vlans.extend(self.interface_vlans(&other)?);
                }
            }
            Some(InterfaceProfile::PeeringTrunk) => {
                if let Some(peer) = self.cabling.peer_of(endpoint).cloned() {
                    vlans.extend(self.interface_vlans(&peer)?);
                }
            }
            Some(InterfaceProfile::Management { .. }) | None => {}
        }
        Ok(vlans)
    }
}

/// All VLANs present on a device's interfaces
pub fn device_vlans(
    inventory: &Inventory,
    cabling: &CablingPlanner,
    device: &str,
) -> Result<BTreeSet<VlanProfile>, DesignError> {
    let dev = inventory.get(device)?;
    let mut resolver = Resolver {
        inventory,
        cabling,
        visited: BTreeSet::new(),
    };

    let mut vlans = BTreeSet::new();
    for iface in dev.interfaces() {
        // Each interface is resolved on a fresh walk so one port's walk does
        // not hide VLANs from the next
        resolver.visited.clear();
        vlans.extend(resolver.interface_vlans(&Endpoint::new(device, iface.name.clone()))?);
    }

    if dev.role() == Role::Core {
        log::debug!(
            "{} carries VLANs {:?}",
            device,
            vlans.iter().map(|v| v.id).collect::<Vec<_>>()
        );
    }
    Ok(vlans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{roles, AccessKind, InterfaceUpdate};

    fn ids(vlans: &BTreeSet<VlanProfile>) -> Vec<u16> {
        vlans.iter().map(|v| v.id).collect()
    }

    #[test]
    fn test_core_learns_vlans_through_uplinks_and_ap() {
        let native = VlanProfile::new(411, "native_vlan");
        let printers = VlanProfile::new(20, "Printers");
        let ap_vlans = vec![VlanProfile::new(300, "WIFI-Employee"), VlanProfile::new(301, "WIFI-Visitor")];

        let mut inv = Inventory::new();
        inv.add(roles::core_switch(1, 1, 1).unwrap()).unwrap();
        inv.add(roles::access_switch(1, 1, 1).unwrap()).unwrap();
        inv.add(roles::access_switch(2, 1, 1).unwrap()).unwrap();
        inv.add(roles::access_point(1, 1, 1, Some(native.clone()), ap_vlans).unwrap()).unwrap();
        inv.get_mut("acc02.11")
            .unwrap()
            .update(
                "Ethernet1",
                InterfaceUpdate::new().profile(InterfaceProfile::Access {
                    kind: AccessKind::Printer,
                    vlan: printers,
                }),
            )
            .unwrap();

        let mut planner = CablingPlanner::new(Some(native));
        planner.build_uplink_to_core(&mut inv, "acc01.11", "core01.11").unwrap();
        planner.build_uplink_to_core(&mut inv, "acc02.11", "core01.11").unwrap();
        planner.build_ap_uplink(&mut inv, "ap01.11", "acc01.11", "Ethernet1").unwrap();

        let acc1 = device_vlans(&inv, &planner, "acc01.11").unwrap();
        assert_eq!(ids(&acc1), vec![300, 301, 411]);

        let acc2 = device_vlans(&inv, &planner, "acc02.11").unwrap();
        assert_eq!(ids(&acc2), vec![20, 411]);

        let core = device_vlans(&inv, &planner, "core01.11").unwrap();
        assert_eq!(ids(&core), vec![20, 300, 301, 411]);
    }

    #[test]
    fn test_unprofiled_device_has_no_vlans() {
        let mut inv = Inventory::new();
        inv.add(roles::core_switch(1, 1, 1).unwrap()).unwrap();
        let planner = CablingPlanner::new(None);
        assert!(device_vlans(&inv, &planner, "core01.11").unwrap().is_empty());
    }
}
