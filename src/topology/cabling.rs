//! Uplink allocation and cable identifiers.
//!
//! Access switches are cabled to the core on a pair of core ports derived
//! from the access switch ordinal, so every access switch sharing a core gets
//! its own non-overlapping pair. Cable identifiers are minted from the two
//! device names plus a per-pair sequence number, which makes them stable
//! across re-runs of the same design.

use crate::design::Inventory;
use crate::device::roles::{ACCESS_UPLINK_PORTS, AP_UPLINK_PORT};
use crate::device::{CablePortId, InterfaceProfile, InterfaceUpdate, Role};
use crate::error::DesignError;
use crate::vlan::VlanProfile;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One end of a cable
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Endpoint {
    pub device: String,
    pub interface: String,
}

impl Endpoint {
    pub fn new(device: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            interface: interface.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.interface)
    }
}

/// A cable between exactly two interfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CableAssignment {
    pub cable_id: String,
    pub endpoint_a: Endpoint,
    pub endpoint_b: Endpoint,
}

impl CableAssignment {
    /// Endpoints ordered by `(device, interface)`
    pub fn sorted_endpoints(&self) -> (&Endpoint, &Endpoint) {
        if self.endpoint_a <= self.endpoint_b {
            (&self.endpoint_a, &self.endpoint_b)
        } else {
            (&self.endpoint_b, &self.endpoint_a)
        }
    }

    fn connects(&self, a: &Endpoint, b: &Endpoint) -> bool {
        (&self.endpoint_a == a && &self.endpoint_b == b) || (&self.endpoint_a == b && &self.endpoint_b == a)
    }
}

/// Core port pair `(2k-1, 2k)` used by the access switch with ordinal `k`
pub fn uplink_ports(ordinal: u32) -> Result<(u32, u32), DesignError> {
    let first = ordinal
        .checked_sub(1)
        .and_then(|index| index.checked_mul(2))
        .and_then(|offset| offset.checked_add(1))
        .ok_or(DesignError::InvalidOrdinal { ordinal })?;
    let second = first.checked_add(1).ok_or(DesignError::InvalidOrdinal { ordinal })?;
    Ok((first, second))
}

/// Mints cable identifiers and applies cable assignments to the inventory
#[derive(Debug, Default, Clone)]
pub struct CablingPlanner {
    native_vlan: Option<VlanProfile>,
    cables: BTreeMap<String, CableAssignment>,
    sequences: BTreeMap<(String, String), u32>,
}

impl CablingPlanner {
    /// `native_vlan` is the untagged VLAN placed on access-switch uplinks
    pub fn new(native_vlan: Option<VlanProfile>) -> Self {
        Self {
            native_vlan,
            ..Default::default()
        }
    }

    /// Interface updates for both ends of a link, chosen by the role pair
    fn link_updates(&self, role_a: Role, role_b: Role, cable_id: &str) -> (InterfaceUpdate, InterfaceUpdate) {
        let uplink = || {
            InterfaceUpdate::new()
                .cable_id(cable_id)
                .profile(InterfaceProfile::UplinkTrunk {
                    native_vlan: self.native_vlan.clone(),
                })
        };
        let peering = || InterfaceUpdate::new().cable_id(cable_id).profile(InterfaceProfile::PeeringTrunk);
        // Access points keep their fixed trunk profile and are never validated
        let pseudo = || InterfaceUpdate::new().cable_id(cable_id).cable_port_id(CablePortId::NoValidate);

        match (role_a, role_b) {
            (Role::Access, Role::Core) => (uplink(), peering()),
            (Role::Core, Role::Access) => (peering(), uplink()),
            (Role::AccessPoint, _) => (pseudo(), peering()),
            (_, Role::AccessPoint) => (peering(), pseudo()),
            _ => (peering(), peering()),
        }
    }

    fn next_cable_id(&self, a: &Endpoint, b: &Endpoint) -> (String, u32) {
        let mut seq = self
            .sequences
            .get(&(a.device.clone(), b.device.clone()))
            .copied()
            .unwrap_or(0)
            + 1;
        loop {
            let cable_id = format!("uplink_{}_{}_{}", a.device, b.device, seq);
            if !self.cables.contains_key(&cable_id) {
                return (cable_id, seq);
            }
            seq += 1;
        }
    }

    /// Cable `a` to `b`, setting the cable id and role-appropriate profile on
    /// both interfaces. Both sides are checked before either is changed.
    /// Cabling the same two interfaces again returns the existing id.
    pub fn assign_cable(&mut self, inventory: &mut Inventory, a: &Endpoint, b: &Endpoint) -> Result<String, DesignError> {
        let dev_a = inventory.get(&a.device)?;
        let dev_b = inventory.get(&b.device)?;
        let iface_a = dev_a.interface(&a.interface)?;
        let iface_b = dev_b.interface(&b.interface)?;

        if let (Some(id_a), Some(id_b)) = (&iface_a.cable_id, &iface_b.cable_id) {
            if id_a == id_b && self.cables.get(id_a).is_some_and(|cable| cable.connects(a, b)) {
                log::debug!("Cable {} already connects {} and {}", id_a, a, b);
                return Ok(id_a.clone());
            }
        }

        let (cable_id, seq) = self.next_cable_id(a, b);

        if a == b {
            return Err(DesignError::ReassignmentConflict {
                device: a.device.clone(),
                interface: a.interface.clone(),
                existing: cable_id.clone(),
                requested: cable_id,
            });
        }

        // Each end is described by the interface it faces
        let (update_a, update_b) = self.link_updates(dev_a.role(), dev_b.role(), &cable_id);
        let (update_a, update_b) = (update_a.desc(b.to_string()), update_b.desc(a.to_string()));
        dev_a.check_update(&a.interface, &update_a)?;
        dev_b.check_update(&b.interface, &update_b)?;

        inventory.get_mut(&a.device)?.update(&a.interface, update_a)?;
        inventory.get_mut(&b.device)?.update(&b.interface, update_b)?;

        log::debug!("Cabled {} <-> {} as {}", a, b, cable_id);
        self.sequences.insert((a.device.clone(), b.device.clone()), seq);
        self.cables.insert(
            cable_id.clone(),
            CableAssignment {
                cable_id: cable_id.clone(),
                endpoint_a: a.clone(),
                endpoint_b: b.clone(),
            },
        );
        Ok(cable_id)
    }

    /// Cable an access switch's two uplink ports to the core ports chosen by
    /// the access switch ordinal. The core must have enough data ports for
    /// the pair.
    pub fn build_uplink_to_core(
        &mut self,
        inventory: &mut Inventory,
        access: &str,
        core: &str,
    ) -> Result<Vec<String>, DesignError> {
        let ordinal = inventory.get(access)?.dev_id();
        let (first, second) = uplink_ports(ordinal)?;

        let capacity = inventory.get(core)?.data_port_capacity();
        if second > capacity {
            return Err(DesignError::CapacityExceeded {
                core: core.to_string(),
                access: access.to_string(),
                ordinal,
                first,
                second,
                capacity,
            });
        }

        let mut cable_ids = Vec::with_capacity(ACCESS_UPLINK_PORTS.len());
        for (uplink, core_port) in ACCESS_UPLINK_PORTS.iter().zip([first, second]) {
            let cable_id = self.assign_cable(
                inventory,
                &Endpoint::new(access, *uplink),
                &Endpoint::new(core, format!("Ethernet{}", core_port)),
            )?;
            cable_ids.push(cable_id);
        }

        log::info!("Uplinked {} to {} on Ethernet{}/Ethernet{}", access, core, first, second);
        Ok(cable_ids)
    }

    /// Cable an access point's wired port to a switch port
    pub fn build_ap_uplink(
        &mut self,
        inventory: &mut Inventory,
        ap: &str,
        switch: &str,
        port: &str,
    ) -> Result<String, DesignError> {
        let cable_id = self.assign_cable(
            inventory,
            &Endpoint::new(ap, AP_UPLINK_PORT),
            &Endpoint::new(switch, port),
        )?;
        log::info!("Uplinked {} to {}:{}", ap, switch, port);
        Ok(cable_id)
    }

    pub fn get(&self, cable_id: &str) -> Option<&CableAssignment> {
        self.cables.get(cable_id)
    }

    /// All cables in cable-id order
    pub fn cables(&self) -> Vec<&CableAssignment> {
        self.cables.values().collect()
    }

    /// The endpoint on the other side of the cable attached to `endpoint`
    pub fn peer_of(&self, endpoint: &Endpoint) -> Option<&Endpoint> {
        self.cables.values().find_map(|cable| {
            if &cable.endpoint_a == endpoint {
                Some(&cable.endpoint_b)
            } else if &cable.endpoint_b == endpoint {
                Some(&cable.endpoint_a)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::roles;

    fn inventory(access_count: u32) -> Inventory {
        let mut inv = Inventory::new();
        inv.add(roles::core_switch(1, 1, 1).unwrap()).unwrap();
        for id in 1..=access_count {
            inv.add(roles::access_switch(id, 1, 1).unwrap()).unwrap();
        }
        inv
    }

    #[test]
    fn test_uplink_ports_formula() {
        assert_eq!(uplink_ports(1).unwrap(), (1, 2));
        assert_eq!(uplink_ports(2).unwrap(), (3, 4));
        for k in 1..=16 {
            assert_eq!(uplink_ports(k).unwrap(), (2 * k - 1, 2 * k));
        }
        assert!(matches!(uplink_ports(0), Err(DesignError::InvalidOrdinal { .. })));
    }

    #[test]
    fn test_uplink_ports_reject_oversized_ordinal() {
        assert_eq!(
            uplink_ports(u32::MAX),
            Err(DesignError::InvalidOrdinal { ordinal: u32::MAX })
        );
        assert!(uplink_ports(1 << 31).is_err());
        assert_eq!(uplink_ports((1 << 31) - 1).unwrap(), (u32::MAX - 2, u32::MAX - 1));
    }

    #[test]
    fn test_two_access_switches_on_one_core() {
        let mut inv = inventory(2);
        let mut planner = CablingPlanner::new(None);

        let ids1 = planner.build_uplink_to_core(&mut inv, "acc01.11", "core01.11").unwrap();
        let ids2 = planner.build_uplink_to_core(&mut inv, "acc02.11", "core01.11").unwrap();
        assert_eq!(ids1, vec!["uplink_acc01.11_core01.11_1", "uplink_acc01.11_core01.11_2"]);
        assert_eq!(ids2, vec!["uplink_acc02.11_core01.11_1", "uplink_acc02.11_core01.11_2"]);

        let expected = [
            ("acc01.11", "Ethernet7", "Ethernet1"),
            ("acc01.11", "Ethernet8", "Ethernet2"),
            ("acc02.11", "Ethernet7", "Ethernet3"),
            ("acc02.11", "Ethernet8", "Ethernet4"),
        ];
        let core = inv.get("core01.11").unwrap();
        for (access, access_port, core_port) in expected {
            let acc_iface = inv.get(access).unwrap().interface(access_port).unwrap();
            let core_iface = core.interface(core_port).unwrap();
            assert!(acc_iface.cable_id.is_some());
            assert_eq!(acc_iface.cable_id, core_iface.cable_id);
            assert!(matches!(acc_iface.profile, Some(InterfaceProfile::UplinkTrunk { .. })));
            assert_eq!(core_iface.profile, Some(InterfaceProfile::PeeringTrunk));
            assert_eq!(acc_iface.desc, Some(format!("core01.11:{}", core_port)));
            assert_eq!(core_iface.desc, Some(format!("{}:{}", access, access_port)));
        }
        assert_eq!(planner.cables().len(), 4);
    }

    #[test]
    fn test_every_cable_has_two_distinct_endpoints() {
        let mut inv = inventory(4);
        let mut planner = CablingPlanner::new(None);
        for id in 1..=4 {
            planner
                .build_uplink_to_core(&mut inv, &format!("acc{:02}.11", id), "core01.11")
                .unwrap();
        }

        let mut seen = std::collections::HashSet::new();
        for cable in planner.cables() {
            assert_ne!(cable.endpoint_a, cable.endpoint_b);
            assert!(seen.insert(cable.endpoint_a.clone()));
            assert!(seen.insert(cable.endpoint_b.clone()));
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_core_capacity_is_enforced() {
        let mut inv = inventory(5);
        let mut planner = CablingPlanner::new(None);
        for id in 1..=4 {
            planner
                .build_uplink_to_core(&mut inv, &format!("acc{:02}.11", id), "core01.11")
                .unwrap();
        }

        let result = planner.build_uplink_to_core(&mut inv, "acc05.11", "core01.11");
        assert_eq!(
            result.unwrap_err(),
            DesignError::CapacityExceeded {
                core: "core01.11".to_string(),
                access: "acc05.11".to_string(),
                ordinal: 5,
                first: 9,
                second: 10,
                capacity: 8,
            }
        );
    }

    #[test]
    fn test_reassigning_same_endpoints_is_idempotent() {
        let mut inv = inventory(1);
        let mut planner = CablingPlanner::new(None);
        let a = Endpoint::new("acc01.11", "Ethernet7");
        let b = Endpoint::new("core01.11", "Ethernet1");

        let first = planner.assign_cable(&mut inv, &a, &b).unwrap();
        let again = planner.assign_cable(&mut inv, &b, &a).unwrap();
        assert_eq!(first, again);
        assert_eq!(planner.cables().len(), 1);
    }

    #[test]
    fn test_conflicting_port_is_rejected_atomically() {
        let mut inv = inventory(2);
        let mut planner = CablingPlanner::new(None);
        planner.build_uplink_to_core(&mut inv, "acc01.11", "core01.11").unwrap();

        // acc02 tries to land on a core port already used by acc01
        let result = planner.assign_cable(
            &mut inv,
            &Endpoint::new("acc02.11", "Ethernet7"),
            &Endpoint::new("core01.11", "Ethernet1"),
        );
        assert!(matches!(result, Err(DesignError::ReassignmentConflict { .. })));

        // Neither side was modified
        let acc2 = inv.get("acc02.11").unwrap().interface("Ethernet7").unwrap();
        assert!(acc2.cable_id.is_none());
        assert!(acc2.profile.is_none());
        assert_eq!(
            inv.get("core01.11").unwrap().interface("Ethernet1").unwrap().cable_id.as_deref(),
            Some("uplink_acc01.11_core01.11_1")
        );
        assert_eq!(planner.cables().len(), 2);
    }

    #[test]
    fn test_unknown_interface() {
        let mut inv = inventory(1);
        let mut planner = CablingPlanner::new(None);
        let result = planner.assign_cable(
            &mut inv,
            &Endpoint::new("acc01.11", "Ethernet7"),
            &Endpoint::new("core01.11", "Ethernet42"),
        );
        assert!(matches!(result, Err(DesignError::UnknownInterface { .. })));
    }

    #[test]
    fn test_self_cable_rejected() {
        let mut inv = inventory(1);
        let mut planner = CablingPlanner::new(None);
        let a = Endpoint::new("acc01.11", "Ethernet1");
        assert!(planner.assign_cable(&mut inv, &a, &a).is_err());
    }

    #[test]
    fn test_ap_uplink_marks_no_validate() {
        let mut inv = inventory(1);
        inv.add(roles::access_point(1, 1, 1, None, Vec::new()).unwrap()).unwrap();
        let mut planner = CablingPlanner::new(None);

        let id = planner.build_ap_uplink(&mut inv, "ap01.11", "acc01.11", "Ethernet1").unwrap();
        assert_eq!(id, "uplink_ap01.11_acc01.11_1");

        let wired = inv.get("ap01.11").unwrap().interface(AP_UPLINK_PORT).unwrap();
        assert_eq!(wired.cable_port_id, CablePortId::NoValidate);
        assert!(matches!(wired.profile, Some(InterfaceProfile::ApTrunk { .. })));

        let port = inv.get("acc01.11").unwrap().interface("Ethernet1").unwrap();
        assert_eq!(port.cable_port_id, CablePortId::Validate);
        assert_eq!(port.profile, Some(InterfaceProfile::PeeringTrunk));
        assert_eq!(port.desc.as_deref(), Some("ap01.11:wired0"));
        assert_eq!(
            planner.peer_of(&Endpoint::new("acc01.11", "Ethernet1")),
            Some(&Endpoint::new("ap01.11", AP_UPLINK_PORT))
        );
    }
}
