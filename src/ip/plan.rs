//! Address plan and address book.
//!
//! The address plan owns every subnet used by one design instance, keyed by
//! name and optionally by VLAN id. The address book records which interface
//! received which host address so the renderer and the reports can look
//! assignments up without walking the device graph.

use super::planner::{interface_address, normalize};
use crate::error::DesignError;
use ipnetwork::Ipv4Network;
use serde::Serialize;
use std::collections::BTreeMap;

/// A CIDR block, optionally tagged with a VLAN id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
    pub name: String,
    pub network: Ipv4Network,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

impl Subnet {
    pub fn new(name: impl Into<String>, network: Ipv4Network) -> Self {
        Self {
            name: name.into(),
            network: normalize(network),
            vlan: None,
        }
    }

    pub fn with_vlan(mut self, vlan: u16) -> Self {
        self.vlan = Some(vlan);
        self
    }

    fn overlaps(&self, other: &Subnet) -> bool {
        self.network.contains(other.network.network()) || other.network.contains(self.network.network())
    }
}

/// Non-overlapping set of subnets belonging to one design
#[derive(Debug, Default, Clone)]
pub struct AddressPlan {
    name: String,
    subnets: BTreeMap<String, Subnet>,
    by_vlan: BTreeMap<u16, String>,
}

impl AddressPlan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a subnet, rejecting any overlap with an existing one
    pub fn add(&mut self, subnet: Subnet) -> Result<(), DesignError> {
        for existing in self.subnets.values() {
            if existing.name == subnet.name || existing.overlaps(&subnet) {
                return Err(DesignError::SubnetOverlap {
                    name: subnet.name,
                    network: subnet.network,
                    existing: existing.name.clone(),
                    existing_network: existing.network,
                });
            }
        }
        if let Some(vlan) = subnet.vlan {
            if let Some(existing) = self.by_vlan.get(&vlan).and_then(|name| self.subnets.get(name)) {
                return Err(DesignError::SubnetOverlap {
                    name: subnet.name,
                    network: subnet.network,
                    existing: existing.name.clone(),
                    existing_network: existing.network,
                });
            }
            self.by_vlan.insert(vlan, subnet.name.clone());
        }
        log::debug!("Address plan {}: added {} {}", self.name, subnet.name, subnet.network);
        self.subnets.insert(subnet.name.clone(), subnet);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Subnet> {
        self.subnets.get(name)
    }

    pub fn by_vlan(&self, vlan: u16) -> Option<&Subnet> {
        self.by_vlan.get(&vlan).and_then(|name| self.subnets.get(name))
    }

    pub fn subnets(&self) -> impl Iterator<Item = &Subnet> {
        self.subnets.values()
    }
}

/// One interface's primary address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressAssignment {
    pub device: String,
    pub interface: String,
    pub subnet: String,
    pub offset: u32,
    pub address: Ipv4Network,
}

/// Primary addresses by `(device, interface)`
#[derive(Debug, Default, Clone)]
pub struct AddressBook {
    assignments: BTreeMap<(String, String), AddressAssignment>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute and record the address at `offset` inside `block` for an
    /// interface. Re-assigning the identical address is accepted; a different
    /// address for the same interface is an error.
    pub fn assign(
        &mut self,
        device: &str,
        interface: &str,
        subnet: &str,
        block: Ipv4Network,
        offset: u32,
        prefix_len: u8,
    ) -> Result<AddressAssignment, DesignError> {
        let address = interface_address(block, offset, prefix_len)?;
        let key = (device.to_string(), interface.to_string());

        if let Some(existing) = self.assignments.get(&key) {
            if existing.address != address {
                return Err(DesignError::AddressConflict {
                    device: device.to_string(),
                    interface: interface.to_string(),
                    existing: existing.address,
                    requested: address,
                });
            }
            return Ok(existing.clone());
        }

        let assignment = AddressAssignment {
            device: device.to_string(),
            interface: interface.to_string(),
            subnet: subnet.to_string(),
            offset,
            address,
        };
        self.assignments.insert(key, assignment.clone());
        Ok(assignment)
    }

    pub fn get(&self, device: &str, interface: &str) -> Option<&AddressAssignment> {
        self.assignments.get(&(device.to_string(), interface.to_string()))
    }

    /// All assignments ordered by device then interface name
    pub fn assignments(&self) -> Vec<&AddressAssignment> {
        self.assignments.values().collect()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
