//! Device and interface type definitions.
//!
//! A design is made of `Device` values, each owning its interfaces. Role
//! specific behaviour (host naming, operating system, pseudo-device status)
//! hangs off the `Role` tag instead of a type per role.

use super::naming::{is_data_port, natural_key};
use crate::error::DesignError;
use crate::vlan::VlanProfile;
use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

/// Device role within the building-floor design
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Core,
    Access,
    AccessPoint,
}

impl Role {
    /// Hostname prefix for devices of this role
    pub fn base_name(self) -> &'static str {
        match self {
            Role::Core => "core",
            Role::Access => "acc",
            Role::AccessPoint => "ap",
        }
    }

    /// Column of the role in the `(file, rank)` device ordering
    pub fn file(self) -> u32 {
        match self {
            Role::Core => 0,
            Role::Access => 1,
            Role::AccessPoint => 2,
        }
    }

    pub fn os_name(self) -> &'static str {
        match self {
            Role::Core | Role::Access => "eos",
            Role::AccessPoint => "meraki",
        }
    }

    pub fn product_model(self) -> &'static str {
        match self {
            Role::Core | Role::Access => "cEOSLab",
            Role::AccessPoint => "MR84",
        }
    }

    /// Pseudo-devices exist for design purposes only and are not emulated
    pub fn is_pseudo(self) -> bool {
        matches!(self, Role::AccessPoint)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Core => "core",
            Role::Access => "access",
            Role::AccessPoint => "access-point",
        };
        f.write_str(name)
    }
}

/// Whether the connected device should check the cable neighbor on this port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CablePortId {
    #[default]
    Validate,
    /// The peer does not exist in the testbed; skip neighbor validation
    NoValidate,
}

/// The kind of endpoint attached to an access port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    Printer,
    Phone,
    DeskUser,
}

/// Role-specific behaviour descriptor attached to an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterfaceProfile {
    /// Out-of-band management port
    Management {
        #[serde(skip_serializing_if = "Option::is_none")]
        address: Option<Ipv4Network>,
    },
    /// Routed VLAN interface
    Svi { vlan: VlanProfile, address: Ipv4Network },
    /// Untagged port on a single VLAN
    Access { kind: AccessKind, vlan: VlanProfile },
    /// Access-switch uplink carrying every VLAN found on the device
    UplinkTrunk {
        #[serde(skip_serializing_if = "Option::is_none")]
        native_vlan: Option<VlanProfile>,
    },
    /// Trunk whose native and member VLANs follow the peer endpoint
    PeeringTrunk,
    /// Access-point wired port with a fixed VLAN list
    ApTrunk {
        #[serde(skip_serializing_if = "Option::is_none")]
        native_vlan: Option<VlanProfile>,
        vlans: Vec<VlanProfile>,
    },
}

impl InterfaceProfile {
    pub fn is_mgmt_only(&self) -> bool {
        matches!(self, InterfaceProfile::Management { .. })
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, InterfaceProfile::Svi { .. })
    }

    pub fn address(&self) -> Option<Ipv4Network> {
        match self {
            InterfaceProfile::Management { address } => *address,
            InterfaceProfile::Svi { address, .. } => Some(*address),
            _ => None,
        }
    }
}

/// A port on a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<InterfaceProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cable_id: Option<String>,
    pub cable_port_id: CablePortId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: None,
            cable_id: None,
            cable_port_id: CablePortId::Validate,
            desc: None,
        }
    }

    pub fn with_profile(mut self, profile: InterfaceProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// An interface is in use once it carries a profile
    pub fn used(&self) -> bool {
        self.profile.is_some()
    }
}

/// A set of field updates applied to one interface in a single step.
///
/// Updates are checked against the current interface state before anything
/// is written, so a rejected update leaves the interface untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceUpdate {
    profile: Option<InterfaceProfile>,
    cable_id: Option<String>,
    cable_port_id: Option<CablePortId>,
    desc: Option<String>,
}

impl InterfaceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(mut self, profile: InterfaceProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn cable_id(mut self, cable_id: impl Into<String>) -> Self {
        self.cable_id = Some(cable_id.into());
        self
    }

    pub fn cable_port_id(mut self, cable_port_id: CablePortId) -> Self {
        self.cable_port_id = Some(cable_port_id);
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    fn check(&self, device: &str, interface: &Interface) -> Result<(), DesignError> {
        if let (Some(existing), Some(requested)) = (&interface.cable_id, &self.cable_id) {
            if existing != requested {
                return Err(DesignError::ReassignmentConflict {
                    device: device.to_string(),
                    interface: interface.name.clone(),
                    existing: existing.clone(),
                    requested: requested.clone(),
                });
            }
        }
        Ok(())
    }

    fn commit(self, interface: &mut Interface) {
        if let Some(profile) = self.profile {
            interface.profile = Some(profile);
        }
        if let Some(cable_id) = self.cable_id {
            interface.cable_id = Some(cable_id);
        }
        if let Some(cable_port_id) = self.cable_port_id {
            interface.cable_port_id = cable_port_id;
        }
        if let Some(desc) = self.desc {
            interface.desc = Some(desc);
        }
    }
}

/// A network device in the design
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    name: String,
    role: Role,
    dev_id: u32,
    bld_id: u32,
    flr_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_ip: Option<Ipv4Addr>,
    interfaces: BTreeMap<String, Interface>,
}

impl Device {
    /// Create a device whose hostname is derived from its role and ids,
    /// e.g. access switch 1 in building 1 floor 2 is `acc01.12`.
    pub fn new(
        role: Role,
        dev_id: u32,
        bld_id: u32,
        flr_id: u32,
        interfaces: impl IntoIterator<Item = Interface>,
    ) -> Result<Self, DesignError> {
        if dev_id == 0 {
            return Err(DesignError::InvalidOrdinal { ordinal: dev_id });
        }

        let name = format!("{}{:02}.{}{}", role.base_name(), dev_id, bld_id, flr_id);
        let interfaces = interfaces
            .into_iter()
            .map(|iface| (iface.name.clone(), iface))
            .collect();

        Ok(Self {
            name,
            role,
            dev_id,
            bld_id,
            flr_id,
            primary_ip: None,
            interfaces,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn dev_id(&self) -> u32 {
        self.dev_id
    }

    pub fn bld_id(&self) -> u32 {
        self.bld_id
    }

    pub fn flr_id(&self) -> u32 {
        self.flr_id
    }

    pub fn os_name(&self) -> &'static str {
        self.role.os_name()
    }

    pub fn is_pseudo(&self) -> bool {
        self.role.is_pseudo()
    }

    /// `(file, rank)` ordering: role column first, then ordinal
    pub fn sort_key(&self) -> (u32, u32) {
        (self.role.file(), self.dev_id)
    }

    pub fn primary_ip(&self) -> Option<Ipv4Addr> {
        self.primary_ip
    }

    pub fn set_primary_ip(&mut self, ip: Ipv4Addr) {
        self.primary_ip = Some(ip);
    }

    pub fn interface(&self, name: &str) -> Result<&Interface, DesignError> {
        self.interfaces.get(name).ok_or_else(|| DesignError::UnknownInterface {
            device: self.name.clone(),
            interface: name.to_string(),
        })
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    /// Add an interface that is not part of the role's port table (e.g. an
    /// SVI). Existing interfaces are left as they are.
    pub fn ensure_interface(&mut self, name: &str) {
        self.interfaces
            .entry(name.to_string())
            .or_insert_with(|| Interface::new(name));
    }

    /// Interfaces in natural port order
    pub fn interfaces(&self) -> Vec<&Interface> {
        let mut ifaces: Vec<&Interface> = self.interfaces.values().collect();
        ifaces.sort_by_cached_key(|iface| natural_key(&iface.name));
        ifaces
    }

    /// Number of front-panel data ports
    pub fn data_port_capacity(&self) -> u32 {
        self.interfaces.keys().filter(|name| is_data_port(name)).count() as u32
    }

    /// Validate an update against the named interface without applying it
    pub fn check_update(&self, interface: &str, update: &InterfaceUpdate) -> Result<(), DesignError> {
        let iface = self.interface(interface)?;
        update.check(&self.name, iface)
    }

    /// Validate and apply an update to the named interface
    pub fn update(&mut self, interface: &str, update: InterfaceUpdate) -> Result<(), DesignError> {
        self.check_update(interface, &update)?;
        if let Some(iface) = self.interfaces.get_mut(interface) {
            update.commit(iface);
        }
        Ok(())
    }
}
