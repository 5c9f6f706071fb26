use crate::device::naming::{is_data_port, port_numbers};
use crate::device::roles::{ACCESS_UPLINK_PORTS, CEOS_DATA_PORTS};
use crate::device::AccessKind;
use crate::vlan::VlanProfile;
use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Highest VLAN id usable on a trunk
const MAX_VLAN_ID: u16 = 4094;

/// Building-floor design configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub vlans: Vec<VlanConfig>,
    #[serde(default)]
    pub devices: DeviceConfig,
    #[serde(default)]
    pub access_ports: Vec<AccessPortConfig>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_general()?;
        self.validate_network()?;
        self.validate_vlans()?;
        self.validate_devices()?;
        self.validate_access_ports()?;
        Ok(())
    }

    fn validate_general(&self) -> Result<(), ValidationError> {
        let general = &self.general;
        if general.name.trim().is_empty() {
            return Err(ValidationError::InvalidGeneral("name cannot be empty".to_string()));
        }
        for (field, value) in [("building", general.building), ("floor", general.floor), ("net_id", general.net_id)] {
            if value == 0 {
                return Err(ValidationError::InvalidGeneral(format!("{} must start at 1", field)));
            }
        }
        Ok(())
    }

    fn validate_network(&self) -> Result<(), ValidationError> {
        let network = &self.network;
        let oob = self.oob_network()?;

        if network.oob_block_prefix < oob.prefix() || network.oob_block_prefix > 32 {
            return Err(ValidationError::InvalidNetwork(format!(
                "oob_block_prefix /{} must be between /{} and /32",
                network.oob_block_prefix,
                oob.prefix()
            )));
        }
        if network.mgmt_prefix_len > 32 {
            return Err(ValidationError::InvalidNetwork(format!(
                "mgmt_prefix_len /{} is not a valid IPv4 prefix",
                network.mgmt_prefix_len
            )));
        }
        if network.dummy_bridge.trim().is_empty() {
            return Err(ValidationError::InvalidNetwork("dummy_bridge cannot be empty".to_string()));
        }
        if let Some(native) = network.native_vlan {
            if self.vlan(native).is_none() {
                return Err(ValidationError::InvalidNetwork(format!(
                    "native_vlan {} is not declared in vlans",
                    native
                )));
            }
        }
        Ok(())
    }

    fn validate_vlans(&self) -> Result<(), ValidationError> {
        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();

        for vlan in &self.vlans {
            if vlan.id == 0 || vlan.id > MAX_VLAN_ID {
                return Err(ValidationError::InvalidVlan(format!(
                    "VLAN id {} is outside 1-{}",
                    vlan.id, MAX_VLAN_ID
                )));
            }
            if !ids.insert(vlan.id) {
                return Err(ValidationError::InvalidVlan(format!("duplicate VLAN id {}", vlan.id)));
            }
            if !names.insert(vlan.name.as_str()) {
                return Err(ValidationError::InvalidVlan(format!("duplicate VLAN name '{}'", vlan.name)));
            }
            if vlan.name == OOB_SUBNET {
                return Err(ValidationError::InvalidVlan(format!("VLAN name '{}' is reserved", OOB_SUBNET)));
            }
            vlan.network()?;
        }
        Ok(())
    }

    fn validate_devices(&self) -> Result<(), ValidationError> {
        let devices = &self.devices;
        if devices.access_switches == 0 {
            return Err(ValidationError::InvalidDevice(
                "at least one access switch is required".to_string(),
            ));
        }

        for (index, ap) in devices.access_points.iter().enumerate() {
            self.check_access_switch(ap.access_switch, &ap.port)
                .map_err(|e| ValidationError::InvalidDevice(format!("access point {}: {}", index + 1, e)))?;
            for vlan in &ap.vlans {
                if self.vlan(*vlan).is_none() {
                    return Err(ValidationError::InvalidDevice(format!(
                        "access point {}: VLAN {} is not declared",
                        index + 1,
                        vlan
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_access_ports(&self) -> Result<(), ValidationError> {
        let mut taken: BTreeMap<(u32, &str), &str> = BTreeMap::new();
        for ap in &self.devices.access_points {
            taken.insert((ap.access_switch, ap.port.as_str()), "an access point");
        }

        for port in &self.access_ports {
            self.check_access_switch(port.access_switch, &port.port)
                .map_err(ValidationError::InvalidAccessPort)?;
            if self.vlan(port.vlan).is_none() {
                return Err(ValidationError::InvalidAccessPort(format!(
                    "VLAN {} on access switch {} {} is not declared",
                    port.vlan, port.access_switch, port.port
                )));
            }
            if let Some(owner) = taken.insert((port.access_switch, port.port.as_str()), "an access port") {
                return Err(ValidationError::InvalidAccessPort(format!(
                    "access switch {} {} is already used by {}",
                    port.access_switch, port.port, owner
                )));
            }
        }
        Ok(())
    }

    fn check_access_switch(&self, access_switch: u32, port: &str) -> Result<(), String> {
        if access_switch == 0 || access_switch > self.devices.access_switches {
            return Err(format!(
                "access switch {} does not exist (design has {})",
                access_switch, self.devices.access_switches
            ));
        }
        let front_panel = is_data_port(port)
            && matches!(
                port_numbers(port).as_slice(),
                [n] if (1..=CEOS_DATA_PORTS).contains(n) && port == format!("Ethernet{}", n)
            );
        if !front_panel {
            return Err(format!(
                "{} is not a data port (Ethernet1-Ethernet{})",
                port, CEOS_DATA_PORTS
            ));
        }
        if ACCESS_UPLINK_PORTS.contains(&port) {
            return Err(format!("{} is reserved for the core uplink", port));
        }
        Ok(())
    }

    /// The out-of-band management supermask
    pub fn oob_network(&self) -> Result<Ipv4Network, ValidationError> {
        self.network.oob_prefix.parse::<Ipv4Network>().map_err(|e| {
            ValidationError::InvalidNetwork(format!("invalid oob_prefix '{}': {}", self.network.oob_prefix, e))
        })
    }

    /// Look up a declared VLAN
    pub fn vlan(&self, id: u16) -> Option<VlanProfile> {
        self.vlans.iter().find(|v| v.id == id).map(VlanConfig::profile)
    }

    /// The native VLAN used on access-switch uplinks
    pub fn native_vlan(&self) -> Option<VlanProfile> {
        self.network.native_vlan.and_then(|id| self.vlan(id))
    }
}

/// Name of the management subnet in the address plan
pub const OOB_SUBNET: &str = "OOB";

/// Design identity and placement
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    pub name: String,
    pub building: u32,
    pub floor: u32,
    /// Selects this design's block inside the shared OOB range
    pub net_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Addressing and emulation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub oob_prefix: String,
    pub oob_block_prefix: u8,
    pub mgmt_prefix_len: u8,
    pub core_host_offset: u32,
    pub svi_host_offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<u16>,
    pub dummy_bridge: String,
}

/// A VLAN and, when it is routed, its subnet
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VlanConfig {
    pub id: u16,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
}

impl VlanConfig {
    pub fn profile(&self) -> VlanProfile {
        VlanProfile {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    pub fn network(&self) -> Result<Option<Ipv4Network>, ValidationError> {
        self.subnet
            .as_deref()
            .map(|s| {
                s.parse::<Ipv4Network>().map_err(|e| {
                    ValidationError::InvalidVlan(format!("VLAN {} has invalid subnet '{}': {}", self.id, s, e))
                })
            })
            .transpose()
    }
}

/// Device counts and access-point placement
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DeviceConfig {
    pub access_switches: u32,
    pub access_points: Vec<AccessPointConfig>,
}

/// An access point and the access-switch port it hangs off
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessPointConfig {
    pub access_switch: u32,
    pub port: String,
    #[serde(default)]
    pub vlans: Vec<u16>,
}

/// An access port on an access switch
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessPortConfig {
    pub access_switch: u32,
    pub port: String,
    pub profile: AccessKind,
    pub vlan: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid VLAN configuration: {0}")]
    InvalidVlan(String),
    #[error("Invalid device configuration: {0}")]
    InvalidDevice(String),
    #[error("Invalid access port configuration: {0}")]
    InvalidAccessPort(String),
}

/// Default implementations
impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            oob_prefix: "172.20.20.0/24".to_string(),
            oob_block_prefix: 28,
            mgmt_prefix_len: 24,
            core_host_offset: 2,
            svi_host_offset: 1,
            native_vlan: None,
            dummy_bridge: "br-dummy".to_string(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            access_switches: 2,
            access_points: Vec::new(),
        }
    }
}
