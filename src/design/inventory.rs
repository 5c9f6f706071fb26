//! Device inventory for one design evaluation.

use crate::device::Device;
use crate::error::DesignError;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// All devices of a design, keyed by hostname
#[derive(Debug, Default, Clone)]
pub struct Inventory {
    devices: BTreeMap<String, Device>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device and return its hostname. A hostname already in the
    /// inventory is rejected and the existing device is left untouched.
    pub fn add(&mut self, device: Device) -> Result<String, DesignError> {
        let name = device.name().to_string();
        match self.devices.entry(name.clone()) {
            Entry::Occupied(_) => Err(DesignError::DuplicateDevice { device: name }),
            Entry::Vacant(slot) => {
                slot.insert(device);
                Ok(name)
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<&Device, DesignError> {
        self.devices.get(name).ok_or_else(|| DesignError::UnknownDevice {
            device: name.to_string(),
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Device, DesignError> {
        self.devices.get_mut(name).ok_or_else(|| DesignError::UnknownDevice {
            device: name.to_string(),
        })
    }

    /// Devices in `(file, rank)` order, then by name
    pub fn sorted(&self) -> Vec<&Device> {
        let mut devices: Vec<&Device> = self.devices.values().collect();
        devices.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.name().cmp(b.name())));
        devices
    }

    /// Devices that exist in the emulated testbed
    pub fn real_devices(&self) -> Vec<&Device> {
        self.sorted().into_iter().filter(|dev| !dev.is_pseudo()).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
