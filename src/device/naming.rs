//! Interface-name parsing and translation.
//!
//! Port names such as `Ethernet7` or `Vlan300` are split into an alphabetic
//! stem and their numeric components. The numeric components drive natural
//! ordering (`Ethernet2` before `Ethernet10`) and the translation into the
//! interface names the emulation layer expects.

use super::types::Device;
use crate::error::DesignError;
use regex::Regex;
use std::sync::LazyLock;

static PORT_NUMBERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Numeric components of an interface name, e.g. `Ethernet1/2` -> `[1, 2]`
pub fn port_numbers(name: &str) -> Vec<u32> {
    PORT_NUMBERS
        .find_iter(name)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .collect()
}

/// Alphabetic stem of an interface name, e.g. `Ethernet7` -> `Ethernet`
pub fn port_stem(name: &str) -> &str {
    let end = name.find(|c: char| c.is_ascii_digit()).unwrap_or(name.len());
    &name[..end]
}

/// Sort key giving natural interface order within a device
pub fn natural_key(name: &str) -> (String, Vec<u32>, String) {
    (port_stem(name).to_string(), port_numbers(name), name.to_string())
}

/// Whether the interface is a front-panel data port on a cEOS device
pub fn is_data_port(name: &str) -> bool {
    port_stem(name) == "Ethernet"
}

/// Translate a device interface name into the container interface name.
///
/// cEOS data ports map `EthernetN` to `ethN`. No other operating system is
/// supported.
pub fn clab_ifname(device: &Device, interface: &str) -> Result<String, DesignError> {
    let unsupported = || DesignError::UnsupportedTranslation {
        device: device.name().to_string(),
        interface: interface.to_string(),
        os_name: device.os_name().to_string(),
    };

    if device.os_name() != "eos" || !is_data_port(interface) {
        return Err(unsupported());
    }

    let port = port_numbers(interface).first().copied().ok_or_else(unsupported)?;
    Ok(format!("eth{}", port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::roles;

    #[test]
    fn test_port_numbers() {
        assert_eq!(port_numbers("Ethernet7"), vec![7]);
        assert_eq!(port_numbers("Ethernet1/2"), vec![1, 2]);
        assert!(port_numbers("wired").is_empty());
    }

    #[test]
    fn test_natural_order() {
        let mut names = vec!["Ethernet10", "Management0", "Ethernet2", "Ethernet1", "Vlan300", "Vlan20"];
        names.sort_by_key(|n| natural_key(n));
        assert_eq!(
            names,
            vec!["Ethernet1", "Ethernet2", "Ethernet10", "Management0", "Vlan20", "Vlan300"]
        );
    }

    #[test]
    fn test_clab_ifname_eos() {
        let core = roles::core_switch(1, 1, 1).unwrap();
        assert_eq!(clab_ifname(&core, "Ethernet3").unwrap(), "eth3");
    }

    #[test]
    fn test_clab_ifname_rejects_non_data_port() {
        let core = roles::core_switch(1, 1, 1).unwrap();
        assert!(matches!(
            clab_ifname(&core, "Management0"),
            Err(DesignError::UnsupportedTranslation { .. })
        ));
    }

    #[test]
    fn test_clab_ifname_rejects_other_os() {
        let ap = roles::access_point(1, 1, 1, None, Vec::new()).unwrap();
        let err = clab_ifname(&ap, "wired0").unwrap_err();
        assert_eq!(
            err,
            DesignError::UnsupportedTranslation {
                device: "ap01.11".to_string(),
                interface: "wired0".to_string(),
                os_name: "meraki".to_string(),
            }
        );
    }
}
