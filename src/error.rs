//! Design build errors.
//!
//! Every variant is fatal for the design being evaluated: nothing is retried
//! and no artifact is written once one of these is raised.

use ipnetwork::Ipv4Network;

/// Errors raised while synthesising addresses and cabling for a design
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DesignError {
    #[error("net_id {net_id} is out of range: {base} holds {available} /{block_prefix} blocks")]
    OutOfRange {
        base: Ipv4Network,
        block_prefix: u8,
        net_id: u32,
        available: u64,
    },

    #[error("host offset {offset} does not fit in {block}")]
    OffsetOverflow { block: Ipv4Network, offset: u32 },

    #[error("invalid block prefix /{block_prefix} for base network {base}")]
    InvalidPrefix { base: Ipv4Network, block_prefix: u8 },

    #[error("subnet {name} ({network}) overlaps {existing} ({existing_network})")]
    SubnetOverlap {
        name: String,
        network: Ipv4Network,
        existing: String,
        existing_network: Ipv4Network,
    },

    #[error("{device}:{interface} already carries cable {existing}, cannot assign {requested}")]
    ReassignmentConflict {
        device: String,
        interface: String,
        existing: String,
        requested: String,
    },

    #[error("core {core} has {capacity} data ports, access device {access} (ordinal {ordinal}) needs ports {first} and {second}")]
    CapacityExceeded {
        core: String,
        access: String,
        ordinal: u32,
        first: u32,
        second: u32,
        capacity: u32,
    },

    #[error("device ordinal must start at 1, got {ordinal}")]
    InvalidOrdinal { ordinal: u32 },

    #[error("unknown device: {device}")]
    UnknownDevice { device: String },

    #[error("device {device} already exists")]
    DuplicateDevice { device: String },

    #[error("unknown subnet: {name}")]
    UnknownSubnet { name: String },

    #[error("unknown interface {device}:{interface}")]
    UnknownInterface { device: String, interface: String },

    #[error("{device}:{interface} already has address {existing}, cannot assign {requested}")]
    AddressConflict {
        device: String,
        interface: String,
        existing: Ipv4Network,
        requested: Ipv4Network,
    },

    #[error("cannot translate interface {device}:{interface} for os '{os_name}'")]
    UnsupportedTranslation {
        device: String,
        interface: String,
        os_name: String,
    },
}
