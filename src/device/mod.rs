//! Device and interface model.
//!
//! Devices are plain values tagged with a role. Role builder functions in
//! `roles` assemble each device's interfaces from a port table, and all
//! interface mutation goes through `InterfaceUpdate` so a change is either
//! applied in full or not at all.

pub mod types;
pub mod roles;
pub mod naming;

pub use types::{AccessKind, CablePortId, Device, Interface, InterfaceProfile, InterfaceUpdate, Role};
pub use naming::clab_ifname;
