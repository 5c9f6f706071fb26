//! IP address planning module.
//!
//! This module handles address planning for a design: carving per-design
//! management blocks out of a shared out-of-band range, computing host
//! addresses from offsets, and keeping the per-design subnet plan and
//! interface address book.

pub mod planner;
pub mod plan;

// Re-export commonly used types
pub use planner::{carve, host_address, interface_address};
pub use plan::{AddressAssignment, AddressBook, AddressPlan, Subnet};
