//! Network topology module.
//!
//! This module contains the cabling planner, which pairs access-switch
//! uplinks with core ports and mints cable identifiers, and the graph
//! builder, which classifies every interface for the emulation renderer.

pub mod cabling;
pub mod graph;

// Re-export key types and functions for easier access
pub use cabling::{uplink_ports, CableAssignment, CablingPlanner, Endpoint};
pub use graph::{BridgedPort, CabledPair, PeerSide, TopologyGraph, TopologyGraphBuilder};
