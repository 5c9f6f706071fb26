//! Cabling graph classification.
//!
//! Every interface of every emulated device ends up in exactly one bucket:
//! cabled to a peer, used but not cabled, or unused. Uncabled interfaces and
//! placeholder peers each take the next synthetic bridge index so the
//! emulation layer can give them unique, stable identifiers.

use super::cabling::{CableAssignment, Endpoint};
use crate::design::Inventory;
use crate::device::CablePortId;
use crate::error::DesignError;
use serde::Serialize;
use std::collections::BTreeSet;

/// The far side of a cabled pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerSide {
    /// A real interface on an emulated device
    Port(Endpoint),
    /// Stand-in for a device that is not emulated
    Placeholder { bridge_index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CabledPair {
    pub cable_id: String,
    pub side_a: Endpoint,
    pub side_b: PeerSide,
}

/// An uncabled interface and its synthetic bridge index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgedPort {
    pub endpoint: Endpoint,
    pub bridge_index: u32,
}

/// Render-ready adjacency description of a design.
///
/// Used management ports and SVIs are listed in `used_uncabled` and take a
/// bridge index like any other port. Renderers that leave them out (the
/// container provides them) therefore see gaps in the index sequence; the
/// remaining indices are still unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopologyGraph {
    pub cabled: Vec<CabledPair>,
    pub used_uncabled: Vec<BridgedPort>,
    pub unused: Vec<BridgedPort>,
}

impl TopologyGraph {
    /// Number of synthetic bridge indices handed out
    pub fn bridge_ports(&self) -> u32 {
        let placeholders = self
            .cabled
            .iter()
            .filter(|pair| matches!(pair.side_b, PeerSide::Placeholder { .. }))
            .count();
        (placeholders + self.used_uncabled.len() + self.unused.len()) as u32
    }
}

/// Classifies interfaces into cabled, used-uncabled and unused
#[derive(Debug)]
pub struct TopologyGraphBuilder<'a> {
    inventory: &'a Inventory,
    next_bridge_index: u32,
}

impl<'a> TopologyGraphBuilder<'a> {
    pub fn new(inventory: &'a Inventory) -> Self {
        Self {
            inventory,
            next_bridge_index: 0,
        }
    }

    fn take_bridge_index(&mut self) -> u32 {
        let index = self.next_bridge_index;
        self.next_bridge_index += 1;
        index
    }

    /// Whether an endpoint stands for a device that is not emulated
    fn is_placeholder(&self, endpoint: &Endpoint) -> Result<bool, DesignError> {
        let device = self.inventory.get(&endpoint.device)?;
        let iface = device.interface(&endpoint.interface)?;
        Ok(device.is_pseudo() || iface.cable_port_id == CablePortId::NoValidate)
    }

    /// Build the graph from the finished inventory and its cables. Cables are
    /// processed in cable-id order and devices in `(file, rank)` order, so the
    /// output is identical for identical input.
    pub fn build(mut self, cables: &[&CableAssignment]) -> Result<TopologyGraph, DesignError> {
        let mut graph = TopologyGraph::default();
        let mut cabled_ports: BTreeSet<Endpoint> = BTreeSet::new();

        let mut cables: Vec<&CableAssignment> = cables.to_vec();
        cables.sort_by(|a, b| a.cable_id.cmp(&b.cable_id));

        for cable in cables {
            let (end_a, end_b) = cable.sorted_endpoints();
            cabled_ports.insert(end_a.clone());
            cabled_ports.insert(end_b.clone());

            let side_a = match (self.is_placeholder(end_a)?, self.is_placeholder(end_b)?) {
                (false, false) => {
                    graph.cabled.push(CabledPair {
                        cable_id: cable.cable_id.clone(),
                        side_a: end_a.clone(),
                        side_b: PeerSide::Port(end_b.clone()),
                    });
                    continue;
                }
                (false, true) => end_a,
                (true, false) => end_b,
                (true, true) => {
                    log::debug!("Cable {} joins two pseudo endpoints; not rendered", cable.cable_id);
                    continue;
                }
            };

            let bridge_index = self.take_bridge_index();
            graph.cabled.push(CabledPair {
                cable_id: cable.cable_id.clone(),
                side_a: side_a.clone(),
                side_b: PeerSide::Placeholder { bridge_index },
            });
        }

        for device in self.inventory.real_devices() {
            for iface in device.interfaces() {
                let endpoint = Endpoint::new(device.name(), iface.name.clone());
                if cabled_ports.contains(&endpoint) {
                    continue;
                }

                let port = BridgedPort {
                    endpoint,
                    bridge_index: self.take_bridge_index(),
                };
                if iface.used() {
                    graph.used_uncabled.push(port);
                } else {
                    graph.unused.push(port);
                }
            }
        }

        log::debug!(
            "Topology graph: {} cabled, {} used-uncabled, {} unused",
            graph.cabled.len(),
            graph.used_uncabled.len(),
            graph.unused.len()
        );
        Ok(graph)
    }
}
