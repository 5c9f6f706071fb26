//! Containerlab topology document types.
//!
//! Only the shape floornet needs is modelled: named nodes with a kind and a
//! management address, and point-to-point links between `node:interface`
//! endpoints.

use serde::Serialize;
use std::collections::BTreeMap;

/// Root of a `<design>.clab.yaml` file
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClabTopology {
    /// Lab name, the design name
    pub name: String,
    pub topology: ClabTopologyBody,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClabTopologyBody {
    /// Per-kind defaults, keyed by kind
    pub kinds: BTreeMap<String, ClabKind>,
    /// Nodes keyed by hostname
    pub nodes: BTreeMap<String, ClabNode>,
    pub links: Vec<ClabLink>,
}

/// Defaults shared by all nodes of one kind
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClabKind {
    pub image: String,
}

/// A lab node. Emulated devices carry their management address; the dummy
/// bridge has none.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClabNode {
    pub kind: String,
    #[serde(rename = "mgmt-ipv4", skip_serializing_if = "Option::is_none")]
    pub mgmt_ipv4: Option<String>,
}

/// A link between two `node:interface` endpoints
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClabLink {
    pub endpoints: [String; 2],
}

impl ClabLink {
    pub fn new(side_a: String, side_b: String) -> Self {
        Self {
            endpoints: [side_a, side_b],
        }
    }
}
