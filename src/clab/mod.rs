//! # Containerlab rendering
//!
//! Turns a finished design and its topology graph into a containerlab
//! topology. Every emulated device becomes a `ceos` node. Cabled pairs become
//! links between the two device ports; each port without a real peer is
//! linked to the dummy bridge so the container still gets the interface.
//!
//! Bridge-side endpoints are written `<bridge>:<index>`, where the index is
//! the synthetic bridge index from the graph.

pub mod types;

// Re-export commonly used types
pub use types::{ClabKind, ClabLink, ClabNode, ClabTopology, ClabTopologyBody};

use crate::design::Design;
use crate::device::{clab_ifname, Device};
use crate::error::DesignError;
use crate::topology::{BridgedPort, Endpoint, PeerSide, TopologyGraph};
use std::collections::BTreeMap;

/// Container image used for cEOS nodes unless overridden
pub const DEFAULT_CEOS_IMAGE: &str = "ceos:latest";

const CEOS_KIND: &str = "ceos";
const BRIDGE_KIND: &str = "bridge";

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Name of the bridge node standing in for absent peers
    pub dummy_bridge: String,
    pub ceos_image: String,
}

impl RenderOptions {
    pub fn new(dummy_bridge: impl Into<String>) -> Self {
        Self {
            dummy_bridge: dummy_bridge.into(),
            ceos_image: DEFAULT_CEOS_IMAGE.to_string(),
        }
    }
}

/// Containerlab node kind for a device
fn node_kind(device: &Device) -> Result<&'static str, DesignError> {
    match device.os_name() {
        "eos" => Ok(CEOS_KIND),
        os_name => Err(DesignError::UnsupportedTranslation {
            device: device.name().to_string(),
            interface: String::new(),
            os_name: os_name.to_string(),
        }),
    }
}

struct Renderer<'a> {
    design: &'a Design,
    options: &'a RenderOptions,
}

impl Renderer<'_> {
    fn port(&self, endpoint: &Endpoint) -> Result<String, DesignError> {
        let device = self.design.inventory.get(&endpoint.device)?;
        Ok(format!("{}:{}", device.name(), clab_ifname(device, &endpoint.interface)?))
    }

    fn bridge_port(&self, bridge_index: u32) -> String {
        format!("{}:{}", self.options.dummy_bridge, bridge_index)
    }

    fn bridged_link(&self, port: &BridgedPort) -> Result<ClabLink, DesignError> {
        Ok(ClabLink::new(self.port(&port.endpoint)?, self.bridge_port(port.bridge_index)))
    }

    /// Used ports the container provides on its own are left out
    fn emulator_provided(&self, endpoint: &Endpoint) -> Result<bool, DesignError> {
        let iface = self.design.inventory.get(&endpoint.device)?.interface(&endpoint.interface)?;
        Ok(iface
            .profile
            .as_ref()
            .is_some_and(|profile| profile.is_mgmt_only() || profile.is_virtual()))
    }

    fn nodes(&self) -> Result<BTreeMap<String, ClabNode>, DesignError> {
        let mut nodes = BTreeMap::new();
        for device in self.design.inventory.real_devices() {
            let node = ClabNode {
                kind: node_kind(device)?.to_string(),
                mgmt_ipv4: device.primary_ip().map(|ip| ip.to_string()),
            };
            nodes.insert(device.name().to_string(), node);
        }
        nodes.insert(
            self.options.dummy_bridge.clone(),
            ClabNode {
                kind: BRIDGE_KIND.to_string(),
                mgmt_ipv4: None,
            },
        );
        Ok(nodes)
    }

    fn links(&self, graph: &TopologyGraph) -> Result<Vec<ClabLink>, DesignError> {
        let mut links = Vec::new();

        for pair in &graph.cabled {
            let side_b = match &pair.side_b {
                PeerSide::Port(endpoint) => self.port(endpoint)?,
                PeerSide::Placeholder { bridge_index } => self.bridge_port(*bridge_index),
            };
            links.push(ClabLink::new(self.port(&pair.side_a)?, side_b));
        }

        for port in &graph.used_uncabled {
            if self.emulator_provided(&port.endpoint)? {
                continue;
            }
            links.push(self.bridged_link(port)?);
        }

        for port in &graph.unused {
            links.push(self.bridged_link(port)?);
        }
        Ok(links)
    }
}

/// Render a containerlab topology for a design
pub fn render_topology(
    design: &Design,
    graph: &TopologyGraph,
    options: &RenderOptions,
) -> Result<ClabTopology, DesignError> {
    let renderer = Renderer { design, options };

    let mut kinds = BTreeMap::new();
    kinds.insert(
        CEOS_KIND.to_string(),
        ClabKind {
            image: options.ceos_image.clone(),
        },
    );

    let topology = ClabTopology {
        name: design.name.clone(),
        topology: ClabTopologyBody {
            kinds,
            nodes: renderer.nodes()?,
            links: renderer.links(graph)?,
        },
    };

    log::info!(
        "Rendered {}: {} nodes, {} links",
        topology.name,
        topology.topology.nodes.len(),
        topology.topology.links.len()
    );
    Ok(topology)
}
