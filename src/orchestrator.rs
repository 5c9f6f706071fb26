//! Design orchestrator.
//!
//! Coordinates one design evaluation from validated configuration to output
//! files: build the design, classify its interfaces, render the containerlab
//! topology and the JSON reports, then write them out. Every step runs
//! before anything touches the filesystem, so a failing design leaves no
//! partial output behind.

use crate::clab::{render_topology, ClabTopology, RenderOptions};
use crate::config::Config;
use crate::design::{build_std_design, Design};
use crate::ip::{AddressAssignment, Subnet};
use crate::topology::{CableAssignment, TopologyGraph};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `<design>.addresses.json`
#[derive(Serialize, Debug)]
pub struct AddressReport<'a> {
    pub design: &'a str,
    pub net_id: u32,
    pub subnets: Vec<&'a Subnet>,
    pub interfaces: Vec<&'a AddressAssignment>,
}

/// Contents of `<design>.cabling.json`
#[derive(Serialize, Debug)]
pub struct CablingReport<'a> {
    pub design: &'a str,
    pub cables: Vec<&'a CableAssignment>,
    pub graph: &'a TopologyGraph,
}

/// Everything produced for one design
#[derive(Debug)]
pub struct DesignOutput {
    pub design: Design,
    pub graph: TopologyGraph,
    pub topology: ClabTopology,
}

impl DesignOutput {
    pub fn topology_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.topology).wrap_err("Failed to serialize containerlab topology")
    }

    pub fn addresses_json(&self) -> Result<String> {
        let report = AddressReport {
            design: &self.design.name,
            net_id: self.design.net_id,
            subnets: self.design.plan.subnets().collect(),
            interfaces: self.design.addresses.assignments(),
        };
        serde_json::to_string_pretty(&report).wrap_err("Failed to serialize address report")
    }

    pub fn cabling_json(&self) -> Result<String> {
        let report = CablingReport {
            design: &self.design.name,
            cables: self.design.cabling.cables(),
            graph: &self.graph,
        };
        serde_json::to_string_pretty(&report).wrap_err("Failed to serialize cabling report")
    }

    /// Write the topology and both reports into `output_dir`
    pub fn write_to(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let files = [
            (format!("{}.clab.yaml", self.design.name), self.topology_yaml()?),
            (format!("{}.addresses.json", self.design.name), self.addresses_json()?),
            (format!("{}.cabling.json", self.design.name), self.cabling_json()?),
        ];

        fs::create_dir_all(output_dir)
            .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

        let mut written = Vec::with_capacity(files.len());
        for (file_name, content) in files {
            let path = output_dir.join(file_name);
            fs::write(&path, content).wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
            info!("SAVE: {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Build, classify and render one design
pub fn evaluate_design(config: &Config, options: &RenderOptions) -> Result<DesignOutput> {
    let name = &config.general.name;

    let design = build_std_design(config).wrap_err_with(|| format!("Failed to build design '{}'", name))?;
    let graph = design
        .topology_graph()
        .wrap_err_with(|| format!("Failed to classify interfaces of design '{}'", name))?;
    let topology = render_topology(&design, &graph, options)
        .wrap_err_with(|| format!("Failed to render design '{}'", name))?;

    info!(
        "Design '{}': {} cabled, {} used-uncabled, {} unused ports",
        name,
        graph.cabled.len(),
        graph.used_uncabled.len(),
        graph.unused.len()
    );
    Ok(DesignOutput { design, graph, topology })
}
