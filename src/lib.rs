//! # floornet - cabling and address synthesis for building-floor networks
//!
//! This library turns a short description of a building floor (how many
//! access switches, which access points hang off which ports, which VLANs are
//! routed) into a fully cabled device graph with a deterministic address plan,
//! and renders that graph as a containerlab topology.
//!
//! ## Overview
//!
//! Each floor has one core switch. Access switches are dual-homed to it on
//! core ports chosen by the access switch ordinal, access points attach to
//! access-switch ports, and routed VLANs terminate on core SVIs. Management
//! addresses come from a per-design block carved out of a shared OOB range
//! by the design's `net_id`, so many floors can share one management network.
//!
//! ## Architecture
//!
//! - `config`: Design file structures and validation
//! - `config_loader`: Design file loading
//! - `error`: Design build errors
//! - `ip`: Subnet carving, address plan and address book
//! - `device`: Devices, interfaces, profiles and role port tables
//! - `vlan`: VLAN profiles and per-device VLAN resolution
//! - `topology`: Cabling planner and interface classification
//! - `design`: The per-floor design aggregate and the standard build
//! - `clab`: Containerlab topology rendering
//! - `orchestrator`: Build, render and write one design
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use floornet::clab::RenderOptions;
//! use floornet::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("designs/b1_f1.yaml"))?;
//! let output = orchestrator::evaluate_design(&config, &RenderOptions::new("br-dummy"))?;
//!
//! // clab_output now holds b1_f1.clab.yaml, b1_f1.addresses.json
//! // and b1_f1.cabling.json
//! output.write_to(Path::new("clab_output"))?;
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Error Handling
//!
//! Domain failures are `error::DesignError` values carrying the device,
//! interface and value involved. The loader and orchestrator wrap them with
//! `color_eyre` context. Every error is fatal for its design and nothing is
//! written for a design that fails.

pub mod config;
pub mod config_loader;
pub mod error;

pub mod ip;
pub mod device;
pub mod vlan;
pub mod topology;
pub mod design;
pub mod clab;
pub mod orchestrator;
