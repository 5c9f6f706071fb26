#[cfg(test)]
mod design_regression_tests {
    use std::collections::BTreeSet;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    use floornet::clab::RenderOptions;
    use floornet::config::Config;
    use floornet::config_loader::load_config;
    use floornet::design::build_std_design;
    use floornet::error::DesignError;
    use floornet::orchestrator::{evaluate_design, DesignOutput};
    use floornet::topology::PeerSide;

    fn design_file(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("designs").join(name)
    }

    fn load(name: &str) -> Config {
        load_config(&design_file(name)).unwrap()
    }

    fn evaluate(name: &str) -> DesignOutput {
        evaluate_design(&load(name), &RenderOptions::new("br-dummy")).unwrap()
    }

    fn mgmt(output: &DesignOutput, device: &str) -> String {
        output
            .design
            .addresses
            .get(device, "Management0")
            .unwrap()
            .address
            .to_string()
    }

    #[test]
    fn test_sample_designs_load() {
        for name in ["b1_f1.yaml", "b1_f2.yaml", "b2_f9.yaml"] {
            let config = load(name);
            assert_eq!(format!("{}.yaml", config.general.name), name);
        }
    }

    #[test]
    fn test_management_addresses_per_net_id() {
        let b1_f1 = evaluate("b1_f1.yaml");
        assert_eq!(mgmt(&b1_f1, "core01.11"), "172.20.20.2/24");
        assert_eq!(mgmt(&b1_f1, "acc01.11"), "172.20.20.3/24");
        assert_eq!(mgmt(&b1_f1, "acc02.11"), "172.20.20.4/24");

        let b1_f2 = evaluate("b1_f2.yaml");
        assert_eq!(mgmt(&b1_f2, "core01.12"), "172.20.20.18/24");
        assert_eq!(mgmt(&b1_f2, "acc02.12"), "172.20.20.20/24");

        let b2_f9 = evaluate("b2_f9.yaml");
        assert_eq!(mgmt(&b2_f9, "core01.29"), "172.20.20.34/24");
    }

    #[test]
    fn test_uplink_cable_pairs() {
        let output = evaluate("b1_f1.yaml");
        let pairs: Vec<(String, String, String)> = output
            .graph
            .cabled
            .iter()
            .filter_map(|pair| match &pair.side_b {
                PeerSide::Port(peer) => Some((pair.cable_id.clone(), pair.side_a.to_string(), peer.to_string())),
                PeerSide::Placeholder { .. } => None,
            })
            .collect();

        let expected = [
            ("uplink_acc01.11_core01.11_1", "acc01.11:Ethernet7", "core01.11:Ethernet1"),
            ("uplink_acc01.11_core01.11_2", "acc01.11:Ethernet8", "core01.11:Ethernet2"),
            ("uplink_acc02.11_core01.11_1", "acc02.11:Ethernet7", "core01.11:Ethernet3"),
            ("uplink_acc02.11_core01.11_2", "acc02.11:Ethernet8", "core01.11:Ethernet4"),
        ];
        let expected: Vec<(String, String, String)> = expected
            .iter()
            .map(|(id, a, b)| (id.to_string(), a.to_string(), b.to_string()))
            .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_access_point_renders_as_placeholder() {
        let output = evaluate("b1_f1.yaml");

        let ap_pair = output
            .graph
            .cabled
            .iter()
            .find(|pair| pair.cable_id == "uplink_ap01.11_acc01.11_1")
            .unwrap();
        assert_eq!(ap_pair.side_a.to_string(), "acc01.11:Ethernet1");
        assert_eq!(ap_pair.side_b, PeerSide::Placeholder { bridge_index: 0 });

        let yaml = output.topology_yaml().unwrap();
        assert!(!yaml.contains("ap01.11"));
        assert!(yaml.contains("acc01.11:eth1"));
        assert!(yaml.contains("br-dummy:0"));
    }

    #[test]
    fn test_core_svis_for_routed_vlans() {
        let output = evaluate("b1_f1.yaml");
        let core = output.design.device("core01").unwrap();

        let svis: Vec<&str> = core
            .interfaces()
            .iter()
            .map(|iface| iface.name.as_str())
            .filter(|name| name.starts_with("Vlan"))
            .collect();
        assert_eq!(svis, vec!["Vlan100", "Vlan300", "Vlan301"]);

        let visitor = output.design.addresses.get("core01.11", "Vlan301").unwrap();
        assert_eq!(visitor.address.to_string(), "10.200.1.1/24");
    }

    #[test]
    fn test_bridge_indices_are_unique() {
        let output = evaluate("b1_f1.yaml");
        let graph = &output.graph;

        let mut indices = BTreeSet::new();
        for pair in &graph.cabled {
            if let PeerSide::Placeholder { bridge_index } = pair.side_b {
                assert!(indices.insert(bridge_index));
            }
        }
        for port in graph.used_uncabled.iter().chain(graph.unused.iter()) {
            assert!(indices.insert(port.bridge_index));
        }
        assert_eq!(indices.len() as u32, graph.bridge_ports());
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = evaluate("b1_f1.yaml");
        let second = evaluate("b1_f1.yaml");
        assert_eq!(first.topology_yaml().unwrap(), second.topology_yaml().unwrap());
        assert_eq!(first.addresses_json().unwrap(), second.addresses_json().unwrap());
        assert_eq!(first.cabling_json().unwrap(), second.cabling_json().unwrap());
    }

    #[test]
    fn test_outputs_written_per_design() {
        let dir = TempDir::new().unwrap();
        for name in ["b1_f1.yaml", "b1_f2.yaml"] {
            evaluate(name).write_to(dir.path()).unwrap();
        }

        for file in [
            "b1_f1.clab.yaml",
            "b1_f1.addresses.json",
            "b1_f1.cabling.json",
            "b1_f2.clab.yaml",
        ] {
            assert!(dir.path().join(file).exists(), "{} missing", file);
        }
    }

    #[test]
    fn test_overlapping_subnets_rejected() {
        let yaml = r#"
general:
  name: b3_f1
  building: 3
  floor: 1
  net_id: 1
vlans:
  - { id: 10, name: Phones, subnet: 10.10.0.0/16 }
  - { id: 20, name: Printers, subnet: 10.10.2.0/24 }
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        let err = build_std_design(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DesignError>(),
            Some(DesignError::SubnetOverlap { .. })
        ));
    }

    #[test]
    fn test_core_capacity_exceeded() {
        let mut config = load("b1_f2.yaml");
        config.devices.access_switches = 5;

        let err = evaluate_design(&config, &RenderOptions::new("br-dummy")).unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("has 8 data ports")));
    }

    #[test]
    fn test_net_id_beyond_oob_range() {
        let mut config = load("b1_f2.yaml");
        config.general.net_id = 17;

        let err = build_std_design(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DesignError>(),
            Some(DesignError::OutOfRange { net_id: 17, available: 16, .. })
        ));
    }
}
