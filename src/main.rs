use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use floornet::clab::{RenderOptions, DEFAULT_CEOS_IMAGE};
use floornet::config::Config;
use floornet::config_loader::load_config;
use floornet::orchestrator::evaluate_design;
use log::info;
use std::path::{Path, PathBuf};

/// Synthesize cabling, addressing and containerlab topologies for
/// building-floor network designs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Design YAML file; repeat to evaluate several designs
    #[arg(short, long, required = true)]
    config: Vec<PathBuf>,

    /// Output directory for topology and report files
    #[arg(short, long, default_value = "clab_output")]
    output: PathBuf,

    /// Name of the dummy bridge, overriding the design's `dummy_bridge`
    #[arg(long)]
    dummy_bridge: Option<String>,

    /// Container image for cEOS nodes
    #[arg(long, default_value = DEFAULT_CEOS_IMAGE)]
    image: String,

    /// Print topologies to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Designs are loaded before logging starts so the first design's
    // log_level can serve as the default filter
    let configs = args
        .config
        .iter()
        .map(|path| load_config(path))
        .collect::<Result<Vec<_>>>()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(default_log_level(&configs))).init();

    // Loader output from before init is lost, so report what was loaded here
    for (path, config) in args.config.iter().zip(&configs) {
        info!("{}", loaded_summary(path, config));
    }
    info!("Evaluating {} design(s)", configs.len());

    for config in &configs {
        let mut options = RenderOptions::new(
            args.dummy_bridge
                .clone()
                .unwrap_or_else(|| config.network.dummy_bridge.clone()),
        );
        options.ceos_image = args.image.clone();

        let output = evaluate_design(config, &options)?;

        if args.stdout {
            println!("{}", output.topology_yaml()?);
        } else {
            output.write_to(&args.output)?;
        }
    }

    info!("Done");
    Ok(())
}

/// Default log filter: the first design's `log_level`, else `info`
fn default_log_level(configs: &[Config]) -> String {
    configs
        .first()
        .and_then(|config| config.general.log_level.clone())
        .unwrap_or_else(|| "info".to_string())
}

fn loaded_summary(path: &Path, config: &Config) -> String {
    let general = &config.general;
    format!(
        "Loaded design '{}' from {} (building {}, floor {}, net_id {})",
        general.name,
        path.display(),
        general.building,
        general.floor,
        general.net_id
    )
}
