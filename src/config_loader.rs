use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a design configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading design from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open design file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse design file '{}'", config_path.display()))?;

    config
        .validate()
        .wrap_err_with(|| format!("Design file '{}' is invalid", config_path.display()))?;

    info!(
        "Loaded design '{}' (building {}, floor {}, net_id {})",
        config.general.name, config.general.building, config.general.floor, config.general.net_id
    );
    Ok(config)
}
