//! Config command: print the effective configuration as TOML

use super::load_config;
use anyhow::Result;

pub fn run(config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
