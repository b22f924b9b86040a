//! Whole-simulation configuration, loaded from one TOML document

use horizon_core::{HorizonError, Result};
use horizon_field::AttractorConfig;
use horizon_particles::{DiskConfig, JetConfig, RingConfig};
use horizon_shell::ShellConfig;
use horizon_swarm::SwarmConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every component's configuration. Missing keys and tables fall back to
/// the reference defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the shared random source
    pub seed: u32,
    /// Rest radius of the generated icosphere shell
    pub shell_radius: f32,
    pub shell_subdivisions: u32,
    pub node_count: usize,
    /// Nodes start scattered inside this fraction of the shell radius
    pub node_spread: f32,

    pub attractor: AttractorConfig,
    pub shell: ShellConfig,
    pub swarm: SwarmConfig,
    pub disk: DiskConfig,
    pub jets: JetConfig,
    pub ring: RingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            shell_radius: 8.0,
            shell_subdivisions: 2,
            node_count: 24,
            node_spread: 0.6,
            attractor: AttractorConfig::default(),
            shell: ShellConfig::default(),
            swarm: SwarmConfig::default(),
            disk: DiskConfig::default(),
            jets: JetConfig::default(),
            ring: RingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            HorizonError::TomlParseError(msg) => {
                HorizonError::TomlParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        HorizonError::check_range("shell_radius", self.shell_radius, 1e-3, f32::MAX)?;
        HorizonError::check_range("node_spread", self.node_spread, 0.0, 1.0)?;
        if self.shell_subdivisions > 5 {
            return Err(HorizonError::InvalidConfig(format!(
                "shell_subdivisions ({}) must be at most 5",
                self.shell_subdivisions
            )));
        }
        self.attractor.validate()?;
        self.shell.validate()?;
        self.swarm.validate()?;
        self.disk.validate()?;
        self.jets.validate()?;
        self.ring.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
seed = 9
node_count = 4

[attractor]
mass = 400.0

[disk]
capacity = 64
"#,
        )
        .unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.node_count, 4);
        assert_eq!(config.attractor.mass, 400.0);
        assert_eq!(config.attractor.horizon_radius, 6.0);
        assert_eq!(config.disk.capacity, 64);
        assert_eq!(config.shell, ShellConfig::default());
    }

    #[test]
    fn dumped_defaults_parse_back() {
        let text = SimConfig::default().to_toml_string().unwrap();
        assert!(text.contains("[attractor]"));
        assert!(text.contains("[ring]"));
        let parsed = SimConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, SimConfig::default());
    }

    #[test]
    fn invalid_values_rejected() {
        let err = SimConfig::from_toml_str("[shell]\nsubsteps = 0").unwrap_err();
        assert!(matches!(err, HorizonError::InvalidConfig(_)));

        let err = SimConfig::from_toml_str("[shell]\ndamping = 1.5").unwrap_err();
        assert!(matches!(err, HorizonError::ValueOutOfRange { .. }));

        let err = SimConfig::from_toml_str("[disk]\ninner_radius = 30.0").unwrap_err();
        assert!(matches!(err, HorizonError::InvalidConfig(_)));

        let err = SimConfig::from_toml_str("[attractor]\nhorizon_radius = 1.0").unwrap_err();
        assert!(matches!(err, HorizonError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SimConfig::from_toml_str("seed = [").unwrap_err();
        assert!(matches!(err, HorizonError::TomlParseError(_)));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("horizon-config-{}.toml", std::process::id()));
        std::fs::write(&path, "shell_radius = 10.0\n").unwrap();
        let config = SimConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.shell_radius, 10.0);

        let missing = SimConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(HorizonError::IoError(_))));
    }
}
