use super::Config;
use crate::error::ConfigError;
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.deepdraft/config.toml`, creating it with defaults on first
    /// run, then apply environment overrides and validate. This is the only
    /// place configuration is read; everything downstream receives the
    /// constructed struct.
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or(ConfigError::NoHomeDir)?;
        let deepdraft_dir = home.join(".deepdraft");
        let config_path = deepdraft_dir.join("config.toml");

        if !deepdraft_dir.exists() {
            fs::create_dir_all(&deepdraft_dir)?;
        }

        let mut config = Self::load_from_path(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let mut config: Config = toml::from_str(&contents)?;
            config.config_path = config_path.to_path_buf();
            Ok(config)
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&self.config_path, toml_str)?;
        Ok(())
    }
}
