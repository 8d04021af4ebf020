//! Config loader facade: assembles the layered sources into a [`ShearConfig`].

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::ShearConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`ShearConfig`] from defaults, files and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `config/config.toml`, `config/{SHEAR_ENV}.toml`, `SHEAR_*` variables.
    pub fn load(workspace_root: &Path) -> Result<ShearConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: ShearConfig = builder.build()?.try_deserialize()?;
        debug!(workspace_root = %workspace_root.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<ShearConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Location of the global configuration file, if one can be determined
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
