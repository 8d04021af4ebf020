//! Environment source: SHEAR_SECTION__KEY=value

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add `SHEAR_*` variables, `__` separating nested keys.
///
/// `SHEAR_LOG*` and `SHEAR_ENV` are read directly by logging and the
/// workspace source; they land on unknown top-level keys and are ignored.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("SHEAR")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
