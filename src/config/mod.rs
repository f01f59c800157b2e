/// Configuration system
///
/// - `macros`: the `config_struct!` declaration macro
/// - `schemas`: every configuration section with its defaults
/// - `utils`: loading, environment overrides and validation
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{Config, OpenFdaConfig, SignalsConfig, WebserverConfig};
pub use utils::{
    apply_env_overrides, apply_overrides_from, load_config_from_path, validate_config,
    CONFIG_FILE_PATH, ENV_API_KEY, ENV_BASE_URL,
};
