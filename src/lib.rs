// Core modules
mod config;
mod error;
mod provider;
mod services;

// CLI module
pub mod cli;

// Public exports
pub use config::{
    bin_dir, config_dir, config_path, local_agent_path, provider_state_dir,
    remove_provider_state_dir, root_dir, ProvidersConfig, HOME_ENV,
};
pub use error::AppError;
pub use provider::{find_preset, Preset, ProviderCategory, ProviderRecord, PRESETS};
pub use services::launch::find_agent;
pub use services::probe::{classify_status, Reachability, PROBE_TIMEOUT};
pub use services::script::{generate_scripts, render_script, script_name, ScriptOutcome};
pub use services::{
    ConnectionResult, ConnectionStatus, KeySource, LaunchPlan, ProbeService, ProbeTarget,
    ProviderPatch, ProviderService, ProviderSummary, ResolvedProvider,
};
