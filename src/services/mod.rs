pub mod launch;
pub mod probe;
pub mod provider;
pub mod script;

pub use launch::LaunchPlan;
pub use probe::{ConnectionResult, ConnectionStatus, ProbeService, ProbeTarget};
pub use provider::{KeySource, ProviderPatch, ProviderService, ProviderSummary, ResolvedProvider};
