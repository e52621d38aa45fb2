// lepasserelle - Bridge & Integration
//
// *La Passerelle* (The Bridge) - CLI, configuration and orchestration over storage and ranking

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Command-line interface.
pub mod cli;
/// Application configuration.
pub mod config;
/// Orchestration over the article store and the recommender.
pub mod conseil;
/// Error taxonomy for the bridge layer.
pub mod errors;

pub use config::{AppConfig, ConfigError, LoggingConfig, RecommenderConfig};
pub use conseil::{ImportSummary, LeConseil};
pub use errors::{ConseilError, Result};

/// Bridge library initialization
pub fn init() {
    let _ = tracing::subscriber::set_default(tracing::subscriber::NoSubscriber::default());
}
