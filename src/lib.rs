// Library interface for Vitalis modules
// The engines are pure functions over caller-supplied snapshots; the CLI in
// main.rs is a thin shell around them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fatigue;
pub mod history;
pub mod insights;
pub mod logging;
pub mod models;
pub mod records;
pub mod streaks;
pub mod targets;
pub mod thresholds;

// Re-export commonly used types for convenience
pub use models::*;
pub use catalog::ExerciseCatalog;
pub use config::AppConfig;
pub use error::{Result, VitalisError};
pub use fatigue::{suggest_focus, FatigueModel};
pub use insights::{Evaluation, InsightEngine, RecoveryBand, Rule};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use thresholds::Thresholds;
