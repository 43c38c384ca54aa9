//! Configuration and path management

pub mod paths;
pub mod settings;

pub use paths::StrataPaths;
pub use settings::Settings;
