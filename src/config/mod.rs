//! Configuration and path management for Splitpenny

pub mod paths;
pub mod settings;

pub use paths::SplitpennyPaths;
pub use settings::Settings;
