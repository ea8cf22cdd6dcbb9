pub mod catalog;
pub mod combo;
pub mod config;
pub mod effects;
pub mod history;
pub mod registry;
pub mod selector;
pub mod system;
pub mod tasks;

pub use catalog::Catalog;
pub use config::{ConfigError, PowerUpConfig};
pub use registry::Transition;
pub use system::{PowerUpSnapshot, PowerUpSystem};
