pub mod error;
pub mod locations;
pub mod settings;

pub use error::ConfigError;
pub use locations::LocationSet;
pub use settings::AssemblySettings;
