//! Infrastructure layer: the thread-safe registry service and its adapters.

pub mod clock;
pub mod config;
pub mod service;
pub mod settlement;


pub use clock::{ManualClock, SystemClock};
pub use config::{ConfigError, load_from_env, load_from_file};
pub use service::{RegistryEnvelope, RegistryService};
pub use settlement::{InMemoryLedger, Transfer};
