mod backend;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use io::atomic_write_str;
pub use paths::{ConfigError, TspPaths};

use once_cell::sync::Lazy;

// Resolved once per process (portable via TSP_BASE_DIR, or the platform dirs)
pub static PATHS: Lazy<TspPaths> = Lazy::new(|| TspPaths::detect().expect("failed to init TspPaths"));

pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
