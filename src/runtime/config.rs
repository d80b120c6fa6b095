use std::sync::OnceLock;

use crate::runtime;

///////////////////////////////
/// Global Config Options
pub static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: runtime::LogLevel,
    pub num_threads: usize,
}

impl Config {
    /// Set the global config. Returns the config that ends up installed, which is the
    /// earlier one if init was already called
    pub fn init(config: Config) -> &'static Config {
        CONFIG.get_or_init(|| config)
    }

    pub fn get() -> Option<&'static Config> {
        CONFIG.get()
    }

    /// Thread count to use when the caller asks for "all available"
    pub fn num_threads_or_default() -> usize {
        Self::get().map(|c| c.num_threads).unwrap_or(0)
    }
}
