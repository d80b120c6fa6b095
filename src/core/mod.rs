mod base;
mod log_fact;
mod pileup;

pub use base::*;
pub use log_fact::*;
pub use pileup::*;
