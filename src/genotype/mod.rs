mod caller;
mod homozygous;

pub use caller::*;
pub use homozygous::*;
