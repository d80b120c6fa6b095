pub mod command;
pub mod core;
pub mod fileformat;
pub mod filter;
pub mod genotype;
pub mod runtime;

pub use crate::core::{log_fact, Base, BaseCount, CellCount, Genotype, Pileup, PosData};
pub use crate::filter::{filter, is_significant, is_significant_pos, Filter};
pub use crate::genotype::{likely_homozygous, most_likely_genotype};
