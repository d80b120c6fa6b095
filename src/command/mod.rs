use std::fmt;

use clap::Subcommand;

pub mod filter;
pub mod threadcount;
pub mod variant_calling;

pub use filter::FilterCMD;
pub use threadcount::determine_thread_counts_1;
pub use variant_calling::{
    call_genotypes, variant_calling, CallCMD, ClusterCalls, GenotypeCall, VariantCalling,
};

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Keep the positions that carry signal within a subcluster
    Filter(FilterCMD),
    /// Call per-cluster genotypes and write one VCF per cluster
    Call(CallCMD),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmd = match self {
            Commands::Filter(_) => "Filter",
            Commands::Call(_) => "Call",
        };
        write!(f, "{}", cmd)
    }
}
