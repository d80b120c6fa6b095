use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::filter::{identity_positions, restrict_positions, Filter};
use crate::fileformat::{num_cells, read_assignment, read_pileup, write_pileup};

use super::determine_thread_counts_1;

pub const DEFAULT_SEQ_ERROR_RATE: f64 = 1e-3;

/// Commandline option: keep the pileup positions that carry signal within a subcluster
#[derive(Args)]
pub struct FilterCMD {
    #[arg(short = 'i', value_parser)]
    /// Pileup TSV (chromosome, position, cell_id, a, c, g, t)
    pub path_in: PathBuf,

    #[arg(short = 'o', value_parser)]
    /// Pileup TSV with the positions that were kept
    pub path_out: PathBuf,

    #[arg(long = "groups", value_parser)]
    /// TSV mapping each cell id to a group; cells of a group are pooled.
    /// Default: one group per cell
    pub path_groups: Option<PathBuf>,

    #[arg(
        long = "members",
        value_parser = clap::value_parser!(u32),
        num_args = 1..,
        value_delimiter = ','
    )]
    /// Groups in the current subcluster. Default: all groups
    pub members: Option<Vec<u32>>,

    #[arg(long = "marker", default_value = "")]
    /// Label of the current subcluster, only used for logging
    pub marker: String,

    #[arg(long = "theta", value_parser, default_value_t = DEFAULT_SEQ_ERROR_RATE)]
    /// Sequencing error rate
    pub seq_error_rate: f64,

    //Thread settings
    #[arg(short = '@', value_parser = clap::value_parser!(usize))]
    num_threads_total: Option<usize>,
}
impl FilterCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let num_threads_total = determine_thread_counts_1(self.num_threads_total)?;
        log::info!("Using threads {}", num_threads_total);

        let pos_data = read_pileup(&self.path_in)?;
        let n_cells = num_cells(&pos_data);

        let id_to_group = match &self.path_groups {
            Some(p) => read_assignment(p)?,
            None => (0..n_cells as u32).collect(),
        };
        if id_to_group.len() < n_cells {
            anyhow::bail!(
                "Group assignment covers {} cells but the pileup has {}",
                id_to_group.len(),
                n_cells
            );
        }
        let n_groups = id_to_group.iter().map(|&g| g as usize + 1).max().unwrap_or(0);

        let id_to_pos = match &self.members {
            Some(members) => restrict_positions(n_groups, members),
            None => identity_positions(n_groups),
        };

        let (kept, avg_coverage) = Filter::new().filter(
            &pos_data,
            &id_to_group,
            &id_to_pos,
            &self.marker,
            self.seq_error_rate,
            num_threads_total,
        )?;

        write_pileup(&self.path_out, &kept)?;
        println!("Average coverage of kept positions: {:.4}", avg_coverage);

        log::info!("Filter has finished succesfully");
        Ok(())
    }
}
