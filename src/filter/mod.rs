mod recursive;
mod significance;

pub use recursive::*;
pub use significance::*;

use crate::core::{BaseCount, PosData};
use crate::runtime::Result;

///////////////////////////////
/// Filters pileups down to the positions that can tell subclusters apart.
/// Stateless; the free functions in this module do the work
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter;

impl Filter {
    pub fn new() -> Self {
        Filter
    }

    pub fn is_significant(&self, base_count: &BaseCount, theta: f64) -> bool {
        significance::is_significant(base_count, theta)
    }

    pub fn is_significant_pos(
        &self,
        pos_data: &PosData,
        theta: f64,
        coverage: Option<&mut u32>,
    ) -> bool {
        significance::is_significant_pos(pos_data, theta, coverage)
    }

    pub fn filter(
        &self,
        pos_data: &[Vec<PosData>],
        id_to_group: &[u32],
        id_to_pos: &[Option<u32>],
        marker: &str,
        seq_error_rate: f64,
        num_threads: usize,
    ) -> Result<(Vec<Vec<PosData>>, f64)> {
        recursive::filter(
            pos_data,
            id_to_group,
            id_to_pos,
            marker,
            seq_error_rate,
            num_threads,
        )
    }

    pub fn log_fact(&self, n: u32) -> f64 {
        crate::core::log_fact(n)
    }
}
