mod assignment;
mod chrmap;
mod fasta;
mod pileup_tsv;
mod vcf;

pub use assignment::read_assignment;
pub use chrmap::{apply_map, read_map, ChrMap, Transform};
pub use fasta::{check_is_diploid, ChromosomeReader, DIPLOID_MARKER};
pub use pileup_tsv::{num_cells, read_pileup, write_pileup};
pub use vcf::VcfWriter;
