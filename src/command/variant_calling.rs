use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;

use crate::core::{chromosome_name, BaseCount, Genotype, PosData, NUM_CHROMOSOMES};
use crate::fileformat::{
    check_is_diploid, read_assignment, read_map, read_pileup, ChromosomeReader, VcfWriter,
};
use crate::filter::worker_threads;
use crate::genotype::{likely_homozygous, most_likely_genotype};
use crate::runtime::{self, verify_error_rate, verify_hetero_prior, Error};

use super::determine_thread_counts_1;

pub const DEFAULT_THETA: f64 = 1e-3;
pub const DEFAULT_HETERO_PRIOR: f64 = 1e-3;

/// Commandline option: call genotypes per cluster and write one VCF per cluster
#[derive(Args)]
pub struct CallCMD {
    #[arg(short = 'i', value_parser)]
    /// Pileup TSV (chromosome, position, cell_id, a, c, g, t)
    pub path_in: PathBuf,

    #[arg(long = "clusters", value_parser)]
    /// TSV mapping each cell id to its cluster
    pub path_clusters: PathBuf,

    #[arg(short = 'r', long = "reference", value_parser)]
    /// Reference genome FASTA; a Varsim diploid genome also needs --map
    pub path_reference: PathBuf,

    #[arg(long = "map", value_parser)]
    /// Varsim map file for a diploid reference
    pub path_map: Option<PathBuf>,

    #[arg(short = 'o', value_parser)]
    /// Directory to write cluster_<id>.vcf files to
    pub path_out: PathBuf,

    #[arg(long = "theta", value_parser, default_value_t = DEFAULT_THETA)]
    /// Sequencing error rate
    pub theta: f64,

    #[arg(long = "hetero-prior", value_parser, default_value_t = DEFAULT_HETERO_PRIOR)]
    /// Prior probability of a heterozygous locus
    pub hetero_prior: f64,

    //Thread settings
    #[arg(short = '@', value_parser = clap::value_parser!(usize))]
    num_threads_total: Option<usize>,
}
impl CallCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let num_threads_total = determine_thread_counts_1(self.num_threads_total)?;
        log::info!("Using threads {}", num_threads_total);

        if !(self.theta > 0.0 && self.theta < 1.0) {
            anyhow::bail!("--theta must be between 0 and 1, got {}", self.theta);
        }
        if !(0.0..=1.0).contains(&self.hetero_prior) {
            anyhow::bail!("--hetero-prior must be between 0 and 1, got {}", self.hetero_prior);
        }

        let pos_data = read_pileup(&self.path_in)?;
        let clusters = read_assignment(&self.path_clusters)?;

        VariantCalling::run(
            &VariantCalling {
                path_reference: self.path_reference.clone(),
                path_map: self.path_map.clone(),
                path_out: self.path_out.clone(),
                hetero_prior: self.hetero_prior,
                theta: self.theta,
                num_threads: num_threads_total,
            },
            &pos_data,
            &clusters,
        )?;

        log::info!("Variant calling has finished succesfully");
        Ok(())
    }
}

///////////////////////////////
/// Genotype of one cluster at one position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenotypeCall {
    pub position: u32,
    pub genotype: Genotype,
    pub coverage: u32,
}

/// Calls indexed by cluster, then chromosome
pub type ClusterCalls = Vec<Vec<Vec<GenotypeCall>>>;

///////////////////////////////
/// Pool the cells at a position per cluster
fn pool_clusters(
    pos: &PosData,
    clusters: &[u32],
    n_clusters: usize,
) -> runtime::Result<Vec<BaseCount>> {
    let mut n_bases = vec![BaseCount::ZERO; n_clusters];
    for cell in &pos.cells {
        let cluster = *clusters
            .get(cell.cell_id as usize)
            .ok_or_else(|| Error::cell_out_of_range(cell.cell_id, clusters.len()))?;
        n_bases[cluster as usize] += cell.counts;
    }
    Ok(n_bases)
}

///////////////////////////////
/// Call the most likely genotype of every cluster at every position of one chromosome.
/// The result is indexed by cluster; positions a cluster has no reads at are left out
fn call_chromosome(
    positions: &[PosData],
    clusters: &[u32],
    n_clusters: usize,
    hetero_prior: f64,
    theta: f64,
) -> runtime::Result<Vec<Vec<GenotypeCall>>> {
    let mut calls = vec![Vec::new(); n_clusters];
    for pos in positions {
        let n_bases = pool_clusters(pos, clusters, n_clusters)?;
        let n_bases_total: BaseCount = n_bases.iter().copied().sum();
        let nbases_total_idx = n_bases_total.sort_order_desc();
        let likely_homozygous_total = likely_homozygous(&n_bases_total, theta).is_some();

        for (cluster, counts) in n_bases.iter().enumerate() {
            let mut coverage = 0;
            let genotype = most_likely_genotype(
                counts,
                &n_bases_total,
                &nbases_total_idx,
                likely_homozygous_total,
                hetero_prior,
                theta,
                Some(&mut coverage),
            );
            if let Some(genotype) = genotype {
                calls[cluster].push(GenotypeCall {
                    position: pos.position,
                    genotype,
                    coverage,
                });
            }
        }
    }
    Ok(calls)
}

///////////////////////////////
/// Genotype calls for every cluster, chromosome and position. Chromosomes are processed in
/// parallel on the current rayon pool; the output order does not depend on scheduling
pub fn call_genotypes(
    pos_data: &[Vec<PosData>],
    clusters: &[u32],
    hetero_prior: f64,
    theta: f64,
) -> runtime::Result<ClusterCalls> {
    let theta = verify_error_rate(theta)?;
    let hetero_prior = verify_hetero_prior(hetero_prior)?;
    if pos_data.len() > NUM_CHROMOSOMES {
        return Err(Error::chromosome_out_of_range(
            pos_data.len() - 1,
            NUM_CHROMOSOMES,
        ));
    }
    let n_clusters = clusters.iter().map(|&c| c as usize + 1).max().unwrap_or(0);

    let per_chromosome: Vec<Vec<Vec<GenotypeCall>>> = pos_data
        .par_iter()
        .map(|positions| call_chromosome(positions, clusters, n_clusters, hetero_prior, theta))
        .collect::<runtime::Result<_>>()?;

    //Turn [chromosome][cluster] into [cluster][chromosome]
    let mut calls: ClusterCalls = vec![vec![Vec::new(); pos_data.len()]; n_clusters];
    for (chr, per_cluster) in per_chromosome.into_iter().enumerate() {
        for (cluster, chr_calls) in per_cluster.into_iter().enumerate() {
            calls[cluster][chr] = chr_calls;
        }
    }
    Ok(calls)
}

/// Algorithm: call genotypes per cluster and write them as VCF
pub struct VariantCalling {
    pub path_reference: PathBuf,
    pub path_map: Option<PathBuf>,
    pub path_out: PathBuf,
    pub hetero_prior: f64,
    pub theta: f64,
    pub num_threads: usize,
}
impl VariantCalling {
    /// Run the algorithm
    pub fn run(
        params: &VariantCalling,
        pos_data: &[Vec<PosData>],
        clusters: &[u32],
    ) -> runtime::Result<()> {
        verify_error_rate(params.theta)?;
        verify_hetero_prior(params.hetero_prior)?;

        //Check the reference before spending time on calling
        let is_diploid = check_is_diploid(&params.path_reference)?;
        let map = if is_diploid {
            match &params.path_map {
                Some(p) => read_map(p)?,
                None => {
                    return Err(Error::file_not_valid(
                        &params.path_reference,
                        Some("reference is a diploid Varsim genome but no map file was given"),
                    ))
                }
            }
        } else {
            HashMap::new()
        };
        log::info!(
            "Reference {} is {}",
            params.path_reference.display(),
            if is_diploid { "diploid" } else { "haploid" }
        );

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads(params.num_threads, pos_data.len()))
            .build()
            .map_err(|e| Error::thread_pool(Some(e.to_string())))?;
        let calls = thread_pool.install(|| {
            call_genotypes(pos_data, clusters, params.hetero_prior, params.theta)
        })?;

        fs::create_dir_all(&params.path_out)?;
        let mut writers = (0..calls.len())
            .map(|cluster| {
                VcfWriter::new(
                    params.path_out.join(format!("cluster_{}.vcf", cluster)),
                    &format!("cluster_{}", cluster),
                )
            })
            .collect::<runtime::Result<Vec<_>>>()?;

        //Reference is read one chromosome at a time; calls are written in reference order
        let mut seen = [false; NUM_CHROMOSOMES];
        for chr in ChromosomeReader::new(&params.path_reference, is_diploid, map)? {
            let (chr, seq) = chr?;
            if seen[chr] {
                log::warn!(
                    "Chromosome {} appears twice in the reference, ignoring the second copy",
                    chromosome_name(chr)
                );
                continue;
            }
            seen[chr] = true;

            for (cluster_calls, writer) in calls.iter().zip(writers.iter_mut()) {
                let Some(chr_calls) = cluster_calls.get(chr) else {
                    continue;
                };
                for call in chr_calls {
                    let ref_base = seq.get(call.position as usize).copied().unwrap_or(b'N');
                    writer.write_call(chr, call.position, ref_base, call.genotype, call.coverage)?;
                }
            }
            log::info!("Wrote calls for chromosome {}", chromosome_name(chr));
        }

        for (chr, positions) in pos_data.iter().enumerate() {
            if !positions.is_empty() && !seen[chr] {
                log::warn!(
                    "Chromosome {} has pileup data but is missing from the reference",
                    chromosome_name(chr)
                );
            }
        }

        for writer in writers {
            let path = writer.path().to_path_buf();
            let n = writer.finish()?;
            log::info!("Wrote {} variants to {}", n, path.display());
        }
        Ok(())
    }
}

///////////////////////////////
/// Call the most likely genotype of each cluster at each position and write one VCF per
/// cluster to `out_dir`, using all available threads
pub fn variant_calling(
    pos_data: &[Vec<PosData>],
    clusters: &[u32],
    reference_genome: &Path,
    map_file: Option<&Path>,
    hetero_prior: f64,
    theta: f64,
    out_dir: &Path,
) -> runtime::Result<()> {
    VariantCalling::run(
        &VariantCalling {
            path_reference: reference_genome.to_path_buf(),
            path_map: map_file.map(Path::to_path_buf),
            path_out: out_dir.to_path_buf(),
            hetero_prior,
            theta,
            num_threads: runtime::Config::num_threads_or_default(),
        },
        pos_data,
        clusters,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Base, CellCount};

    fn pos(position: u32, cells: &[(u32, [u32; 4])]) -> PosData {
        PosData::new(
            position,
            cells
                .iter()
                .map(|&(id, c)| CellCount::new(id, BaseCount(c)))
                .collect(),
        )
    }

    #[test]
    fn calls_per_cluster() {
        //cells 0,1 are cluster 0 and carry A; cell 2 is cluster 1 and carries T
        let data = vec![vec![pos(
            4,
            &[(0, [10, 0, 0, 0]), (1, [8, 0, 0, 0]), (2, [0, 0, 0, 9])],
        )]];
        let calls = call_genotypes(&data, &[0, 0, 1], 1e-3, 0.01).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0][0],
            vec![GenotypeCall {
                position: 4,
                genotype: Genotype::homozygous(Base::A),
                coverage: 18
            }]
        );
        assert_eq!(calls[1][0][0].genotype, Genotype::homozygous(Base::T));
    }

    #[test]
    fn uncovered_cluster_has_no_call() {
        let data = vec![vec![pos(0, &[(0, [5, 0, 0, 0])])]];
        let calls = call_genotypes(&data, &[0, 1], 1e-3, 0.01).unwrap();
        assert_eq!(calls[0][0].len(), 1);
        assert!(calls[1][0].is_empty());
    }

    #[test]
    fn cell_without_cluster_is_an_error() {
        let data = vec![vec![pos(0, &[(3, [5, 0, 0, 0])])]];
        let res = call_genotypes(&data, &[0, 1], 1e-3, 0.01);
        assert!(matches!(res, Err(Error::CellOutOfRange { cell_id: 3, .. })));
    }

    #[test]
    fn invalid_parameters() {
        assert!(call_genotypes(&[], &[], 1e-3, 0.0).is_err());
        assert!(call_genotypes(&[], &[], 2.0, 0.01).is_err());
    }
}
