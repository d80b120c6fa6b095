use crate::core::{log_fact, Base, BaseCount, Genotype};

///////////////////////////////
/// ln P(counts | genotype) under a diploid model where each read comes from either allele with
/// probability 1/2 and is misread as each other base with probability theta/3
fn log_likelihood(n_bases: &BaseCount, genotype: Genotype, theta: f64) -> f64 {
    let n = n_bases.coverage();
    let mut ll = log_fact(n);
    for base in Base::ALL {
        let count = n_bases.get(base);
        if count == 0 {
            continue;
        }
        let p_first = if genotype.first() == base { 1.0 - theta } else { theta / 3.0 };
        let p_second = if genotype.second() == base { 1.0 - theta } else { theta / 3.0 };
        let p = 0.5 * (p_first + p_second);
        ll += count as f64 * p.ln() - log_fact(count);
    }
    ll
}

///////////////////////////////
/// Candidate genotypes for a cluster, taken from the top two alleles of the counts pooled over
/// all clusters. Order matters: on equal posteriors the earlier candidate wins
fn candidates(
    n_bases_total: &BaseCount,
    nbases_total_idx: &[usize; 4],
    likely_homozygous_total: bool,
) -> Vec<Genotype> {
    let top1 = Base::from_index(nbases_total_idx[0]);
    let top2 = Base::from_index(nbases_total_idx[1]);
    let has_top2 = n_bases_total.get(top2) > 0;

    let mut list = vec![Genotype::homozygous(top1)];
    if has_top2 {
        //A pooled homozygous locus leaves no room for a heterozygous cluster
        if !likely_homozygous_total {
            list.push(Genotype::new(top1, top2));
        }
        list.push(Genotype::homozygous(top2));
    }
    list
}

///////////////////////////////
/// Find the most likely genotype of one cluster at one position.
///
/// * `n_bases` - counts for the cluster
/// * `n_bases_total` - counts for the position pooled over all clusters
/// * `nbases_total_idx` - slots of `n_bases_total` ordered by decreasing count
/// * `likely_homozygous_total` - the pooled counts look homozygous
/// * `hetero_prior` - prior probability of a heterozygous locus
/// * `theta` - sequencing error rate
/// * `coverage` - if given, receives the cluster coverage
///
/// Returns None only when the cluster has no reads at the position.
pub fn most_likely_genotype(
    n_bases: &BaseCount,
    n_bases_total: &BaseCount,
    nbases_total_idx: &[usize; 4],
    likely_homozygous_total: bool,
    hetero_prior: f64,
    theta: f64,
    coverage: Option<&mut u32>,
) -> Option<Genotype> {
    let cov = n_bases.coverage();
    if let Some(coverage) = coverage {
        *coverage = cov;
    }
    if cov == 0 {
        return None;
    }

    let list = candidates(n_bases_total, nbases_total_idx, likely_homozygous_total);
    let num_hom = list.iter().filter(|g| g.is_homozygous()).count();
    let log_prior_het = hetero_prior.ln();
    let log_prior_hom = ((1.0 - hetero_prior) / num_hom as f64).ln();

    let mut best = list[0];
    let mut best_post = f64::NEG_INFINITY;
    for (i, &g) in list.iter().enumerate() {
        let log_prior = if g.is_homozygous() {
            log_prior_hom
        } else {
            log_prior_het
        };
        let post = log_likelihood(n_bases, g, theta) + log_prior;
        if i == 0 || post > best_post {
            best = g;
            best_post = post;
        }
    }
    Some(best)
}
