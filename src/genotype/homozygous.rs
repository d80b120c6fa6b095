use crate::core::{BaseCount, Genotype};

///////////////////////////////
/// Check if a locus is likely homozygous and return the homozygous genotype if so.
///
/// Under a pure error model the number of non-dominant bases is Binomial(n, theta). The locus is
/// homozygous for its dominant base when the observed non-dominant count is no more than one
/// standard deviation above the expected n*theta. Equal counts resolve to the earliest of
/// A, C, G, T.
pub fn likely_homozygous(n_bases: &BaseCount, theta: f64) -> Option<Genotype> {
    let coverage = n_bases.coverage();
    if coverage == 0 {
        return None;
    }
    let dominant = n_bases.dominant();
    let non_dominant = (coverage - n_bases.get(dominant)) as f64;

    let n = coverage as f64;
    let expected = n * theta;
    let std_dev = (n * theta * (1.0 - theta)).sqrt();

    if non_dominant <= expected + std_dev {
        Some(Genotype::homozygous(dominant))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Base;

    #[test]
    fn homozygous_with_one_error() {
        let g = likely_homozygous(&BaseCount::new(100, 0, 0, 1), 0.01);
        assert_eq!(g, Some(Genotype::homozygous(Base::A)));
    }

    #[test]
    fn balanced_is_not_homozygous() {
        assert_eq!(likely_homozygous(&BaseCount::new(50, 48, 1, 1), 0.01), None);
    }

    #[test]
    fn zero_coverage() {
        assert_eq!(likely_homozygous(&BaseCount::ZERO, 0.01), None);
    }

    #[test]
    fn dominant_need_not_be_first_slot() {
        let g = likely_homozygous(&BaseCount::new(0, 0, 1, 250), 0.01);
        assert_eq!(g, Some(Genotype::homozygous(Base::T)));
    }

    #[test]
    fn threshold_is_one_std_dev() {
        //n=1000, theta=0.01: expected 10, sd ~3.15
        assert!(likely_homozygous(&BaseCount::new(987, 13, 0, 0), 0.01).is_some());
        assert!(likely_homozygous(&BaseCount::new(986, 14, 0, 0), 0.01).is_none());
    }
}
