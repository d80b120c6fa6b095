use clonecall::core::{Base, BaseCount, Genotype};
use clonecall::genotype::{likely_homozygous, most_likely_genotype};

const THETA: f64 = 1e-3;

fn call(n_bases: &BaseCount, total: &BaseCount, hetero_prior: f64) -> Option<Genotype> {
    most_likely_genotype(
        n_bases,
        total,
        &total.sort_order_desc(),
        likely_homozygous(total, THETA).is_some(),
        hetero_prior,
        THETA,
        None,
    )
}

#[test]
fn heterozygous_call_is_monotone_in_prior() {
    let total = BaseCount::new(120, 0, 0, 80);
    for minor in 0..=20 {
        let cluster = BaseCount::new(20 - minor, 0, 0, minor);
        let mut het_seen = false;
        for step in 0..=100 {
            let prior = step as f64 / 100.0;
            let g = call(&cluster, &total, prior).unwrap();
            if het_seen {
                assert!(
                    !g.is_homozygous(),
                    "minor={} prior={} went back to {}",
                    minor,
                    prior,
                    g
                );
            }
            het_seen |= !g.is_homozygous();
        }
        //with all prior mass on the heterozygote it is always chosen
        assert_eq!(call(&cluster, &total, 1.0).unwrap(), Genotype::new(Base::A, Base::T));
    }
}

#[test]
fn balanced_cluster_is_heterozygous() {
    let total = BaseCount::new(0, 30, 0, 28);
    let g = call(&BaseCount::new(0, 9, 0, 8), &total, 1e-3).unwrap();
    assert_eq!(g, Genotype::new(Base::C, Base::T));
    assert_eq!(g.to_string(), "CT");
}

#[test]
fn call_follows_the_cluster_not_the_pool() {
    //the pool is mostly G but this cluster only saw A
    let total = BaseCount::new(15, 0, 300, 0);
    let mut coverage = 0;
    let g = most_likely_genotype(
        &BaseCount::new(15, 0, 0, 0),
        &total,
        &total.sort_order_desc(),
        false,
        1e-3,
        THETA,
        Some(&mut coverage),
    );
    assert_eq!(g, Some(Genotype::homozygous(Base::A)));
    assert_eq!(coverage, 15);
}

#[test]
fn homozygous_pool_gives_homozygous_clusters() {
    let total = BaseCount::new(0, 0, 1000, 1);
    assert_eq!(likely_homozygous(&total, THETA), Some(Genotype::homozygous(Base::G)));
    for cluster in [BaseCount::new(0, 0, 500, 1), BaseCount::new(0, 0, 1, 1)] {
        assert!(call(&cluster, &total, 0.5).unwrap().is_homozygous());
    }
}
