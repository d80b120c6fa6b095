use crate::core::{log_binomial, BaseCount, PosData};

/// A position is significant when the probability of seeing at least as many non-dominant
/// reads from sequencing errors alone falls below this level
pub const SIGNIFICANCE_LEVEL: f64 = 1e-3;

/// Terms this many nats below the running tail sum no longer change it in double precision
const LOG_NEGLIGIBLE: f64 = 40.0;

///////////////////////////////
/// Decide if the pooled counts at a position are inconsistent with "every read comes from one
/// homozygous genotype, and every other base is a sequencing error with rate theta".
///
/// The non-dominant read count m = n - max(count) is tested against Binomial(n, theta) with an
/// exact one-sided tail P(M >= m). Zero coverage is never significant.
pub fn is_significant(base_count: &BaseCount, theta: f64) -> bool {
    let n = base_count.coverage();
    if n == 0 {
        return false;
    }
    let m = n - base_count.get(base_count.dominant());

    //Fewer errors than expected cannot be evidence against the null
    if m as f64 <= n as f64 * theta {
        return false;
    }

    log_binomial_tail(n, m, theta, SIGNIFICANCE_LEVEL.ln()) < SIGNIFICANCE_LEVEL.ln()
}

///////////////////////////////
/// Same test on a position, pooling all cells listed at it. The pooled coverage is written
/// to `coverage` when given
pub fn is_significant_pos(pos_data: &PosData, theta: f64, coverage: Option<&mut u32>) -> bool {
    let pooled = pos_data.pooled();
    if let Some(coverage) = coverage {
        *coverage = pooled.coverage();
    }
    is_significant(&pooled, theta)
}

///////////////////////////////
/// ln P(M >= m) for M ~ Binomial(n, theta), with m above the mean so that terms decrease.
/// Summation stops once the sum exceeds `log_stop`, since the caller only compares against it
fn log_binomial_tail(n: u32, m: u32, theta: f64, log_stop: f64) -> f64 {
    let log_theta = theta.ln();
    let log_one_minus_theta = (-theta).ln_1p();
    let log_term =
        |k: u32| log_binomial(n, k) + k as f64 * log_theta + (n - k) as f64 * log_one_minus_theta;

    let mut acc = log_term(m);
    for k in (m + 1)..=n {
        if acc >= log_stop {
            break;
        }
        let t = log_term(k);
        if t < acc - LOG_NEGLIGIBLE {
            break;
        }
        acc = log_add_exp(acc, t);
    }
    acc
}

#[inline]
fn log_add_exp(a: f64, b: f64) -> f64 {
    if a >= b {
        a + (b - a).exp().ln_1p()
    } else {
        b + (a - b).exp().ln_1p()
    }
}
