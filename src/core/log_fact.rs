use std::f64::consts::PI;
use std::sync::OnceLock;

/// Values of n below this are looked up in an exact table, above it Stirling's series is used
pub const LOG_FACT_TABLE_SIZE: usize = 256;

static LOG_FACT_TABLE: OnceLock<[f64; LOG_FACT_TABLE_SIZE]> = OnceLock::new();

fn table() -> &'static [f64; LOG_FACT_TABLE_SIZE] {
    LOG_FACT_TABLE.get_or_init(|| {
        let mut t = [0.0; LOG_FACT_TABLE_SIZE];
        for i in 2..LOG_FACT_TABLE_SIZE {
            t[i] = t[i - 1] + (i as f64).ln();
        }
        t
    })
}

///////////////////////////////
/// ln(n!). Exact for small n, Stirling's series with two correction terms otherwise.
/// The table is built on first use and only read afterwards, so this is safe to call from
/// any thread
#[inline]
pub fn log_fact(n: u32) -> f64 {
    let n_us = n as usize;
    if n_us < LOG_FACT_TABLE_SIZE {
        table()[n_us]
    } else {
        stirling(n as f64)
    }
}

#[inline]
fn stirling(n: f64) -> f64 {
    let n3 = n * n * n;
    n * n.ln() - n + 0.5 * (2.0 * PI * n).ln() + 1.0 / (12.0 * n) - 1.0 / (360.0 * n3)
}

///////////////////////////////
/// ln of the binomial coefficient n over k
#[inline]
pub fn log_binomial(n: u32, k: u32) -> f64 {
    debug_assert!(k <= n);
    log_fact(n) - log_fact(k) - log_fact(n - k)
}
