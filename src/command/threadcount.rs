///////////////////////////////
/// Number of worker threads: the given value, or all available cores
pub fn determine_thread_counts_1(total: Option<usize>) -> anyhow::Result<usize> {
    if let Some(total) = total {
        if total < 1 {
            anyhow::bail!("Number of threads must be at least 1");
        }
        anyhow::Ok(total)
    } else {
        let total = std::thread::available_parallelism();
        if let Ok(total) = total {
            anyhow::Ok(total.get())
        } else {
            log::warn!(
                "Could not autodetect the number of threads available. Setting to 1, but it is better if you specify"
            );
            anyhow::Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_count() {
        assert_eq!(determine_thread_counts_1(Some(3)).unwrap(), 3);
        assert!(determine_thread_counts_1(Some(0)).is_err());
        assert!(determine_thread_counts_1(None).unwrap() >= 1);
    }
}
