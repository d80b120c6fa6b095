use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Sequencing error rate {theta} is invalid; it must lie strictly between 0 and 1.")]
    InvalidErrorRate { theta: f64 },

    #[error("Heterozygosity prior {prior} is invalid; it must lie between 0 and 1.")]
    InvalidHeteroPrior { prior: f64 },

    #[error("Failed to set up worker threads{}", Error::format_msg_as_detail(msg))]
    ThreadPool { msg: Option<String> },

    #[error("Cell id {cell_id} has no entry; the assignment only covers {n_cells} cells.")]
    CellOutOfRange { cell_id: u32, n_cells: usize },

    #[error("Group id {group_id} has no entry; the position map only covers {n_groups} groups.")]
    GroupOutOfRange { group_id: u32, n_groups: usize },

    #[error("Chromosome index {chromosome} is out of range (at most {max} chromosomes).")]
    ChromosomeOutOfRange { chromosome: usize, max: usize },

    #[error("File at {:?} not found.", path)]
    FileNotFound { path: std::path::PathBuf },

    #[error("File at {:?} is invalid{}.", path, Error::format_msg_as_detail(msg))]
    FileNotValid {
        path: std::path::PathBuf,
        msg: Option<String>,
    },

    #[error("Failed parsing {}{}", context, Error::format_msg_as_detail(msg))]
    ParseError {
        context: String,
        msg: Option<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[cold]
    pub fn invalid_error_rate(theta: f64) -> Self {
        Error::InvalidErrorRate { theta }
    }

    #[cold]
    pub fn invalid_hetero_prior(prior: f64) -> Self {
        Error::InvalidHeteroPrior { prior }
    }

    #[cold]
    pub fn thread_pool<M: Into<String>>(msg: Option<M>) -> Self {
        Error::ThreadPool {
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn cell_out_of_range(cell_id: u32, n_cells: usize) -> Self {
        Error::CellOutOfRange { cell_id, n_cells }
    }

    #[cold]
    pub fn group_out_of_range(group_id: u32, n_groups: usize) -> Self {
        Error::GroupOutOfRange { group_id, n_groups }
    }

    #[cold]
    pub fn chromosome_out_of_range(chromosome: usize, max: usize) -> Self {
        Error::ChromosomeOutOfRange { chromosome, max }
    }

    #[cold]
    pub fn file_not_found<P: AsRef<std::path::Path>>(path: P) -> Self {
        Error::FileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[cold]
    pub fn file_not_valid<P: AsRef<std::path::Path>, M: Into<String>>(
        path: P,
        msg: Option<M>,
    ) -> Self {
        Error::FileNotValid {
            path: path.as_ref().to_path_buf(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn parse_error<C: Into<String>, M: Into<String>>(context: C, msg: Option<M>) -> Self {
        Error::ParseError {
            context: context.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    pub fn format_msg_as_detail(msg: &Option<String>) -> String {
        match msg {
            Some(m) => format!(" ({})", m),
            None => String::new(),
        }
    }
}

///////////////////////////////
/// Check that a sequencing error rate is usable as a probability
pub fn verify_error_rate(theta: f64) -> Result<f64> {
    if theta > 0.0 && theta < 1.0 {
        Ok(theta)
    } else {
        Err(Error::invalid_error_rate(theta))
    }
}

///////////////////////////////
/// Check that a heterozygosity prior is a probability
pub fn verify_hetero_prior(prior: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&prior) {
        Ok(prior)
    } else {
        Err(Error::invalid_hetero_prior(prior))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_rate_bounds() {
        assert!(verify_error_rate(0.01).is_ok());
        assert!(verify_error_rate(0.0).is_err());
        assert!(verify_error_rate(1.0).is_err());
        assert!(verify_error_rate(f64::NAN).is_err());
    }

    #[test]
    fn hetero_prior_bounds() {
        assert!(verify_hetero_prior(0.0).is_ok());
        assert!(verify_hetero_prior(1.0).is_ok());
        assert!(verify_hetero_prior(-0.1).is_err());
        assert!(verify_hetero_prior(1.5).is_err());
    }

    #[test]
    fn detail_formatting() {
        let e = Error::parse_error("map file line 3", Some("expected 8 fields"));
        assert_eq!(
            e.to_string(),
            "Failed parsing map file line 3 (expected 8 fields)"
        );
    }
}
