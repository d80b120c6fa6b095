use std::path::Path;

use crate::runtime::{Error, Result};

///////////////////////////////
/// Read a cell assignment TSV: one `cell_id <tab> cluster` line per cell, no header.
/// Every cell id from 0 to the largest one must be assigned exactly once
pub fn read_assignment<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

    let mut assignment: Vec<Option<u32>> = Vec::new();
    for (i, row) in reader.deserialize::<(u32, u32)>().enumerate() {
        let (cell_id, cluster) = row.map_err(|e| {
            Error::parse_error(
                format!("assignment {} line {}", path.display(), i + 1),
                Some(e.to_string()),
            )
        })?;
        let cell = cell_id as usize;
        if cell >= assignment.len() {
            assignment.resize(cell + 1, None);
        }
        if assignment[cell].replace(cluster).is_some() {
            return Err(Error::file_not_valid(
                path,
                Some(format!("cell {} is assigned twice", cell_id)),
            ));
        }
    }

    assignment
        .into_iter()
        .enumerate()
        .map(|(cell, cluster)| {
            cluster.ok_or_else(|| {
                Error::file_not_valid(path, Some(format!("cell {} has no assignment", cell)))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_in_any_order() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "2\t0").unwrap();
        writeln!(f, "0\t1").unwrap();
        writeln!(f, "1\t1").unwrap();
        assert_eq!(read_assignment(f.path()).unwrap(), vec![1, 1, 0]);
    }

    #[test]
    fn gaps_and_duplicates_are_errors() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "0\t0").unwrap();
        writeln!(f, "2\t0").unwrap();
        assert!(read_assignment(f.path()).is_err());

        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "0\t0").unwrap();
        writeln!(f, "0\t1").unwrap();
        assert!(read_assignment(f.path()).is_err());
    }
}
