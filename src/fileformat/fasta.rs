use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use bio::io::fasta;

use crate::core::chromosome_id;
use crate::runtime::{Error, Result};

use super::chrmap::{apply_map, ChrMap};

/// Varsim names the first contig of a generated diploid genome `>1_maternal`
pub const DIPLOID_MARKER: &str = "maternal";

fn open_fasta(path: &Path) -> Result<fasta::Reader<BufReader<File>>> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    fasta::Reader::from_file(path).map_err(|e| Error::file_not_valid(path, Some(e.to_string())))
}

///////////////////////////////
/// Determine if a reference genome is diploid (as generated by Varsim) or haploid (as most
/// reference genomes are). The genome is diploid if the first record name contains "maternal"
pub fn check_is_diploid<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let reader = open_fasta(path)?;
    match reader.records().next() {
        Some(Ok(record)) => {
            let in_desc = record.desc().map_or(false, |d| d.contains(DIPLOID_MARKER));
            Ok(record.id().contains(DIPLOID_MARKER) || in_desc)
        }
        Some(Err(e)) => Err(Error::file_not_valid(path, Some(e.to_string()))),
        None => Err(Error::file_not_valid(path, Some("no FASTA records"))),
    }
}

///////////////////////////////
/// Streams a reference genome one chromosome at a time as (chromosome id, upper-cased sequence).
/// For a diploid genome only the maternal copy is returned, moved to reference coordinates with
/// the map for that contig. Contigs that are not a numbered or sex chromosome are skipped
pub struct ChromosomeReader {
    path: PathBuf,
    records: fasta::Records<BufReader<File>>,
    is_diploid: bool,
    map: HashMap<String, Vec<ChrMap>>,
}

impl ChromosomeReader {
    pub fn new<P: AsRef<Path>>(
        path: P,
        is_diploid: bool,
        map: HashMap<String, Vec<ChrMap>>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = open_fasta(&path)?.records();
        Ok(ChromosomeReader {
            path,
            records,
            is_diploid,
            map,
        })
    }

    fn next_chromosome(&mut self) -> Result<Option<(usize, Vec<u8>)>> {
        for record in self.records.by_ref() {
            let record =
                record.map_err(|e| Error::file_not_valid(&self.path, Some(e.to_string())))?;
            let name = record.id();

            if self.is_diploid && !name.contains(DIPLOID_MARKER) {
                continue;
            }
            let Some(chr) = chromosome_id(name) else {
                log::debug!("Skipping contig {} of {}", name, self.path.display());
                continue;
            };

            let seq = record.seq().to_ascii_uppercase();
            let seq = match self.map.get(name) {
                Some(blocks) if self.is_diploid => apply_map(blocks, &seq)?,
                _ => seq,
            };
            log::debug!("Read chromosome {} ({} bp)", name, seq.len());
            return Ok(Some((chr, seq)));
        }
        Ok(None)
    }
}

impl Iterator for ChromosomeReader {
    type Item = Result<(usize, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chromosome().transpose()
    }
}
