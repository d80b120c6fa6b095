use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::chromosome_id;
use crate::runtime::{Error, Result};

/// Kind of block in a Varsim map file. Only blocks that shift coordinates matter here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    /// Positions present in the diploid genome but not in the reference
    Insert,
    /// Positions of the reference missing from the diploid genome
    Delete,
}

///////////////////////////////
/// One insert/delete block of a Varsim map file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChrMap {
    /// 0 to 23, 22=X 23=Y
    pub chromosome_id: u8,
    /// 0-based position in the diploid genome where the block starts
    pub start_pos: u32,
    pub len: u32,
    pub tr: Transform,
}

///////////////////////////////
/// Read a Varsim map file, which maps a generated diploid genome to the original haploid
/// reference. Each line is
/// `<size> <host_chr> <host_loc> <ref_chr> <ref_loc> <direction> <feature_name> <variant_id>`.
///
/// Returns, per host contig name, the insert and delete blocks sorted by start position.
/// Blocks on contigs that are not a numbered or sex chromosome are skipped
pub fn read_map<P: AsRef<Path>>(map_file: P) -> Result<HashMap<String, Vec<ChrMap>>> {
    let path = map_file.as_ref();
    let file = File::open(path).map_err(|_| Error::file_not_found(path))?;
    let reader = BufReader::new(file);

    let mut map: HashMap<String, Vec<ChrMap>> = HashMap::new();
    let mut num_skipped = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let context = || format!("map file {} line {}", path.display(), line_no + 1);

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 8 {
            return Err(Error::parse_error(
                context(),
                Some(format!("expected 8 fields, found {}", fields.len())),
            ));
        }

        let size: u32 = fields[0]
            .parse()
            .map_err(|_| Error::parse_error(context(), Some("block size is not a number")))?;
        let host_chr = fields[1];
        let host_loc: u32 = fields[2]
            .parse()
            .map_err(|_| Error::parse_error(context(), Some("host location is not a number")))?;
        if host_loc == 0 {
            return Err(Error::parse_error(
                context(),
                Some("host location is 1-based and cannot be 0"),
            ));
        }

        let tr = match fields[6] {
            "I" => Transform::Insert,
            "D" => Transform::Delete,
            _ => continue,
        };

        let Some(chr) = chromosome_id(host_chr) else {
            num_skipped += 1;
            continue;
        };

        map.entry(host_chr.to_string()).or_default().push(ChrMap {
            chromosome_id: chr as u8,
            start_pos: host_loc - 1,
            len: size,
            tr,
        });
    }

    for blocks in map.values_mut() {
        blocks.sort_by_key(|b| b.start_pos);
    }
    if num_skipped > 0 {
        log::debug!("Skipped {} map blocks on unknown contigs", num_skipped);
    }
    log::info!(
        "Read {} insert/delete blocks for {} contigs from {}",
        map.values().map(|v| v.len()).sum::<usize>(),
        map.len(),
        path.display()
    );
    Ok(map)
}

///////////////////////////////
/// Rewrite a chromosome from diploid-genome coordinates to reference coordinates: inserted
/// blocks are dropped and deleted blocks are filled with N. Blocks must be sorted and
/// must not overlap
pub fn apply_map(map: &[ChrMap], chr_data: &[u8]) -> Result<Vec<u8>> {
    let mut new_chr_data = Vec::with_capacity(chr_data.len());
    let mut cursor = 0usize;
    for block in map {
        let start = block.start_pos as usize;
        let len = block.len as usize;
        if start < cursor || start > chr_data.len() {
            return Err(Error::parse_error(
                "chromosome map",
                Some(format!(
                    "block at {} overlaps a previous block or lies beyond the chromosome end {}",
                    start,
                    chr_data.len()
                )),
            ));
        }
        new_chr_data.extend_from_slice(&chr_data[cursor..start]);
        cursor = start;
        match block.tr {
            Transform::Insert => {
                if start + len > chr_data.len() {
                    return Err(Error::parse_error(
                        "chromosome map",
                        Some(format!("insert at {} of length {} runs past the end", start, len)),
                    ));
                }
                cursor += len;
            }
            Transform::Delete => {
                new_chr_data.resize(new_chr_data.len() + len, b'N');
            }
        }
    }
    new_chr_data.extend_from_slice(&chr_data[cursor..]);
    Ok(new_chr_data)
}
