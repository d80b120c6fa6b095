use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{
    chromosome_id, chromosome_name, BaseCount, CellCount, Pileup, PosData, NUM_CHROMOSOMES,
};
use crate::runtime::{Error, Result};

///////////////////////////////
/// One row of a pileup TSV: the counts of one cell at one position
#[derive(Debug, Deserialize, Serialize)]
struct PileupRow {
    chromosome: String,
    position: u32,
    cell_id: u32,
    a: u32,
    c: u32,
    g: u32,
    t: u32,
}

///////////////////////////////
/// Read a pileup TSV with header `chromosome position cell_id a c g t`. Rows of one chromosome
/// must be sorted by position; chromosomes may be interleaved
pub fn read_pileup<P: AsRef<Path>>(path: P) -> Result<Pileup> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

    let mut pileup: Pileup = vec![Vec::new(); NUM_CHROMOSOMES];
    for (i, row) in reader.deserialize::<PileupRow>().enumerate() {
        let context = || format!("pileup {} row {}", path.display(), i + 1);
        let row = row.map_err(|e| Error::parse_error(context(), Some(e.to_string())))?;

        let chr = chromosome_id(&row.chromosome).ok_or_else(|| {
            Error::parse_error(context(), Some(format!("unknown chromosome {}", row.chromosome)))
        })?;
        let cell = CellCount::new(row.cell_id, BaseCount::new(row.a, row.c, row.g, row.t));

        let positions = &mut pileup[chr];
        match positions.last().map(|p| p.position) {
            Some(last) if last > row.position => {
                return Err(Error::parse_error(
                    context(),
                    Some(format!(
                        "position {} comes after {} on chromosome {}",
                        row.position, last, row.chromosome
                    )),
                ));
            }
            Some(last) if last == row.position => {
                if let Some(p) = positions.last_mut() {
                    p.cells.push(cell);
                }
            }
            _ => positions.push(PosData::new(row.position, vec![cell])),
        }
    }

    //Drop trailing chromosomes without data so the shape matches the input
    while pileup.last().map_or(false, |c| c.is_empty()) {
        pileup.pop();
    }
    Ok(pileup)
}

///////////////////////////////
/// Write a pileup in the format read by read_pileup
pub fn write_pileup<P: AsRef<Path>>(path: P, pileup: &[Vec<PosData>]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

    for (chr, positions) in pileup.iter().enumerate() {
        let chromosome = chromosome_name(chr);
        for pos in positions {
            for cell in &pos.cells {
                let [a, c, g, t] = cell.counts.0;
                writer
                    .serialize(PileupRow {
                        chromosome: chromosome.clone(),
                        position: pos.position,
                        cell_id: cell.cell_id,
                        a,
                        c,
                        g,
                        t,
                    })
                    .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

///////////////////////////////
/// Number of cells, taken as one past the largest cell id
pub fn num_cells(pileup: &[Vec<PosData>]) -> usize {
    pileup
        .iter()
        .flatten()
        .flat_map(|p| p.cells.iter())
        .map(|c| c.cell_id as usize + 1)
        .max()
        .unwrap_or(0)
}
