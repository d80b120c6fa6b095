use super::base::BaseCount;

/// Chromosomes are indexed 0..24; 22 is X and 23 is Y
pub const NUM_CHROMOSOMES: usize = 24;
pub const CHR_X: usize = 22;
pub const CHR_Y: usize = 23;

/// Counts observed for one cell at one position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellCount {
    pub cell_id: u32,
    pub counts: BaseCount,
}

impl CellCount {
    pub fn new(cell_id: u32, counts: BaseCount) -> Self {
        CellCount { cell_id, counts }
    }
}

///////////////////////////////
/// Pileup at one genomic position: only cells with at least one read are listed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PosData {
    /// 0-based position within the chromosome
    pub position: u32,
    pub cells: Vec<CellCount>,
}

impl PosData {
    pub fn new(position: u32, cells: Vec<CellCount>) -> Self {
        PosData { position, cells }
    }

    /// Sum of counts over all cells at this position
    pub fn pooled(&self) -> BaseCount {
        self.cells.iter().map(|c| c.counts).sum()
    }
}

/// Per-chromosome ordered positions, outer index is the chromosome id
pub type Pileup = Vec<Vec<PosData>>;

///////////////////////////////
/// Name of a chromosome id, "1".."22", "X", "Y"
pub fn chromosome_name(id: usize) -> String {
    match id {
        CHR_X => "X".to_string(),
        CHR_Y => "Y".to_string(),
        i => (i + 1).to_string(),
    }
}

///////////////////////////////
/// Chromosome id from a contig name. Accepts an optional "chr" prefix and an optional
/// "_maternal"/"_paternal" suffix, so "chr7", "7" and "7_maternal" all give 6
pub fn chromosome_id(name: &str) -> Option<usize> {
    let name = name.split_whitespace().next().unwrap_or("");
    let name = name
        .strip_suffix("_maternal")
        .or_else(|| name.strip_suffix("_paternal"))
        .unwrap_or(name);
    let name = name.strip_prefix("chr").unwrap_or(name);
    match name {
        "X" | "x" => Some(CHR_X),
        "Y" | "y" => Some(CHR_Y),
        n => match n.parse::<usize>() {
            Ok(i) if (1..=22).contains(&i) => Some(i - 1),
            _ => None,
        },
    }
}

///////////////////////////////
/// Total number of positions over all chromosomes
pub fn count_positions(pileup: &[Vec<PosData>]) -> usize {
    pileup.iter().map(|chr| chr.len()).sum()
}
