use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::core::{chromosome_name, Base, Genotype};
use crate::runtime::{Error, Result};

const VCF_HEADER: [&str; 4] = [
    "##fileformat=VCFv4.2",
    r#"##INFO=<ID=DP,Number=1,Type=Integer,Description="Read depth of the cluster">"#,
    r#"##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">"#,
    r#"##FORMAT=<ID=DP,Number=1,Type=Integer,Description="Read depth of the cluster">"#,
];

///////////////////////////////
/// Plain-text VCF with one sample column, one file per cluster
pub struct VcfWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    num_records: usize,
}

impl VcfWriter {
    pub fn new<P: AsRef<Path>>(path: P, sample_name: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .map_err(|e| Error::file_not_valid(&path, Some(e.to_string())))?;
        let mut writer = BufWriter::new(file);

        for line in VCF_HEADER {
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer, "##source={}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
        writeln!(
            writer,
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}",
            sample_name
        )?;

        Ok(VcfWriter {
            path,
            writer,
            num_records: 0,
        })
    }

    ///////////////////////////////
    /// Write a call at a 0-based position. Nothing is written when the genotype is
    /// homozygous for the reference or the reference base is not A, C, G or T.
    /// Returns true if a record was written
    pub fn write_call(
        &mut self,
        chromosome: usize,
        position: u32,
        ref_base: u8,
        genotype: Genotype,
        coverage: u32,
    ) -> Result<bool> {
        let Some(reference) = Base::from_ascii(ref_base) else {
            return Ok(false);
        };
        if genotype == Genotype::homozygous(reference) {
            return Ok(false);
        }

        let alts: Vec<Base> = [genotype.first(), genotype.second()]
            .into_iter()
            .filter(|&b| b != reference)
            .dedup()
            .collect();
        let allele_index = |b: Base| -> usize {
            if b == reference {
                0
            } else {
                1 + alts.iter().position(|&a| a == b).unwrap_or(0)
            }
        };
        let mut gt = [allele_index(genotype.first()), allele_index(genotype.second())];
        gt.sort_unstable();

        writeln!(
            self.writer,
            "{}\t{}\t.\t{}\t{}\t.\tPASS\tDP={}\tGT:DP\t{}/{}:{}",
            chromosome_name(chromosome),
            position as u64 + 1,
            reference,
            alts.iter().join(","),
            coverage,
            gt[0],
            gt[1],
            coverage
        )?;
        self.num_records += 1;
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.num_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|l| !l.starts_with('#'))
            .map(String::from)
            .collect()
    }

    #[test]
    fn writes_only_variants() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c0.vcf");
        let mut w = VcfWriter::new(&path, "cluster_0").unwrap();

        assert!(!w.write_call(0, 9, b'A', Genotype::homozygous(Base::A), 10).unwrap());
        assert!(!w.write_call(0, 10, b'N', Genotype::homozygous(Base::C), 10).unwrap());
        assert!(w.write_call(0, 11, b'a', Genotype::new(Base::A, Base::G), 12).unwrap());
        assert!(w.write_call(22, 0, b'C', Genotype::homozygous(Base::T), 3).unwrap());
        assert!(w.write_call(1, 5, b'A', Genotype::new(Base::C, Base::T), 8).unwrap());
        assert_eq!(w.finish().unwrap(), 3);

        let lines = records(&path);
        assert_eq!(
            lines,
            vec![
                "1\t12\t.\tA\tG\t.\tPASS\tDP=12\tGT:DP\t0/1:12",
                "X\t1\t.\tC\tT\t.\tPASS\tDP=3\tGT:DP\t1/1:3",
                "2\t6\t.\tA\tC,T\t.\tPASS\tDP=8\tGT:DP\t1/2:8",
            ]
        );
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header
            .contains("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tcluster_0"));
    }
}
