use std::fmt;
use std::ops::{Add, AddAssign, Index};

///////////////////////////////
/// One nucleotide. The discriminant is the slot of the nucleotide in a BaseCount, and the
/// order A, C, G, T is also the tie-break order whenever two bases have equal counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Base {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Base {
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Base {
        Base::ALL[i & 3]
    }

    pub fn from_ascii(c: u8) -> Option<Base> {
        match c {
            b'A' | b'a' => Some(Base::A),
            b'C' | b'c' => Some(Base::C),
            b'G' | b'g' => Some(Base::G),
            b'T' | b't' => Some(Base::T),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

///////////////////////////////
/// Read counts for A, C, G and T at one position, for one cell or a pool of cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BaseCount(pub [u32; 4]);

impl BaseCount {
    pub const ZERO: BaseCount = BaseCount([0; 4]);

    pub fn new(a: u32, c: u32, g: u32, t: u32) -> Self {
        BaseCount([a, c, g, t])
    }

    /// Total number of reads covering the position
    #[inline]
    pub fn coverage(&self) -> u32 {
        self.0.iter().sum()
    }

    #[inline]
    pub fn get(&self, base: Base) -> u32 {
        self.0[base.index()]
    }

    /// The most frequent base. Ties go to the base earliest in A, C, G, T order
    pub fn dominant(&self) -> Base {
        let mut best = 0;
        for i in 1..4 {
            if self.0[i] > self.0[best] {
                best = i;
            }
        }
        Base::from_index(best)
    }

    /// Slot indices ordered by decreasing count; equal counts keep A, C, G, T order
    pub fn sort_order_desc(&self) -> [usize; 4] {
        let mut idx = [0usize, 1, 2, 3];
        //sort_by is stable, so ties keep their slot order
        idx.sort_by(|&a, &b| self.0[b].cmp(&self.0[a]));
        idx
    }
}

impl From<[u32; 4]> for BaseCount {
    fn from(c: [u32; 4]) -> Self {
        BaseCount(c)
    }
}

impl Index<usize> for BaseCount {
    type Output = u32;

    fn index(&self, i: usize) -> &u32 {
        &self.0[i]
    }
}

impl AddAssign for BaseCount {
    fn add_assign(&mut self, other: BaseCount) {
        for i in 0..4 {
            self.0[i] += other.0[i];
        }
    }
}

impl Add for BaseCount {
    type Output = BaseCount;

    fn add(mut self, other: BaseCount) -> BaseCount {
        self += other;
        self
    }
}

impl std::iter::Sum for BaseCount {
    fn sum<I: Iterator<Item = BaseCount>>(iter: I) -> BaseCount {
        iter.fold(BaseCount::ZERO, |acc, c| acc + c)
    }
}

///////////////////////////////
/// A diploid genotype. The two alleles are stored in A, C, G, T order so that
/// each unordered pair has exactly one representation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Genotype {
    first: Base,
    second: Base,
}

impl Genotype {
    pub fn new(a: Base, b: Base) -> Self {
        if a <= b {
            Genotype { first: a, second: b }
        } else {
            Genotype { first: b, second: a }
        }
    }

    pub fn homozygous(base: Base) -> Self {
        Genotype {
            first: base,
            second: base,
        }
    }

    pub fn first(&self) -> Base {
        self.first
    }

    pub fn second(&self) -> Base {
        self.second
    }

    pub fn is_homozygous(&self) -> bool {
        self.first == self.second
    }

    /// Dense index 0..10 over the ten diploid genotypes: AA, AC, AG, AT, CC, CG, CT, GG, GT, TT
    pub fn index(&self) -> u8 {
        let a = self.first.index() as u8;
        let b = self.second.index() as u8;
        //Number of genotypes whose first allele sorts before a, plus offset within row a
        a * 4 - a * (a.saturating_sub(1)) / 2 + (b - a)
    }

    pub fn from_index(i: u8) -> Option<Self> {
        Self::all().into_iter().find(|g| g.index() == i)
    }

    pub fn all() -> [Genotype; 10] {
        let mut out = [Genotype::homozygous(Base::A); 10];
        let mut k = 0;
        for a in 0..4 {
            for b in a..4 {
                out[k] = Genotype::new(Base::from_index(a), Base::from_index(b));
                k += 1;
            }
        }
        out
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_tie_break() {
        assert_eq!(BaseCount::new(3, 3, 0, 0).dominant(), Base::A);
        assert_eq!(BaseCount::new(0, 1, 5, 5).dominant(), Base::G);
        assert_eq!(BaseCount::ZERO.dominant(), Base::A);
    }

    #[test]
    fn sort_order_is_stable() {
        assert_eq!(BaseCount::new(1, 7, 7, 0).sort_order_desc(), [1, 2, 0, 3]);
        assert_eq!(BaseCount::ZERO.sort_order_desc(), [0, 1, 2, 3]);
    }

    #[test]
    fn genotype_index_is_dense() {
        let all = Genotype::all();
        for (i, g) in all.iter().enumerate() {
            assert_eq!(g.index() as usize, i, "genotype {}", g);
            assert_eq!(Genotype::from_index(i as u8), Some(*g));
        }
        assert_eq!(Genotype::from_index(10), None);
        assert_eq!(Genotype::new(Base::T, Base::C).to_string(), "CT");
    }

    #[test]
    fn sum_counts() {
        let total: BaseCount = vec![BaseCount::new(1, 2, 3, 4), BaseCount::new(4, 3, 2, 1)]
            .into_iter()
            .sum();
        assert_eq!(total, BaseCount::new(5, 5, 5, 5));
        assert_eq!(total.coverage(), 20);
    }
}
