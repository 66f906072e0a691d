use std::fmt::{self, Display};

///
/// Region struct, one line of a diploid-region BED file
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: i64,
    pub end: i64,
}

impl Region {
    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> i64 {
        self.end - self.start
    }

    ///
    /// Does the half-open region contain this 0-based offset
    ///
    pub fn contains(&self, position: i64) -> bool {
        self.start <= position && position < self.end
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chr, self.start, self.end)
    }
}
