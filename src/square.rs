use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// One cell of the board, addressed by file (1 = a .. 8 = h) and rank (1..8).
///
/// A `Square` can only be built on the board; off-board arithmetic yields `None`
/// instead. Squares order by file, then rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: i8, rank: i8) -> Option<Square> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Square { file: file as u8, rank: rank as u8 })
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// The square `distance` steps along `dir`, or `None` if that leaves the board.
    pub fn offset(self, dir: (i8, i8), distance: i8) -> Option<Square> {
        let file = dir.0.checked_mul(distance).and_then(|d| (self.file as i8).checked_add(d))?;
        let rank = dir.1.checked_mul(distance).and_then(|d| (self.rank as i8).checked_add(d))?;
        Square::new(file, rank)
    }

    pub fn file_letter(self) -> char {
        (b'a' + self.file - 1) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_letter(), self.rank)
    }
}

impl FromStr for Square {
    type Err = GameError;

    /// Parse algebraic square text such as `"e4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[f, r] if (b'a'..=b'h').contains(&f.to_ascii_lowercase()) && (b'1'..=b'8').contains(&r) => {
                Ok(Square {
                    file: f.to_ascii_lowercase() - b'a' + 1,
                    rank: r - b'0',
                })
            }
            _ => Err(GameError::InvalidSquare(s.to_string())),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = GameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_string()
    }
}
