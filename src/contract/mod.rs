#[cfg(test)]
mod test;

use core::fmt;
use core::str::FromStr;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Denomination, a suit or notrump
///
/// For scoring, only the class of the strain matters: minor suits score 20
/// per trick, major suits 30, and notrump 40 for the first trick and 30
/// thereafter.  We still keep the four suits apart so that results read
/// from a traveler round-trip through [`Display`][fmt::Display].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Strain {
    /// ♣
    Clubs,
    /// ♦
    Diamonds,
    /// ♥
    Hearts,
    /// ♠
    Spades,
    /// NT, the strain not proposing a trump suit
    Notrump,
}

impl Strain {
    /// Whether this strain is a minor suit (clubs or diamonds)
    #[must_use]
    pub const fn is_minor(self) -> bool {
        matches!(self, Self::Clubs | Self::Diamonds)
    }

    /// Whether this strain is a major suit (hearts or spades)
    #[must_use]
    pub const fn is_major(self) -> bool {
        matches!(self, Self::Hearts | Self::Spades)
    }

    /// Whether this strain is notrump
    #[must_use]
    pub const fn is_notrump(self) -> bool {
        matches!(self, Self::Notrump)
    }

    /// Helper constant for iteration over all strains
    pub const ALL: [Self; 5] = [
        Self::Clubs,
        Self::Diamonds,
        Self::Hearts,
        Self::Spades,
        Self::Notrump,
    ];
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Clubs => "C",
            Self::Diamonds => "D",
            Self::Hearts => "H",
            Self::Spades => "S",
            Self::Notrump => "NT",
        })
    }
}

/// A call that proposes a contract
///
/// The order of the fields ensures natural ordering by deriving [`PartialOrd`]
/// and [`Ord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bid {
    /// The number of tricks (adding the book of 6 tricks) to take to fulfill
    /// the contract
    pub level: u8,

    /// The strain of the contract
    pub strain: Strain,
}

impl Bid {
    /// Create a bid from level and strain
    #[must_use]
    pub const fn new(level: u8, strain: Strain) -> Self {
        Self { level, strain }
    }
}

/// Penalty inflicted on a contract
///
/// The discriminant is the number of doubling steps, so `1 << penalty` is
/// the multiplier on contract points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Penalty {
    /// No penalty
    None,
    /// Doubled
    Doubled,
    /// Redoubled
    Redoubled,
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::None => "",
            Self::Doubled => "X",
            Self::Redoubled => "XX",
        })
    }
}

/// The statement of the pair winning the bidding that they will take at least
/// the number of tricks (in addition to the book of 6 tricks), and the strain
/// denotes the trump suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contract {
    /// The basic part of a contract
    pub bid: Bid,
    /// The penalty inflicted on the contract
    pub penalty: Penalty,
}

impl From<Bid> for Contract {
    fn from(bid: Bid) -> Self {
        Self {
            bid,
            penalty: Penalty::None,
        }
    }
}

const fn compute_doubled_penalty(undertricks: i32, vulnerable: bool) -> i32 {
    match undertricks + vulnerable as i32 {
        1 => 100,
        2 => {
            if vulnerable {
                200
            } else {
                300
            }
        }
        many => 300 * many - 400,
    }
}

impl Contract {
    /// Create a contract from level, strain, and penalty
    #[must_use]
    pub const fn new(level: u8, strain: Strain, penalty: Penalty) -> Self {
        Self {
            bid: Bid::new(level, strain),
            penalty,
        }
    }

    /// Base score for making this contract
    ///
    /// <https://en.wikipedia.org/wiki/Bridge_scoring#Contract_points>
    #[must_use]
    pub const fn contract_points(self) -> i32 {
        let level = self.bid.level as i32;
        let per_trick = self.bid.strain.is_minor() as i32 * -10 + 30;
        let notrump = self.bid.strain.is_notrump() as i32 * 10;
        (per_trick * level + notrump) << (self.penalty as u8)
    }

    /// Score for this contract given the number of taken tricks and
    /// vulnerability
    ///
    /// The score is positive if the declarer makes the contract, and negative
    /// if the declarer fails.
    #[must_use]
    pub const fn score(self, tricks: u8, vulnerable: bool) -> i32 {
        self.score_relative(tricks as i32 - self.bid.level as i32 - 6, vulnerable)
    }

    /// Score for this contract given overtricks (positive), undertricks
    /// (negative), or zero for a contract made exactly
    #[must_use]
    pub const fn score_relative(self, overtricks: i32, vulnerable: bool) -> i32 {
        if overtricks >= 0 {
            let base = self.contract_points();
            let game = if base < 100 {
                50
            } else if vulnerable {
                500
            } else {
                300
            };
            let doubled = self.penalty as i32 * 50;

            let slam = match self.bid.level {
                6 => (vulnerable as i32 + 2) * 250,
                7 => (vulnerable as i32 + 2) * 500,
                _ => 0,
            };

            let per_trick = match self.penalty {
                Penalty::None => self.bid.strain.is_minor() as i32 * -10 + 30,
                penalty => penalty as i32 * if vulnerable { 200 } else { 100 },
            };

            base + game + slam + doubled + overtricks * per_trick
        } else {
            match self.penalty {
                Penalty::None => overtricks * if vulnerable { 100 } else { 50 },
                penalty => penalty as i32 * -compute_doubled_penalty(-overtricks, vulnerable),
            }
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.bid.level, self.bid.strain, self.penalty)
    }
}

/// Duplicate score of a contract from its declarer's point of view
///
/// This is the lookup the score sheets call: `over_under` is positive for
/// overtricks, negative for undertricks, and zero for a contract made
/// exactly.
#[must_use]
pub const fn score(
    level: u8,
    strain: Strain,
    over_under: i8,
    vulnerable: bool,
    penalty: Penalty,
) -> i32 {
    Contract::new(level, strain, penalty).score_relative(over_under as i32, vulnerable)
}

/// The result of playing a contract, as written on a traveler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcome {
    /// The contract played
    pub contract: Contract,
    /// Overtricks (positive) or undertricks (negative)
    pub over_under: i8,
}

impl Outcome {
    /// Create an outcome, checking that the trick count is possible
    ///
    /// # Errors
    /// [`ParseOutcomeError::Level`] for a level outside `1..=7`, and
    /// [`ParseOutcomeError::Tricks`] when the declarer would take fewer than
    /// 0 or more than 13 tricks.
    pub fn new(contract: Contract, over_under: i8) -> Result<Self, ParseOutcomeError> {
        let level = contract.bid.level;

        if !(1..=7).contains(&level) {
            return Err(ParseOutcomeError::Level(level));
        }

        let tricks = level as i32 + 6 + over_under as i32;

        if !(0..=13).contains(&tricks) {
            return Err(ParseOutcomeError::Tricks(over_under));
        }

        Ok(Self {
            contract,
            over_under,
        })
    }

    /// The number of tricks taken by the declarer
    #[must_use]
    pub const fn tricks(self) -> u8 {
        (self.contract.bid.level as i32 + 6 + self.over_under as i32) as u8
    }

    /// Score for the declaring side
    #[must_use]
    pub const fn score(self, vulnerable: bool) -> i32 {
        self.contract.score_relative(self.over_under as i32, vulnerable)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.over_under {
            0 => write!(f, "{}=", self.contract),
            n => write!(f, "{}{n:+}", self.contract),
        }
    }
}

/// Error raised when reading an [`Outcome`] from traveler notation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseOutcomeError {
    /// The text is not of the form `4S=`, `3NTX-2`, `6HXX+1`
    #[error("Unrecognized result {0:?}")]
    Syntax(String),

    /// The level is not in `1..=7`
    #[error("Invalid level {0}")]
    Level(u8),

    /// The declarer cannot take that many tricks
    #[error("Impossible number of tricks: {0:+}")]
    Tricks(i8),
}

static OUTCOME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([1-7])\s*(NT|N|C|D|H|S)\s*(XX|X)?\s*(=|[+-]\d{1,2})\s*$")
        .expect("Invalid regex for outcomes")
});

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || ParseOutcomeError::Syntax(s.to_owned());
        let captures = OUTCOME.captures(s).ok_or_else(syntax)?;

        let level = captures[1].parse::<u8>().map_err(|_| syntax())?;

        let strain = match captures[2].to_ascii_uppercase().as_str() {
            "C" => Strain::Clubs,
            "D" => Strain::Diamonds,
            "H" => Strain::Hearts,
            "S" => Strain::Spades,
            _ => Strain::Notrump,
        };

        let penalty = match captures.get(3).map(|m| m.as_str().len()) {
            Some(2) => Penalty::Redoubled,
            Some(_) => Penalty::Doubled,
            None => Penalty::None,
        };

        let over_under = match &captures[4] {
            "=" => 0,
            relative => relative.parse::<i8>().map_err(|_| syntax())?,
        };

        Self::new(Contract::new(level, strain, penalty), over_under)
    }
}
