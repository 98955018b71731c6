
use core::fmt;
use core::ops::Range;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A pair of players, the unit that moves through the event
///
/// Pairs are numbered from 1.  [`Pair::PHANTOM`] takes the empty seat when
/// the number of pairs is odd; whoever is drawn against it sits out.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pair(pub u8);

impl Pair {
    /// The sit-out pair
    pub const PHANTOM: Self = Self(0);

    /// Whether this is the sit-out pair
    #[must_use]
    pub const fn is_phantom(self) -> bool {
        self.0 == 0
    }

    /// Side and number printed on Mitchell scoresheets
    ///
    /// Mitchell pairs are numbered internally as NS = 2, 4, 6, … and
    /// EW = 1, 3, 5, …, while players know them as NS 1, 2, 3, … and EW 1, 2,
    /// 3, ….  The phantom has no printed number.
    #[must_use]
    pub const fn mitchell_number(self) -> Option<(Side, u8)> {
        match self.0 {
            0 => None,
            n if n % 2 == 0 => Some((Side::NS, n / 2)),
            n => Some((Side::EW, n / 2 + 1)),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_phantom() {
            f.pad("-")
        } else {
            fmt::Display::fmt(&self.0, f)
        }
    }
}

/// A group of boards dealt together and always played together
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BoardSet(pub u8);

impl BoardSet {
    /// Zero-based indices of the physical boards in this set
    #[must_use]
    pub fn boards(self, decks: u8) -> Range<u16> {
        let first = u16::from(self.0) * u16::from(decks);
        first..first + u16::from(decks)
    }

    /// The board set containing a physical board
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn of_board(board: u16, decks: u8) -> Self {
        Self((board / decks as u16) as u8)
    }
}

impl fmt::Display for BoardSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use fmt::Write;

        if self.0 < 26 {
            f.write_char(char::from(b'A' + self.0))
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Orientation at a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Side {
    /// North-South
    NS,
    /// East-West
    EW,
}

impl Side {
    /// Both sides, NS first
    pub const ALL: [Self; 2] = [Self::NS, Self::EW];

    /// The other side of the table
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::NS => Self::EW,
            Self::EW => Self::NS,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::NS => "NS",
            Self::EW => "EW",
        })
    }
}

/// Who sits at a table in a round, and what they play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// The pair sitting North-South
    #[serde(rename = "NS")]
    pub ns: Pair,
    /// The pair sitting East-West
    #[serde(rename = "EW")]
    pub ew: Pair,
    /// The boards played
    #[serde(rename = "Board")]
    pub board: BoardSet,
}

impl Cell {
    /// Seat two pairs at a table with a board set
    #[must_use]
    pub const fn new(ns: u8, ew: u8, board: u8) -> Self {
        Self {
            ns: Pair(ns),
            ew: Pair(ew),
            board: BoardSet(board),
        }
    }

    /// The pair sitting on a side
    #[must_use]
    pub const fn pair(self, side: Side) -> Pair {
        match side {
            Side::NS => self.ns,
            Side::EW => self.ew,
        }
    }

    /// The side a pair sits on, if it sits here at all
    #[must_use]
    pub fn side_of(self, pair: Pair) -> Option<Side> {
        Side::ALL.into_iter().find(|&side| self.pair(side) == pair)
    }
}

/// A cell together with its position in the arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Play {
    /// Zero-based round
    pub round: usize,
    /// Zero-based table
    pub table: usize,
    /// The pairs and boards
    pub cell: Cell,
}

/// Error raised when a grid of cells cannot be an arrangement
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Fewer than 3 pairs cannot make a movement
    #[error("{0} pairs are too few for a movement")]
    TooFewPairs(u8),

    /// No rounds at all
    #[error("The arrangement has no rounds")]
    Empty,

    /// A round does not seat `ceil(pairs / 2)` tables
    #[error("Round {} has {found} tables instead of {expected}", .round + 1)]
    Tables {
        /// Zero-based round
        round: usize,
        /// Tables in that round
        found: usize,
        /// `ceil(pairs / 2)`
        expected: usize,
    },

    /// A pair number outside the event
    #[error("Round {} table {}: no pair {pair} in a {pairs}-pair event", .round + 1, .table + 1)]
    PairOutOfRange {
        /// Zero-based round
        round: usize,
        /// Zero-based table
        table: usize,
        /// The offending pair
        pair: Pair,
        /// Number of pairs in the event
        pairs: u8,
    },

    /// A board set beyond the number of rounds
    #[error("Round {} table {}: board set {} out of range", .round + 1, .table + 1, .board.0)]
    BoardOutOfRange {
        /// Zero-based round
        round: usize,
        /// Zero-based table
        table: usize,
        /// The offending board set
        board: BoardSet,
    },
}

/// Seating and boards for every table in every round
///
/// An arrangement is built once, checked by [`crate::validate`], and read
/// from then on.  Its shape is guaranteed on construction: every round seats
/// `ceil(pairs / 2)` tables, pair numbers are within the event, the phantom
/// appears only when the number of pairs is odd, and board sets are numbered
/// below the number of rounds.  Whether it is a *legal* movement is a
/// separate question answered by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pairs: u8,
    tables: usize,
    cells: Vec<Cell>,
    board_movement: Option<Vec<u8>>,
}

impl Arrangement {
    /// Build an arrangement from rounds of tables
    ///
    /// # Errors
    /// A [`ShapeError`] describing the first structural problem found
    pub fn new(pairs: u8, rounds: Vec<Vec<Cell>>) -> Result<Self, ShapeError> {
        if pairs < 3 {
            return Err(ShapeError::TooFewPairs(pairs));
        }

        if rounds.is_empty() {
            return Err(ShapeError::Empty);
        }

        let tables = usize::from(pairs).div_ceil(2);
        let count = rounds.len();
        let mut cells = Vec::with_capacity(count * tables);

        for (round, row) in rounds.into_iter().enumerate() {
            if row.len() != tables {
                return Err(ShapeError::Tables {
                    round,
                    found: row.len(),
                    expected: tables,
                });
            }

            for (table, cell) in row.into_iter().enumerate() {
                for pair in [cell.ns, cell.ew] {
                    let phantom_allowed = pairs % 2 == 1;

                    if pair.0 > pairs || (pair.is_phantom() && !phantom_allowed) {
                        return Err(ShapeError::PairOutOfRange {
                            round,
                            table,
                            pair,
                            pairs,
                        });
                    }
                }

                if usize::from(cell.board.0) >= count {
                    return Err(ShapeError::BoardOutOfRange {
                        round,
                        table,
                        board: cell.board,
                    });
                }

                cells.push(cell);
            }
        }

        Ok(Self {
            pairs,
            tables,
            cells,
            board_movement: None,
        })
    }

    /// Attach the board offsets the allocator settled on
    #[must_use]
    pub fn with_board_movement(mut self, movement: Vec<u8>) -> Self {
        self.board_movement = Some(movement);
        self
    }

    /// Number of real pairs, not counting the phantom
    #[must_use]
    pub const fn pairs(&self) -> u8 {
        self.pairs
    }

    /// Whether one seat is taken by the phantom
    #[must_use]
    pub const fn has_phantom(&self) -> bool {
        self.pairs % 2 == 1
    }

    /// All pair numbers seated, including the phantom if there is one
    pub fn pair_ids(&self) -> impl Iterator<Item = Pair> {
        let first = u8::from(!self.has_phantom());
        (first..=self.pairs).map(Pair)
    }

    /// Number of tables
    #[must_use]
    pub const fn tables(&self) -> usize {
        self.tables
    }

    /// Number of rounds, which is also the number of board sets
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.cells.len() / self.tables
    }

    /// Board offsets recorded by the Room-square allocator
    #[must_use]
    pub fn board_movement(&self) -> Option<&[u8]> {
        self.board_movement.as_deref()
    }

    /// The cell at a round and table
    ///
    /// # Panics
    /// Panics if the round or the table is out of range.
    #[must_use]
    pub fn cell(&self, round: usize, table: usize) -> Cell {
        assert!(table < self.tables, "Table {table} out of range");
        self.cells[round * self.tables + table]
    }

    /// The tables of a round
    ///
    /// # Panics
    /// Panics if the round is out of range.
    #[must_use]
    pub fn round(&self, round: usize) -> &[Cell] {
        &self.cells[round * self.tables..(round + 1) * self.tables]
    }

    /// Iterate over rounds
    pub fn iter_rounds(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.tables)
    }

    /// Every cell with its position, round by round
    pub fn plays(&self) -> impl Iterator<Item = Play> + '_ {
        self.cells.iter().enumerate().map(|(i, &cell)| Play {
            round: i / self.tables,
            table: i % self.tables,
            cell,
        })
    }

    /// Where a board set is played, in round order
    #[must_use]
    pub fn by_board(&self, board: BoardSet) -> Vec<Play> {
        self.plays().filter(|play| play.cell.board == board).collect()
    }

    /// Where a pair sits, round by round, and on which side
    #[must_use]
    pub fn by_pair(&self, pair: Pair) -> Vec<(Play, Side)> {
        self.plays()
            .filter_map(|play| play.cell.side_of(pair).map(|side| (play, side)))
            .collect()
    }

    /// The side a pair sits on in every round, if it never changes sides
    #[must_use]
    pub fn direction(&self, pair: Pair) -> Option<Side> {
        let mut sides = self.cells.iter().filter_map(|cell| cell.side_of(pair));
        let first = sides.next()?;
        sides.all(|side| side == first).then_some(first)
    }

    /// Whether every real pair keeps its side for the whole event
    ///
    /// This holds for Mitchell movements, where NS and EW pairs are ranked
    /// separately, and fails for Howell movements.
    #[must_use]
    pub fn has_fixed_directions(&self) -> bool {
        self.pair_ids()
            .filter(|pair| !pair.is_phantom())
            .all(|pair| self.direction(pair).is_some())
    }

    /// Rounds of tables, the layout of the stored format
    #[must_use]
    pub fn to_rounds(&self) -> Vec<Vec<Cell>> {
        self.iter_rounds().map(<[Cell]>::to_vec).collect()
    }

    /// Display the arrangement as a round-by-board grid
    #[must_use]
    pub fn display(&self) -> impl fmt::Display + '_ {
        ArrangementDisplay { arrangement: self }
    }
}

struct ArrangementDisplay<'a> {
    arrangement: &'a Arrangement,
}

impl fmt::Display for ArrangementDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arrangement = self.arrangement;
        let rounds = arrangement.rounds();

        writeln!(
            f,
            "{} Pairs, {} Rounds, {} Tables",
            arrangement.pairs, rounds, arrangement.tables
        )?;

        write!(f, "{:>4}", "Brd")?;
        for board in 0..rounds {
            #[allow(clippy::cast_possible_truncation)]
            write!(f, "{:^6}", BoardSet(board as u8).to_string())?;
        }
        writeln!(f)?;

        for (index, round) in arrangement.iter_rounds().enumerate() {
            write!(f, "{:>2}: ", index + 1)?;

            for board in 0..rounds {
                match round.iter().find(|cell| usize::from(cell.board.0) == board) {
                    Some(cell) => write!(f, "{:>2},{:<2} ", cell.ns, cell.ew)?,
                    None => write!(f, "{:5} ", "")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
