
use crate::arrangement::{Arrangement, BoardSet, Pair, Play, Side};
use crate::contract::Outcome;
use core::fmt;
use std::collections::BTreeMap;
use thiserror::Error;

bitflags::bitflags! {
    /// Sides vulnerable on a board
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Vulnerability: u8 {
        /// Nobody is vulnerable
        const NONE = 0;
        /// North-South are vulnerable
        const NS = 0b01;
        /// East-West are vulnerable
        const EW = 0b10;
        /// Everybody is vulnerable
        const BOTH = Self::NS.bits() | Self::EW.bits();
    }
}

const _: () = assert!(matches!(Vulnerability::all(), Vulnerability::BOTH));
const _: () = assert!(matches!(Vulnerability::NS.union(Vulnerability::EW), Vulnerability::BOTH));

impl Vulnerability {
    /// The set containing only one side
    #[must_use]
    pub const fn side(side: Side) -> Self {
        match side {
            Side::NS => Self::NS,
            Side::EW => Self::EW,
        }
    }

    /// Whether a side is vulnerable
    #[must_use]
    pub const fn is_vulnerable(self, side: Side) -> bool {
        self.contains(Self::side(side))
    }
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self.bits() {
            0 => "None",
            1 => "NS",
            2 => "EW",
            _ => "Both",
        })
    }
}

const VULNERABILITY_CYCLE: [Vulnerability; 4] = [
    Vulnerability::NONE,
    Vulnerability::NS,
    Vulnerability::EW,
    Vulnerability::BOTH,
];

/// Vulnerability of a zero-based board number
///
/// The standard 16-board cycle: each group of 4 boards shifts the sequence
/// None, NS, EW, Both by one.
#[must_use]
pub const fn vulnerability(board: u16) -> Vulnerability {
    let board = board as usize;
    VULNERABILITY_CYCLE[(board + board / 4) % 4]
}

/// Lower bounds of the IMP steps
const IMP_SCALE: [u32; 25] = [
    0, 20, 50, 90, 130, 170, 220, 270, 320, 370, 430, 500, 600, 750, 900, 1100, 1300, 1500, 1750,
    2000, 2250, 2500, 3000, 3500, 4000,
];

/// IMPs for a score difference
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn imp(differential: u32) -> u8 {
    (IMP_SCALE.partition_point(|&bound| bound <= differential) - 1) as u8
}

/// Signed IMPs won by score `a` against score `b`
#[must_use]
pub fn imps(a: i32, b: i32) -> i32 {
    let magnitude = i32::from(imp(a.abs_diff(b)));
    magnitude * (a - b).signum()
}

/// Match points for score `a` against score `b`
///
/// A win is 1, a tie 0.5, and a loss 0.  Comparisons involving an absent
/// score (an average or an unplayed line) are 0.5.
#[must_use]
pub fn match_point_compare(a: Option<i32>, b: Option<i32>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a > b => 1.0,
        (Some(a), Some(b)) if a < b => 0.0,
        _ => 0.5,
    }
}

/// Match-point percentage of every line of a board
///
/// `nets` are the net scores of the same side on every line.  A line scores
/// the average of its comparisons against the other lines, or 0.5 when the
/// board was played once.
#[must_use]
pub fn matchpoints(nets: &[Option<i32>]) -> Vec<f64> {
    if nets.len() < 2 {
        return vec![0.5; nets.len()];
    }

    #[allow(clippy::cast_precision_loss)]
    let others = (nets.len() - 1) as f64;

    nets.iter()
        .enumerate()
        .map(|(i, &net)| {
            let total: f64 = nets
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &other)| match_point_compare(net, other))
                .sum();
            total / others
        })
        .collect()
}

/// Cross-IMPs of every line of a board
///
/// Each line scores the average of its IMPs against every other line.
/// Comparisons involving an absent score count 0.
#[must_use]
pub fn cross_imps(nets: &[Option<i32>]) -> Vec<f64> {
    if nets.len() < 2 {
        return vec![0.0; nets.len()];
    }

    #[allow(clippy::cast_precision_loss)]
    let others = (nets.len() - 1) as f64;

    nets.iter()
        .enumerate()
        .map(|(i, &net)| {
            let total: i32 = nets
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &other)| match (net, other) {
                    (Some(a), Some(b)) => imps(a, b),
                    _ => 0,
                })
                .sum();
            f64::from(total) / others
        })
        .collect()
}

/// One line of a traveler
///
/// A traveler records the score in the column of the side that scored, so
/// at most one of the two columns is filled.  A line with neither is an
/// average or not played yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TravelerLine {
    /// Score written in the NS column
    pub ns: Option<i32>,
    /// Score written in the EW column
    pub ew: Option<i32>,
}

impl TravelerLine {
    /// A line with no score
    pub const AVERAGE: Self = Self { ns: None, ew: None };

    /// A score for one side
    #[must_use]
    pub const fn scored(side: Side, score: i32) -> Self {
        match side {
            Side::NS => Self {
                ns: Some(score),
                ew: None,
            },
            Side::EW => Self {
                ns: None,
                ew: Some(score),
            },
        }
    }

    /// The line for a played contract
    ///
    /// A made contract goes to the declaring side's column, a defeated one
    /// to the defenders' column.
    #[must_use]
    pub const fn from_outcome(outcome: Outcome, declarer: Side, vulnerability: Vulnerability) -> Self {
        let score = outcome.score(vulnerability.is_vulnerable(declarer));

        if score >= 0 {
            Self::scored(declarer, score)
        } else {
            Self::scored(declarer.opponent(), -score)
        }
    }

    /// Net score of a side: its own score, or else the negated score of the
    /// opponents
    #[must_use]
    pub const fn net(self, side: Side) -> Option<i32> {
        let (own, theirs) = match side {
            Side::NS => (self.ns, self.ew),
            Side::EW => (self.ew, self.ns),
        };

        match (own, theirs) {
            (Some(score), _) => Some(score),
            (None, Some(score)) => Some(-score),
            (None, None) => None,
        }
    }
}

/// Error raised when recording a result that does not fit the arrangement
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    /// The board is beyond the last board set
    #[error("Board {} is not in play", .board + 1)]
    NoSuchBoard {
        /// Zero-based board
        board: u16,
    },

    /// The board is not played at the table in the round
    #[error("Board {} is not played at table {} in round {}", .board + 1, .table + 1, .round + 1)]
    NotPlayed {
        /// Zero-based board
        board: u16,
        /// Zero-based round
        round: usize,
        /// Zero-based table
        table: usize,
    },

    /// The table is a sit-out in the round
    #[error("Board {} sits out at table {} in round {}", .board + 1, .table + 1, .round + 1)]
    SitOut {
        /// Zero-based board
        board: u16,
        /// Zero-based round
        round: usize,
        /// Zero-based table
        table: usize,
    },
}

/// A scored line of a traveler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardResult {
    /// Where the board was played
    pub play: Play,
    /// The result entered
    pub line: TravelerLine,
    /// Match-point percentage, NS then EW
    pub matchpoints: [f64; 2],
    /// Cross-IMPs, NS then EW
    pub imps: [f64; 2],
}

/// Overall result of a pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standing {
    /// The pair
    pub pair: Pair,
    /// Number of boards played
    pub boards: usize,
    /// Average match-point percentage
    pub matchpoints: f64,
    /// Total cross-IMPs
    pub imps: f64,
    /// Direction the pair is ranked in, for movements where pairs keep
    /// their sides
    pub direction: Option<Side>,
}

/// Results of an event, board by board
///
/// Boards are numbered from zero across the event: board set `s` holds
/// boards `s * decks..(s + 1) * decks`.  A result belongs to one play, the
/// board at a table in a round, since several tables may share a board set
/// in the same round.  Plays at a sit-out table are not on the traveler.
/// Lines without a recorded result count as averages.
#[derive(Debug, Clone)]
pub struct Scorecard<'a> {
    arrangement: &'a Arrangement,
    decks: u8,
    results: BTreeMap<(u16, usize, usize), TravelerLine>,
}

impl<'a> Scorecard<'a> {
    /// Start an empty scorecard
    ///
    /// # Panics
    /// Panics if `decks` is zero.
    #[must_use]
    pub fn new(arrangement: &'a Arrangement, decks: u8) -> Self {
        assert!(decks > 0, "A board set holds at least one board");
        Self {
            arrangement,
            decks,
            results: BTreeMap::new(),
        }
    }

    /// The arrangement scored
    #[must_use]
    pub const fn arrangement(&self) -> &'a Arrangement {
        self.arrangement
    }

    /// Number of boards per board set
    #[must_use]
    pub const fn decks(&self) -> u8 {
        self.decks
    }

    /// Number of boards in the event
    #[must_use]
    pub fn boards(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation)]
        let rounds = self.arrangement.rounds() as u16;
        rounds * u16::from(self.decks)
    }

    /// Plays of a board that go on its traveler, in round order
    #[must_use]
    pub fn traveler(&self, board: u16) -> Vec<Play> {
        let set = BoardSet::of_board(board, self.decks);

        self.arrangement
            .by_board(set)
            .into_iter()
            .filter(|play| !play.cell.ns.is_phantom() && !play.cell.ew.is_phantom())
            .collect()
    }

    fn check(&self, board: u16, round: usize, table: usize) -> Result<(), ScoreError> {
        if board >= self.boards() {
            return Err(ScoreError::NoSuchBoard { board });
        }

        let not_played = ScoreError::NotPlayed {
            board,
            round,
            table,
        };

        if round >= self.arrangement.rounds() || table >= self.arrangement.tables() {
            return Err(not_played);
        }

        let cell = self.arrangement.cell(round, table);

        if cell.board != BoardSet::of_board(board, self.decks) {
            return Err(not_played);
        }

        if cell.ns.is_phantom() || cell.ew.is_phantom() {
            return Err(ScoreError::SitOut {
                board,
                round,
                table,
            });
        }

        Ok(())
    }

    /// Record the result of a board at a table in a round
    ///
    /// # Errors
    /// A [`ScoreError`] if the board is not played there
    pub fn record(
        &mut self,
        board: u16,
        round: usize,
        table: usize,
        line: TravelerLine,
    ) -> Result<(), ScoreError> {
        self.check(board, round, table)?;
        log::debug!(
            "Board {} round {} table {}: {line:?}",
            board + 1,
            round + 1,
            table + 1
        );
        self.results.insert((board, round, table), line);
        Ok(())
    }

    /// Record a contract played by a declaring side
    ///
    /// # Errors
    /// A [`ScoreError`] if the board is not played there
    pub fn record_outcome(
        &mut self,
        board: u16,
        round: usize,
        table: usize,
        outcome: Outcome,
        declarer: Side,
    ) -> Result<(), ScoreError> {
        let line = TravelerLine::from_outcome(outcome, declarer, vulnerability(board));
        self.record(board, round, table, line)
    }

    /// The recorded line, if any
    #[must_use]
    pub fn line(&self, board: u16, round: usize, table: usize) -> Option<TravelerLine> {
        self.results.get(&(board, round, table)).copied()
    }

    /// Score every line of a board's traveler
    #[must_use]
    pub fn board_results(&self, board: u16) -> Vec<BoardResult> {
        let plays = self.traveler(board);
        let lines: Vec<_> = plays
            .iter()
            .map(|play| self.line(board, play.round, play.table).unwrap_or_default())
            .collect();

        let nets = |side: Side| lines.iter().map(|line| line.net(side)).collect::<Vec<_>>();
        let (ns, ew) = (nets(Side::NS), nets(Side::EW));
        let (ns_mp, ew_mp) = (matchpoints(&ns), matchpoints(&ew));
        let (ns_imps, ew_imps) = (cross_imps(&ns), cross_imps(&ew));

        plays
            .into_iter()
            .zip(lines)
            .enumerate()
            .map(|(i, (play, line))| BoardResult {
                play,
                line,
                matchpoints: [ns_mp[i], ew_mp[i]],
                imps: [ns_imps[i], ew_imps[i]],
            })
            .collect()
    }

    /// Standings of all real pairs, best match-point percentage first
    ///
    /// When every pair keeps its side, as in a Mitchell, NS pairs are ranked
    /// among themselves first and EW pairs after them.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let directions = self.arrangement.has_fixed_directions();

        let mut totals: BTreeMap<Pair, (usize, f64, f64)> = self
            .arrangement
            .pair_ids()
            .filter(|pair| !pair.is_phantom())
            .map(|pair| (pair, (0, 0.0, 0.0)))
            .collect();

        for board in 0..self.boards() {
            for result in self.board_results(board) {
                for (index, side) in Side::ALL.into_iter().enumerate() {
                    if let Some(total) = totals.get_mut(&result.play.cell.pair(side)) {
                        total.0 += 1;
                        total.1 += result.matchpoints[index];
                        total.2 += result.imps[index];
                    }
                }
            }
        }

        let mut standings: Vec<_> = totals
            .into_iter()
            .map(|(pair, (boards, matchpoints, imps))| {
                #[allow(clippy::cast_precision_loss)]
                let matchpoints = if boards == 0 {
                    0.5
                } else {
                    matchpoints / boards as f64
                };

                Standing {
                    pair,
                    boards,
                    matchpoints,
                    imps,
                    direction: directions
                        .then(|| self.arrangement.direction(pair))
                        .flatten(),
                }
            })
            .collect();

        standings.sort_by(|a, b| {
            a.direction
                .cmp(&b.direction)
                .then(b.matchpoints.total_cmp(&a.matchpoints))
                .then(a.pair.cmp(&b.pair))
        });

        log::info!("Ranked {} pairs over {} boards", standings.len(), self.boards());
        standings
    }
}
