//! Generators of Howell and Mitchell movements
//!
//! Every generator returns an [`Arrangement`] whose shape is already
//! checked.  The Howell generator also checks board coverage with
//! [`validate::check_boards`] while it searches; callers still run
//! [`validate::validate`] before storing anything.


use crate::arrangement::{Arrangement, BoardSet, Cell, Pair, ShapeError};
use crate::seating::{self, Rounds, SearchExhausted};
use crate::validate;
use core::fmt;
use itertools::Itertools as _;
use thiserror::Error;

/// Howell for 6 pairs
///
/// A Room square of side 5 does not exist, so the last round shares one
/// board set among all three tables.  Pair 6 is the phantom with 5 pairs.
const HOWELL_6: [[Cell; 3]; 5] = [
    [Cell::new(6, 1, 0), Cell::new(3, 4, 1), Cell::new(5, 2, 3)],
    [Cell::new(6, 2, 1), Cell::new(4, 5, 2), Cell::new(1, 3, 3)],
    [Cell::new(6, 3, 2), Cell::new(5, 1, 1), Cell::new(2, 4, 0)],
    [Cell::new(6, 4, 3), Cell::new(1, 2, 2), Cell::new(3, 5, 0)],
    [Cell::new(6, 5, 4), Cell::new(2, 3, 4), Cell::new(4, 1, 4)],
];

/// Mitchell for 4 tables, in Mitchell numbering
///
/// NS pairs stay, but EW pairs and boards follow a different path every
/// round.  Pair 8 is the phantom with 7 pairs.
const SQUARE_MITCHELL: [[Cell; 4]; 4] = [
    [Cell::new(2, 1, 0), Cell::new(4, 3, 1), Cell::new(6, 5, 2), Cell::new(8, 7, 3)],
    [Cell::new(2, 3, 3), Cell::new(4, 1, 2), Cell::new(6, 7, 1), Cell::new(8, 5, 0)],
    [Cell::new(2, 7, 2), Cell::new(4, 5, 3), Cell::new(6, 3, 0), Cell::new(8, 1, 1)],
    [Cell::new(2, 5, 1), Cell::new(4, 7, 0), Cell::new(6, 1, 3), Cell::new(8, 3, 2)],
];

/// Error raised when a movement cannot be generated
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No round-1 seating exists for this many tables
    #[error(transparent)]
    SearchExhausted(#[from] SearchExhausted),

    /// Every seating and every board offset failed board coverage
    #[error("No Room square allocates boards for {pairs} pairs")]
    NoRoomSquare {
        /// Number of pairs
        pairs: u8,
    },

    /// Too few pairs for the movement
    #[error("{kind} needs at least {minimum} pairs, got {pairs}")]
    TooFewPairs {
        /// The movement asked for
        kind: Kind,
        /// Number of pairs
        pairs: u8,
        /// Smallest supported number of pairs
        minimum: u8,
    },

    /// Even numbers of tables other than 4 need a relay or a skip
    #[error("Mitchell for {tables} tables requires a relay table")]
    RelayTableRequired {
        /// Number of tables
        tables: usize,
    },

    /// A fixed movement asked for a number of pairs it does not seat
    #[error("The fixed {kind} seats {} or {top} pairs, not {pairs}", .top - 1)]
    FixedSize {
        /// The movement asked for
        kind: Kind,
        /// Number of pairs
        pairs: u8,
        /// Number of pairs without the phantom
        top: u8,
    },

    /// A generated grid is malformed
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Style of movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Every pair meets every other pair
    Howell,
    /// NS pairs stay, EW pairs and boards travel
    Mitchell,
}

impl Kind {
    /// Default number of boards per board set
    #[must_use]
    pub const fn decks(self, pairs: u8) -> u8 {
        match self {
            Self::Howell if pairs <= 8 => 3,
            Self::Howell => 2,
            Self::Mitchell => 4,
        }
    }

    /// Kind of a stored or generated arrangement
    ///
    /// Arrangements whose pairs keep their sides are Mitchell movements.
    #[must_use]
    pub fn of(arrangement: &Arrangement) -> Self {
        if arrangement.has_fixed_directions() {
            Self::Mitchell
        } else {
            Self::Howell
        }
    }

    /// Generate a movement of this kind
    ///
    /// # Errors
    /// See [`howell`] and [`mitchell`]
    pub fn generate(self, pairs: u8) -> Result<Arrangement, Error> {
        match self {
            Self::Howell => howell(pairs),
            Self::Mitchell => mitchell(pairs),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Howell => "Howell",
            Self::Mitchell => "Mitchell",
        })
    }
}

/// Copy a fixed grid, replacing the top pair with the phantom if needed
fn fixed<const T: usize>(
    kind: Kind,
    grid: &[[Cell; T]],
    top: u8,
    pairs: u8,
) -> Result<Arrangement, Error> {
    if !(top - 1..=top).contains(&pairs) {
        return Err(Error::FixedSize { kind, pairs, top });
    }

    let seat = |pair: Pair| if pair.0 > pairs { Pair::PHANTOM } else { pair };
    let rounds = grid
        .iter()
        .map(|round| {
            round
                .iter()
                .map(|cell| Cell {
                    ns: seat(cell.ns),
                    ew: seat(cell.ew),
                    board: cell.board,
                })
                .collect()
        })
        .collect();

    Ok(Arrangement::new(pairs, rounds)?)
}

/// The hand-made Howell for 5 or 6 pairs
///
/// # Errors
/// [`Error::FixedSize`] for other numbers of pairs
pub fn fixed_howell(pairs: u8) -> Result<Arrangement, Error> {
    fixed(Kind::Howell, HOWELL_6.as_slice(), 6, pairs)
}

/// The Mitchell for 7 or 8 pairs, where the closed form fails
///
/// # Errors
/// [`Error::FixedSize`] for other numbers of pairs
pub fn square_mitchell(pairs: u8) -> Result<Arrangement, Error> {
    fixed(Kind::Mitchell, SQUARE_MITCHELL.as_slice(), 8, pairs)
}

/// Mitchell movement in Mitchell numbering
///
/// NS pair `2t + 2` stays at table `t`, EW pairs move up one table and
/// board sets move down one table every round.  The NS seat of the last
/// table is the phantom when the number of pairs is odd.
///
/// # Errors
/// - [`Error::TooFewPairs`] below 3 pairs
/// - [`Error::RelayTableRequired`] for an even number of tables except 4
pub fn mitchell(pairs: u8) -> Result<Arrangement, Error> {
    if pairs < 3 {
        return Err(Error::TooFewPairs {
            kind: Kind::Mitchell,
            pairs,
            minimum: 3,
        });
    }

    let tables = usize::from(pairs).div_ceil(2);

    if tables == 4 {
        log::info!("Using the square Mitchell for {pairs} pairs");
        return square_mitchell(pairs);
    }

    if tables % 2 == 0 {
        let error = Error::RelayTableRequired { tables };
        log::error!("{error}");
        return Err(error);
    }

    #[allow(clippy::cast_possible_truncation)]
    let rounds = (0..tables)
        .map(|round| {
            (0..tables)
                .map(|table| {
                    let ns = 2 * table + 2;
                    let ns = if ns > usize::from(pairs) { 0 } else { ns };
                    let ew = ((tables - round) % tables + table) % tables * 2 + 1;
                    let board = (round + table) % tables;
                    Cell::new(ns as u8, ew as u8, board as u8)
                })
                .collect()
        })
        .collect();

    Ok(Arrangement::new(pairs, rounds)?)
}

/// Howell movement with boards allocated by a Room square
///
/// Pairs 5 and 6 use [`fixed_howell`].  Larger events try every seating
/// from [`seating::seatings`] in order with [`room_square`].
///
/// # Errors
/// - [`Error::TooFewPairs`] below 5 pairs
/// - [`Error::SearchExhausted`] if no seating exists
/// - [`Error::NoRoomSquare`] if no seating admits a board allocation
pub fn howell(pairs: u8) -> Result<Arrangement, Error> {
    if pairs < 5 {
        return Err(Error::TooFewPairs {
            kind: Kind::Howell,
            pairs,
            minimum: 5,
        });
    }

    if pairs <= 6 {
        log::info!("Using the fixed Howell for {pairs} pairs");
        return fixed_howell(pairs);
    }

    let tables = usize::from(pairs).div_ceil(2);

    for (index, seating) in seating::seatings(tables)?.iter().enumerate() {
        log::debug!("Allocating boards for {pairs} pairs with seating {index}");

        if let Some(arrangement) = room_square(pairs, seating)? {
            return Ok(arrangement);
        }
    }

    let error = Error::NoRoomSquare { pairs };
    log::error!("{error}");
    Err(error)
}

/// Allocate boards to the rounds unrolled from one seating
///
/// Table 1 plays the board set numbered one below its EW pair.  Table
/// `k + 1` plays that set shifted by `offsets[k]`.  Offset sequences are
/// permutations of `1..rounds` tried in lexicographic order, and the first
/// one covering every board set properly wins.  Its offsets, sorted and
/// preceded by 0 for table 1, are recorded as the board movement.
///
/// Returns `Ok(None)` if no offset sequence works for this seating.
///
/// # Errors
/// [`Error::Shape`] if the seating unrolls into a malformed grid
///
/// # Panics
/// Panics if the seating does not fit the number of pairs, as in
/// [`Rounds::new`].
pub fn room_square(pairs: u8, seating: &[u8]) -> Result<Option<Arrangement>, Error> {
    let rounds: Vec<_> = Rounds::new(pairs, seating).collect();
    let count = rounds.len();
    let tables = rounds.first().map_or(0, Vec::len);

    #[allow(clippy::cast_possible_truncation)]
    let symbols = count as u8;

    for (trial, offsets) in (1..symbols).permutations(tables - 1).enumerate() {
        let grid = rounds
            .iter()
            .map(|round| allocate(round, &offsets, count))
            .collect();

        let arrangement = Arrangement::new(pairs, grid)?;

        if validate::check_boards(&arrangement).is_ok() {
            log::info!(
                "Room square for {pairs} pairs found at trial {}: {offsets:?}",
                trial + 1
            );
            let movement = core::iter::once(0).chain(offsets.into_iter().sorted()).collect();
            return Ok(Some(arrangement.with_board_movement(movement)));
        }
    }

    Ok(None)
}

fn allocate(round: &[[Pair; 2]], offsets: &[u8], count: usize) -> Vec<Cell> {
    let anchor = round.first().map_or(0, |[_, ew]| usize::from(ew.0.saturating_sub(1)));

    round
        .iter()
        .enumerate()
        .map(|(table, &[ns, ew])| {
            let offset = table.checked_sub(1).map_or(0, |k| usize::from(offsets[k]));
            #[allow(clippy::cast_possible_truncation)]
            let board = BoardSet(((anchor + offset) % count) as u8);
            Cell { ns, ew, board }
        })
        .collect()
}
