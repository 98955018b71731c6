//! Legality checks for arrangements
//!
//! The three checks are independent and each returns the first problem it
//! finds.  They visit rounds, tables, and seats in order, so repeated runs
//! report identical errors.

#[cfg(test)]
mod test;

use crate::arrangement::{Arrangement, BoardSet, Pair, Side};
use crate::seating::Encounters;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Error raised when an arrangement is not a legal movement
///
/// Rounds and tables are zero-based in the fields and one-based in the
/// messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Whoever leaves this seat after this round does not go where the
    /// occupant of the same seat went in an earlier round
    #[error("Round {}: the {side} pair of table {} moves differently than before", .round + 1, .table + 1)]
    InconsistentMovement {
        /// Zero-based round the pair leaves
        round: usize,
        /// Zero-based table
        table: usize,
        /// Seat at the table
        side: Side,
    },

    /// Two pairs meet a second time
    #[error("Round {} table {}: pairs {first} and {second} have met before", .round + 1, .table + 1)]
    RepeatedPairing {
        /// Zero-based round
        round: usize,
        /// Zero-based table
        table: usize,
        /// The NS pair
        first: Pair,
        /// The EW pair
        second: Pair,
    },

    /// A pair has no seat in a round
    #[error("Round {}: pair {pair} has no seat", .round + 1)]
    MissingPair {
        /// Zero-based round
        round: usize,
        /// The absent pair
        pair: Pair,
    },

    /// A pair has more than one seat in a round
    #[error("Round {}: pair {pair} sits twice", .round + 1)]
    DuplicateSeat {
        /// Zero-based round
        round: usize,
        /// The pair seated twice
        pair: Pair,
    },

    /// A pair plays a board set twice
    #[error("Pair {pair} plays board set {board} twice")]
    BoardReplayed {
        /// The board set
        board: BoardSet,
        /// The pair
        pair: Pair,
    },

    /// The number of distinct board sets differs from the number of rounds
    #[error("{found} board sets are in play instead of {expected}")]
    BoardCount {
        /// Distinct board sets played
        found: usize,
        /// Number of rounds
        expected: usize,
    },

    /// A board set is played at the wrong number of tables
    #[error("Board set {board} is played {found} times instead of {expected}")]
    PlayCount {
        /// The board set
        board: BoardSet,
        /// Cells playing it
        found: usize,
        /// Number of tables
        expected: usize,
    },

    /// A board set is not played by every pair
    #[error("Board set {board} is played by {found} pairs instead of {expected}")]
    BoardPairs {
        /// The board set
        board: BoardSet,
        /// Distinct pairs playing it
        found: usize,
        /// Number of seats
        expected: usize,
    },
}

type Seat = (usize, Side);

fn find_seat(arrangement: &Arrangement, round: usize, pair: Pair) -> Option<Seat> {
    arrangement
        .round(round)
        .iter()
        .enumerate()
        .find_map(|(table, cell)| cell.side_of(pair).map(|side| (table, side)))
}

/// Check that every seat leads to the same seat in every round
///
/// The first transition out of a seat defines the movement.  Every later
/// transition must agree, including the stationary seats.
///
/// # Errors
/// [`ValidationError::InconsistentMovement`] at the first disagreement
pub fn check_movement(arrangement: &Arrangement) -> Result<(), ValidationError> {
    let mut moves: BTreeMap<Seat, Option<Seat>> = BTreeMap::new();

    for round in 0..arrangement.rounds().saturating_sub(1) {
        for (table, &cell) in arrangement.round(round).iter().enumerate() {
            for side in Side::ALL {
                let target = find_seat(arrangement, round + 1, cell.pair(side));

                match moves.entry((table, side)) {
                    Entry::Vacant(entry) => {
                        entry.insert(target);
                    }
                    Entry::Occupied(entry) if *entry.get() != target => {
                        let error = ValidationError::InconsistentMovement { round, table, side };
                        log::debug!("{error}");
                        return Err(error);
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }
    }

    Ok(())
}

/// Check that every pair sits once per round and meets nobody twice
///
/// # Errors
/// - [`ValidationError::DuplicateSeat`] if a pair sits twice in a round
/// - [`ValidationError::MissingPair`] if a pair has no seat in a round
/// - [`ValidationError::RepeatedPairing`] at the first rematch
pub fn check_pairings(arrangement: &Arrangement) -> Result<(), ValidationError> {
    let mut encounters = Encounters::default();
    let expected: BTreeSet<Pair> = arrangement.pair_ids().collect();

    let fail = |error: ValidationError| {
        log::debug!("{error}");
        Err(error)
    };

    for (round, cells) in arrangement.iter_rounds().enumerate() {
        let mut seated = BTreeSet::new();

        for (table, cell) in cells.iter().enumerate() {
            for pair in [cell.ns, cell.ew] {
                if !seated.insert(pair) {
                    return fail(ValidationError::DuplicateSeat { round, pair });
                }
            }

            if !encounters.meet(cell.ns, cell.ew) {
                return fail(ValidationError::RepeatedPairing {
                    round,
                    table,
                    first: cell.ns,
                    second: cell.ew,
                });
            }
        }

        if let Some(&pair) = expected.difference(&seated).next() {
            return fail(ValidationError::MissingPair { round, pair });
        }
    }

    Ok(())
}

/// Check that boards are spread like a Room square
///
/// There must be one board set per round, each played at as many cells as
/// there are tables, by as many distinct pairs as there are seats, the
/// phantom included.
///
/// # Errors
/// The first of [`ValidationError::BoardReplayed`],
/// [`ValidationError::BoardCount`], [`ValidationError::PlayCount`], and
/// [`ValidationError::BoardPairs`] that applies
pub fn check_boards(arrangement: &Arrangement) -> Result<(), ValidationError> {
    let mut players: BTreeMap<BoardSet, (usize, BTreeSet<Pair>)> = BTreeMap::new();

    let fail = |error: ValidationError| {
        log::debug!("{error}");
        Err(error)
    };

    for play in arrangement.plays() {
        let (count, pairs) = players.entry(play.cell.board).or_default();
        *count += 1;

        for pair in [play.cell.ns, play.cell.ew] {
            if !pairs.insert(pair) {
                return fail(ValidationError::BoardReplayed {
                    board: play.cell.board,
                    pair,
                });
            }
        }
    }

    let rounds = arrangement.rounds();
    let tables = arrangement.tables();

    if players.len() != rounds {
        return fail(ValidationError::BoardCount {
            found: players.len(),
            expected: rounds,
        });
    }

    for (&board, (count, pairs)) in &players {
        if *count != tables {
            return fail(ValidationError::PlayCount {
                board,
                found: *count,
                expected: tables,
            });
        }

        if pairs.len() != 2 * tables {
            return fail(ValidationError::BoardPairs {
                board,
                found: pairs.len(),
                expected: 2 * tables,
            });
        }
    }

    Ok(())
}

/// Run all three checks
///
/// # Errors
/// The first [`ValidationError`] found, checking movement, pairings, and
/// boards in this order
pub fn validate(arrangement: &Arrangement) -> Result<(), ValidationError> {
    let result = check_movement(arrangement)
        .and_then(|()| check_pairings(arrangement))
        .and_then(|()| check_boards(arrangement));

    match &result {
        Ok(()) => log::info!(
            "{} pairs, {} rounds, {} tables: valid",
            arrangement.pairs(),
            arrangement.rounds(),
            arrangement.tables()
        ),
        Err(error) => log::error!("{} pairs: {error}", arrangement.pairs()),
    }

    result
}
