#[cfg(test)]
mod test;

use crate::arrangement::Pair;
use itertools::Itertools as _;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use unordered_pair::UnorderedPair;

/// Round-1 seatings found by [`search_seatings`], by number of tables
///
/// Each seating lists pair numbers for the seats from table 2 onward,
/// alternating NS and EW.  Table 1 always seats the top pair (or the
/// phantom) NS and pair 1 EW.  The lists are the search output for 3 to 7
/// tables.
static KNOWN_SEATINGS: [&[&[u8]]; 5] = [
    &[&[2, 5, 3, 4], &[4, 3, 2, 5]],
    &[&[2, 4, 3, 7, 5, 6], &[4, 2, 3, 7, 5, 6], &[6, 2, 3, 4, 5, 7]],
    &[
        &[2, 3, 4, 7, 5, 9, 6, 8],
        &[4, 2, 3, 6, 5, 9, 7, 8],
        &[6, 2, 3, 4, 5, 8, 7, 9],
        &[8, 2, 3, 5, 4, 9, 6, 7],
    ],
    &[
        &[2, 3, 4, 7, 5, 9, 6, 11, 8, 10],
        &[4, 2, 3, 6, 5, 10, 7, 11, 8, 9],
        &[6, 2, 3, 4, 5, 10, 7, 9, 8, 11],
        &[8, 2, 3, 6, 4, 11, 5, 7, 9, 10],
        &[10, 2, 3, 7, 4, 6, 5, 11, 8, 9],
    ],
    &[
        &[2, 3, 4, 7, 5, 10, 6, 13, 8, 12, 9, 11],
        &[4, 2, 3, 6, 5, 12, 7, 11, 8, 13, 9, 10],
        &[6, 2, 3, 4, 5, 12, 7, 10, 8, 13, 9, 11],
        &[8, 2, 3, 4, 5, 13, 6, 9, 7, 11, 10, 12],
        &[10, 2, 3, 4, 5, 7, 6, 12, 8, 11, 9, 13],
        &[12, 2, 3, 4, 5, 9, 6, 11, 7, 13, 8, 10],
    ],
];

/// Error raised when no round-1 seating yields a Howell movement
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("No Howell seating exists for {tables} tables")]
pub struct SearchExhausted {
    /// Number of tables searched for
    pub tables: usize,
}

/// Pairs already drawn against each other
///
/// The key is the unordered pair, so meeting `(a, b)` and then `(b, a)` is a
/// rematch.
#[derive(Debug, Clone, Default)]
pub struct Encounters(HashSet<UnorderedPair<Pair>>);

impl Encounters {
    /// Record a meeting
    ///
    /// Returns `false` if the two pairs have met before.
    pub fn meet(&mut self, a: Pair, b: Pair) -> bool {
        self.0.insert(UnorderedPair(a, b))
    }

    /// Whether the two pairs have met
    #[must_use]
    pub fn have_met(&self, a: Pair, b: Pair) -> bool {
        self.0.contains(&UnorderedPair(a, b))
    }

    /// Number of distinct meetings recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no meeting is recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rounds of a Howell movement unrolled from a round-1 seating
///
/// The top pair, or the phantom when the number of pairs is odd, stays NS at
/// table 1.  Every other pair moves to where the next lower pair sat in the
/// previous round, and pair 1 takes the seat of the highest moving pair.
/// Each item lists the NS and EW pair of every table.
#[derive(Debug, Clone)]
pub struct Rounds {
    seats: Vec<u8>,
    remaining: usize,
}

impl Rounds {
    /// Unroll a seating for a number of pairs
    ///
    /// # Panics
    /// Panics if the seating does not fill `2 * ceil(pairs / 2) - 2` seats.
    #[must_use]
    pub fn new(pairs: u8, seating: &[u8]) -> Self {
        let seat_count = usize::from(pairs).div_ceil(2) * 2;
        assert_eq!(
            seating.len() + 2,
            seat_count,
            "A seating for {pairs} pairs fills {} seats",
            seat_count - 2
        );

        let stationary = if pairs % 2 == 1 { 0 } else { pairs };
        let mut seats = Vec::with_capacity(seat_count);
        seats.extend([stationary, 1]);
        seats.extend_from_slice(seating);

        Self {
            seats,
            remaining: seat_count - 1,
        }
    }

    fn advance(&mut self) {
        #[allow(clippy::cast_possible_truncation)]
        let wrap = self.seats.len() as u8;

        for seat in &mut self.seats[1..] {
            *seat += 1;
            if *seat >= wrap {
                *seat = 1;
            }
        }
    }
}

impl Iterator for Rounds {
    type Item = Vec<[Pair; 2]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let round = self
            .seats
            .chunks_exact(2)
            .map(|table| [Pair(table[0]), Pair(table[1])])
            .collect();

        self.remaining -= 1;
        self.advance();
        Some(round)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Rounds {}

/// Whether no two pairs meet twice in these rounds
pub fn is_rematch_free(rounds: impl IntoIterator<Item = Vec<[Pair; 2]>>) -> bool {
    let mut encounters = Encounters::default();

    rounds
        .into_iter()
        .flatten()
        .all(|[ns, ew]| encounters.meet(ns, ew))
}

/// Cached seatings for a number of tables, if any
#[must_use]
pub fn known_seatings(tables: usize) -> Option<&'static [&'static [u8]]> {
    KNOWN_SEATINGS.get(tables.checked_sub(3)?).copied()
}

/// Round-1 seatings for a number of tables, from the cache or the search
///
/// # Errors
/// [`SearchExhausted`] if the search finds nothing
pub fn seatings(tables: usize) -> Result<Vec<Vec<u8>>, SearchExhausted> {
    match known_seatings(tables) {
        Some(known) => Ok(known.iter().map(|seating| seating.to_vec()).collect()),
        None => search_seatings(tables),
    }
}

/// Search round-1 seatings that unroll into Howell movements
///
/// Candidates are permutations of pairs `2..2 * tables` in lexicographic
/// order.  The first valid candidate for each distinct even first seat is
/// kept, and the search stops after `tables - 1` of them.
///
/// # Errors
/// [`SearchExhausted`] if no permutation is free of rematches
pub fn search_seatings(tables: usize) -> Result<Vec<Vec<u8>>, SearchExhausted> {
    let exhausted = SearchExhausted { tables };
    let top = u8::try_from(2 * tables).map_err(|_| exhausted)?;

    if tables < 2 {
        return Err(exhausted);
    }

    let wanted = tables - 1;
    let mut first_seats = BTreeSet::new();
    let mut found = Vec::with_capacity(wanted);

    log::info!("Searching Howell seatings for {tables} tables");

    for candidate in (2..top).permutations(usize::from(top) - 2) {
        let first = candidate[0];

        if first % 2 == 1 || first_seats.contains(&first) {
            continue;
        }

        if is_rematch_free(Rounds::new(top, &candidate)) {
            log::debug!("Seating {candidate:?} is a Howell movement");
            first_seats.insert(first);
            found.push(candidate);

            if found.len() >= wanted {
                break;
            }
        }
    }

    if found.is_empty() {
        log::error!("{exhausted}");
        Err(exhausted)
    } else {
        Ok(found)
    }
}
