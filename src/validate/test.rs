use super::*;
use crate::arrangement::Cell;
use crate::movement;

fn arrangement(pairs: u8, rounds: &[&[(u8, u8, u8)]]) -> Arrangement {
    let rounds = rounds
        .iter()
        .map(|round| {
            round
                .iter()
                .map(|&(ns, ew, board)| Cell::new(ns, ew, board))
                .collect()
        })
        .collect();

    Arrangement::new(pairs, rounds).expect("Malformed test arrangement")
}

#[test]
fn test_generated_movements_are_valid() {
    for arrangement in [
        movement::howell(6),
        movement::howell(7),
        movement::mitchell(9),
    ] {
        let arrangement = arrangement.expect("Failed to generate a movement");
        assert_eq!(check_movement(&arrangement), Ok(()));
        assert_eq!(check_pairings(&arrangement), Ok(()));
        assert_eq!(check_boards(&arrangement), Ok(()));
        assert_eq!(validate(&arrangement), Ok(()));
    }
}

#[test]
fn test_four_pair_howell() {
    let howell = arrangement(
        4,
        &[
            &[(4, 1, 0), (2, 3, 1)],
            &[(4, 2, 1), (3, 1, 2)],
            &[(4, 3, 2), (1, 2, 0)],
        ],
    );

    assert_eq!(check_movement(&howell), Ok(()));
    assert_eq!(check_pairings(&howell), Ok(()));
    assert_eq!(
        check_boards(&howell),
        Err(ValidationError::BoardReplayed {
            board: BoardSet(1),
            pair: Pair(2),
        })
    );
}

#[test]
fn test_inconsistent_movement() {
    let broken = arrangement(
        4,
        &[
            &[(4, 1, 0), (2, 3, 1)],
            &[(4, 2, 1), (3, 1, 2)],
            &[(4, 3, 2), (2, 1, 0)],
        ],
    );

    let error = ValidationError::InconsistentMovement {
        round: 1,
        table: 0,
        side: Side::EW,
    };

    assert_eq!(check_movement(&broken), Err(error.clone()));
    assert_eq!(
        error.to_string(),
        "Round 2: the EW pair of table 1 moves differently than before"
    );
}

#[test]
fn test_rematch() {
    let rematch = arrangement(
        4,
        &[
            &[(4, 1, 0), (2, 3, 1)],
            &[(4, 1, 1), (2, 3, 0)],
            &[(4, 2, 2), (3, 1, 2)],
        ],
    );

    assert_eq!(
        check_pairings(&rematch),
        Err(ValidationError::RepeatedPairing {
            round: 1,
            table: 0,
            first: Pair(4),
            second: Pair(1),
        })
    );
}

#[test]
fn test_pair_sitting_twice() {
    let twice = arrangement(4, &[&[(4, 1, 0), (4, 3, 0)]]);

    assert_eq!(
        check_pairings(&twice),
        Err(ValidationError::DuplicateSeat {
            round: 0,
            pair: Pair(4),
        })
    );
}

#[test]
fn test_validation_is_deterministic() {
    let broken = arrangement(
        4,
        &[
            &[(4, 1, 0), (2, 3, 1)],
            &[(4, 1, 1), (2, 3, 0)],
            &[(4, 3, 2), (2, 1, 2)],
        ],
    );

    let first = validate(&broken);
    assert!(first.is_err());

    for _ in 0..10 {
        assert_eq!(validate(&broken), first);
    }
}

#[test]
fn test_single_round_covers_its_board() {
    let single = arrangement(4, &[&[(4, 1, 0), (2, 3, 0)]]);
    assert_eq!(validate(&single), Ok(()));
}
