use super::*;

fn flatten(round: &[[Pair; 2]]) -> Vec<u8> {
    round.iter().flatten().map(|pair| pair.0).collect()
}

#[test]
fn test_known_seatings_are_rematch_free() {
    for tables in 3..=7 {
        let seatings = known_seatings(tables).expect("Missing cached seatings");
        #[allow(clippy::cast_possible_truncation)]
        let top = (2 * tables) as u8;

        assert_eq!(seatings.len(), tables - 1);

        for seating in seatings {
            assert!(is_rematch_free(Rounds::new(top, seating)), "{seating:?}");
            assert!(is_rematch_free(Rounds::new(top - 1, seating)), "{seating:?}");
        }
    }
}

#[test]
fn test_search_reproduces_known_seatings() {
    for tables in 3..=5 {
        let found = search_seatings(tables).expect("The search should succeed");
        let known = known_seatings(tables).expect("Missing cached seatings");
        assert_eq!(found, known, "{tables} tables");
    }
}

#[test]
fn test_two_tables_have_a_single_seating() {
    assert_eq!(search_seatings(2), Ok(vec![vec![2, 3]]));
    assert_eq!(known_seatings(2), None);
    assert_eq!(seatings(2), Ok(vec![vec![2, 3]]));
}

#[test]
fn test_search_needs_two_tables() {
    assert_eq!(search_seatings(0), Err(SearchExhausted { tables: 0 }));
    assert_eq!(search_seatings(1), Err(SearchExhausted { tables: 1 }));
}

#[test]
fn test_rounds_move_to_the_lower_pair() {
    let mut rounds = Rounds::new(8, &[2, 4, 3, 7, 5, 6]);
    assert_eq!(rounds.len(), 7);

    let first = rounds.next().expect("Missing round 1");
    let second = rounds.next().expect("Missing round 2");

    assert_eq!(flatten(&first), [8, 1, 2, 4, 3, 7, 5, 6]);
    assert_eq!(flatten(&second), [8, 2, 3, 5, 4, 1, 6, 7]);
    assert_eq!(rounds.len(), 5);
    assert_eq!(rounds.count(), 5);
}

#[test]
fn test_phantom_stays_at_table_1() {
    let rounds: Vec<_> = Rounds::new(7, &[2, 4, 3, 7, 5, 6]).collect();
    assert_eq!(rounds.len(), 7);

    for round in &rounds {
        assert_eq!(round.len(), 4);
        assert_eq!(round[0][0], Pair::PHANTOM);
    }

    // Every real pair sits out exactly once
    let mut idle: Vec<_> = rounds.iter().map(|round| round[0][1].0).collect();
    idle.sort_unstable();
    assert_eq!(idle, [1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_identity_seating_rematches() {
    assert!(!is_rematch_free(Rounds::new(6, &[2, 3, 4, 5])));
}

#[test]
fn test_encounters_ignore_orientation() {
    let mut encounters = Encounters::default();
    assert!(encounters.is_empty());

    assert!(encounters.meet(Pair(3), Pair(5)));
    assert!(encounters.have_met(Pair(5), Pair(3)));
    assert!(!encounters.meet(Pair(5), Pair(3)));
    assert!(!encounters.have_met(Pair(3), Pair(4)));
    assert_eq!(encounters.len(), 1);
}

#[test]
#[should_panic = "fills 4 seats"]
fn test_rounds_reject_short_seatings() {
    let _ = Rounds::new(6, &[2, 3]);
}
