use super::Penalty::*;
use super::Strain::*;
use super::{score, Contract, Outcome, ParseOutcomeError};

macro_rules! static_assert {
    ($cond:expr) => {
        const _: () = [()][!$cond as usize];
    };
}

static_assert!(Contract::new(1, Clubs, None).score(7, false) == 70);
static_assert!(Contract::new(1, Clubs, None).score(9, false) == 110);
static_assert!(Contract::new(1, Hearts, None).score(9, false) == 140);
static_assert!(Contract::new(1, Notrump, None).score(7, false) == 90);

static_assert!(Contract::new(3, Notrump, None).score(9, false) == 400);
static_assert!(Contract::new(3, Notrump, None).score(9, true) == 600);
static_assert!(Contract::new(4, Hearts, None).score(10, false) == 420);
static_assert!(Contract::new(4, Spades, None).score(10, true) == 620);
static_assert!(Contract::new(5, Clubs, None).score(11, false) == 400);
static_assert!(Contract::new(5, Diamonds, None).score(11, true) == 600);

static_assert!(Contract::new(6, Spades, None).score(12, true) == 1430);
static_assert!(Contract::new(6, Notrump, None).score(12, false) == 990);
static_assert!(Contract::new(7, Notrump, None).score(13, true) == 2220);

static_assert!(Contract::new(2, Clubs, Doubled).score(8, false) == 180);
static_assert!(Contract::new(2, Clubs, Doubled).score(9, false) == 280);
static_assert!(Contract::new(2, Clubs, Doubled).score(9, true) == 380);

static_assert!(Contract::new(1, Notrump, Redoubled).score(8, true) == 1160);
static_assert!(Contract::new(7, Spades, Redoubled).score(13, false) == 2240);

// The score sheet lookup by over/under tricks
static_assert!(score(4, Hearts, 0, false, None) == 420);
static_assert!(score(4, Spades, 0, false, None) == 420);
static_assert!(score(3, Notrump, 1, true, None) == 630);
static_assert!(score(1, Diamonds, 0, false, None) == 70);
static_assert!(score(1, Clubs, 0, false, None) == 70);
static_assert!(score(3, Notrump, -1, false, None) == -50);
static_assert!(score(4, Spades, -3, true, Doubled) == -800);
static_assert!(score(4, Spades, -3, true, Redoubled) == -1600);

const _: () = {
    const fn test_set_contract(bid: super::Bid) {
        let undoubled = Contract::new(bid.level, bid.strain, None);
        let mut tricks = 0;

        while tricks < bid.level + 6 {
            let undertricks = (bid.level + 6 - tricks) as i32;
            assert!(undoubled.score(tricks, false) == -50 * undertricks);
            assert!(undoubled.score(tricks, true) == -100 * undertricks);
            tricks += 1;
        }

        let doubled = Contract::new(bid.level, bid.strain, Doubled);

        assert!(doubled.score(bid.level + 5, false) == -100);
        assert!(doubled.score(bid.level + 4, false) == -300);
        assert!(doubled.score(bid.level + 3, false) == -500);
        assert!(doubled.score(bid.level + 2, false) == -800);

        assert!(doubled.score(bid.level + 5, true) == -200);
        assert!(doubled.score(bid.level + 4, true) == -500);
        assert!(doubled.score(bid.level + 3, true) == -800);
        assert!(doubled.score(bid.level + 2, true) == -1100);

        let redoubled = Contract::new(bid.level, bid.strain, Redoubled);
        let mut tricks = 0;

        while tricks < bid.level + 6 {
            assert!(redoubled.score(tricks, false) == 2 * doubled.score(tricks, false));
            assert!(redoubled.score(tricks, true) == 2 * doubled.score(tricks, true));
            tricks += 1;
        }
    }

    let mut level = 1;

    while level <= 7 {
        test_set_contract(super::Bid::new(level, Clubs));
        test_set_contract(super::Bid::new(level, Diamonds));
        test_set_contract(super::Bid::new(level, Hearts));
        test_set_contract(super::Bid::new(level, Spades));
        test_set_contract(super::Bid::new(level, Notrump));
        level += 1;
    }
};

// Doubled and redoubled overtricks are priced per doubling step
const _: () = {
    let mut level = 1;

    while level < 7 {
        let doubled = Contract::new(level, Clubs, Doubled);
        let redoubled = Contract::new(level, Clubs, Redoubled);
        let made = level + 6;

        assert!(doubled.score(made + 1, false) - doubled.score(made, false) == 100);
        assert!(doubled.score(made + 1, true) - doubled.score(made, true) == 200);
        assert!(redoubled.score(made + 1, false) - redoubled.score(made, false) == 200);
        assert!(redoubled.score(made + 1, true) - redoubled.score(made, true) == 400);
        level += 1;
    }
};

#[test]
fn test_parse_outcomes() {
    let cases = [
        ("4S=", Contract::new(4, Spades, None), 0),
        ("3NTX-2", Contract::new(3, Notrump, Doubled), -2),
        ("6hxx+1", Contract::new(6, Hearts, Redoubled), 1),
        ("2 D +1", Contract::new(2, Diamonds, None), 1),
        ("1N=", Contract::new(1, Notrump, None), 0),
        ("7C-13", Contract::new(7, Clubs, None), -13),
    ];

    for (text, contract, over_under) in cases {
        let outcome: Outcome = text.parse().expect("Failed to parse an outcome");
        assert_eq!(outcome.contract, contract, "{text}");
        assert_eq!(outcome.over_under, over_under, "{text}");
    }
}

#[test]
fn test_parse_rejects_nonsense() {
    assert!(matches!(
        "8S=".parse::<Outcome>(),
        Err(ParseOutcomeError::Syntax(_))
    ));
    assert!(matches!(
        "4Z+1".parse::<Outcome>(),
        Err(ParseOutcomeError::Syntax(_))
    ));
    assert!(matches!(
        "4S".parse::<Outcome>(),
        Err(ParseOutcomeError::Syntax(_))
    ));
    assert_eq!(
        "4S+4".parse::<Outcome>(),
        Err(ParseOutcomeError::Tricks(4))
    );
    assert_eq!(
        "1C-8".parse::<Outcome>(),
        Err(ParseOutcomeError::Tricks(-8))
    );
}

#[test]
fn test_display_round_trips() {
    for text in ["4S=", "3NTX-2", "6HXX+1", "1D+2"] {
        let outcome: Outcome = text.parse().expect("Failed to parse an outcome");
        assert_eq!(outcome.to_string(), text);
    }
}

#[test]
fn test_outcome_scores_match_contract_scores() {
    let outcome: Outcome = "3NT+1".parse().expect("Failed to parse an outcome");
    assert_eq!(outcome.tricks(), 10);
    assert_eq!(outcome.score(true), outcome.contract.score(10, true));
    assert_eq!(outcome.score(false), 430);
}
