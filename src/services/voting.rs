use rand::Rng;

use crate::models::{RoundStatus, Vote};

/// Round number from which a round without consensus is settled at random
pub const COIN_TOSS_FROM_ROUND: i64 = 5;

/// How a round ends, decided from its votes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundDecision {
    pub status: RoundStatus,
    pub winner: Option<String>,
}

/// Decides the result of closing round `number`
///
/// Candidate places are the distinct places voted on, in order of first vote.
/// The winner is the first place every member voted yes on; a group with no
/// members agrees on anything. Without a unanimous place the round is
/// `Closed`, except from round [`COIN_TOSS_FROM_ROUND`] on, where a place is
/// drawn with `rng` and the status is `CoinToss` (winner `None` if nobody voted).
pub fn decide_round<R: Rng>(
    number: i64,
    votes: &[Vote],
    member_ids: &[String],
    rng: &mut R,
) -> RoundDecision {
    let mut places: Vec<&str> = Vec::new();
    for vote in votes {
        if !places.contains(&vote.place.as_str()) {
            places.push(&vote.place);
        }
    }

    let unanimous = places.iter().find(|place| {
        member_ids.iter().all(|member_id| {
            votes
                .iter()
                .any(|v| v.place == **place && v.member_id == *member_id && v.value)
        })
    });

    if let Some(place) = unanimous {
        return RoundDecision {
            status: RoundStatus::Closed,
            winner: Some(place.to_string()),
        };
    }

    if number >= COIN_TOSS_FROM_ROUND {
        let winner = (!places.is_empty())
            .then(|| places[rng.random_range(0..places.len())].to_string());
        return RoundDecision {
            status: RoundStatus::CoinToss,
            winner,
        };
    }

    RoundDecision {
        status: RoundStatus::Closed,
        winner: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::{rngs::StdRng, SeedableRng};

    fn vote(member_id: &str, place: &str, value: bool) -> Vote {
        Vote {
            id: format!("{member_id}-{place}"),
            member_id: member_id.to_string(),
            group_id: "g1".to_string(),
            round_id: "r1".to_string(),
            place: place.to_string(),
            value,
            created_at: Utc::now(),
        }
    }

    fn members(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_unanimous_yes_wins() {
        let votes = vec![
            vote("ana", "Lisbon", true),
            vote("ana", "Tokyo", true),
            vote("ben", "Lisbon", false),
            vote("ben", "Tokyo", true),
        ];

        let decision = decide_round(1, &votes, &members(&["ana", "ben"]), &mut rng());

        assert_eq!(decision.status, RoundStatus::Closed);
        assert_eq!(decision.winner.as_deref(), Some("Tokyo"));
    }

    #[test]
    fn test_first_unanimous_place_in_vote_order_wins() {
        let votes = vec![
            vote("ana", "Bali", true),
            vote("ana", "Oslo", true),
            vote("ben", "Oslo", true),
            vote("ben", "Bali", true),
        ];

        let decision = decide_round(2, &votes, &members(&["ana", "ben"]), &mut rng());

        assert_eq!(decision.winner.as_deref(), Some("Bali"));
    }

    #[test]
    fn test_missing_vote_blocks_unanimity() {
        let votes = vec![vote("ana", "Bali", true), vote("ben", "Bali", true)];

        let decision = decide_round(1, &votes, &members(&["ana", "ben", "cara"]), &mut rng());

        assert_eq!(decision, RoundDecision { status: RoundStatus::Closed, winner: None });
    }

    #[test]
    fn test_unanimity_wins_even_in_coin_toss_rounds() {
        let votes = vec![vote("ana", "Rome", true), vote("ben", "Rome", true)];

        let decision = decide_round(7, &votes, &members(&["ana", "ben"]), &mut rng());

        assert_eq!(decision.status, RoundStatus::Closed);
        assert_eq!(decision.winner.as_deref(), Some("Rome"));
    }

    #[test]
    fn test_no_consensus_before_coin_toss_round() {
        let votes = vec![vote("ana", "Rome", true), vote("ben", "Rome", false)];

        let decision =
            decide_round(COIN_TOSS_FROM_ROUND - 1, &votes, &members(&["ana", "ben"]), &mut rng());

        assert_eq!(decision, RoundDecision { status: RoundStatus::Closed, winner: None });
    }

    #[test]
    fn test_coin_toss_picks_a_voted_place() {
        let votes = vec![
            vote("ana", "Rome", true),
            vote("ben", "Rome", false),
            vote("ben", "Cairo", true),
        ];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let decision =
                decide_round(COIN_TOSS_FROM_ROUND, &votes, &members(&["ana", "ben"]), &mut rng);

            assert_eq!(decision.status, RoundStatus::CoinToss);
            let winner = decision.winner.unwrap();
            assert!(winner == "Rome" || winner == "Cairo");
        }
    }

    #[test]
    fn test_coin_toss_without_votes_has_no_winner() {
        let decision = decide_round(6, &[], &members(&["ana"]), &mut rng());

        assert_eq!(decision, RoundDecision { status: RoundStatus::CoinToss, winner: None });
    }

    #[test]
    fn test_memberless_group_takes_first_place() {
        let votes = vec![vote("ghost", "Quito", false), vote("ghost", "Lima", true)];

        let decision = decide_round(1, &votes, &[], &mut rng());

        assert_eq!(decision.winner.as_deref(), Some("Quito"));
    }

    #[test]
    fn test_no_votes_early_round_closes_empty() {
        let decision = decide_round(1, &[], &members(&["ana"]), &mut rng());

        assert_eq!(decision, RoundDecision { status: RoundStatus::Closed, winner: None });
    }
}
