//! Pure scoring functions: played piles in, point breakdowns out.
//!
//! Everything here is deterministic over the players slice (seating order)
//! and mutates nothing; applying results to player totals is the lifecycle
//! step's job.

use serde::{Deserialize, Serialize};

use crate::domain::cards::CardType;
use crate::domain::player::{Player, PlayerId};
use crate::domain::rules::{MIN_PLAYERS, ROUNDS};

/// Per-player score breakdown for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBreakdown {
    pub maki: i32,
    pub tempura: i32,
    pub sashimi: i32,
    pub dumpling: i32,
    pub sushi: i32,
    pub total: i32,
}

/// End-of-game pudding bonus for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuddingBonus {
    pub player_id: PlayerId,
    pub bonus: i32,
}

/// Final standing for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub score: i32,
    pub pudding_count: u32,
    pub round_scores: [i32; ROUNDS as usize],
}

/// End-of-game scores: pudding bonuses plus the final ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEndScores {
    pub bonuses: Vec<PuddingBonus>,
    pub ranking: Vec<RankedPlayer>,
}

/// Score one round's played piles. Results are in seating order.
pub fn score_round(players: &[Player]) -> Vec<RoundBreakdown> {
    let maki = score_maki(players);
    players
        .iter()
        .zip(maki)
        .map(|(player, maki)| {
            let tempura = (player.count_type(CardType::Tempura) / 2) as i32 * 5;
            let sashimi = (player.count_type(CardType::Sashimi) / 3) as i32 * 10;
            let dumpling = score_dumpling(player.count_type(CardType::Dumpling));
            let sushi = score_sushi(player);
            RoundBreakdown {
                maki,
                tempura,
                sashimi,
                dumpling,
                sushi,
                total: maki + tempura + sashimi + dumpling + sushi,
            }
        })
        .collect()
}

/// Maki placement: 6 points for the most symbols, 3 for the runner-up.
///
/// A tie for first splits 6 (floored) and absorbs the second-place award; a
/// tie for second splits 3. Players with zero symbols never place.
fn score_maki(players: &[Player]) -> Vec<i32> {
    let counts: Vec<u32> = players.iter().map(|p| p.maki_symbols()).collect();
    let mut scores = vec![0i32; players.len()];

    let Some(&first) = counts.iter().max() else {
        return scores;
    };
    if first == 0 {
        return scores;
    }

    let first_place: Vec<usize> = (0..counts.len()).filter(|&i| counts[i] == first).collect();
    if first_place.len() > 1 {
        let each = 6 / first_place.len() as i32;
        for i in first_place {
            scores[i] = each;
        }
        return scores;
    }
    scores[first_place[0]] = 6;

    let second = counts.iter().copied().filter(|&c| c < first && c > 0).max();
    if let Some(second) = second {
        let second_place: Vec<usize> =
            (0..counts.len()).filter(|&i| counts[i] == second).collect();
        let each = 3 / second_place.len() as i32;
        for i in second_place {
            scores[i] = each;
        }
    }
    scores
}

/// Dumplings score progressively: 1, 3, 6, 10, then 15 for five or more.
fn score_dumpling(count: usize) -> i32 {
    match count {
        0 => 0,
        1 => 1,
        2 => 3,
        3 => 6,
        4 => 10,
        _ => 15,
    }
}

/// Sushi cards score their base value, tripled when they landed on wasabi.
fn score_sushi(player: &Player) -> i32 {
    player
        .played_cards
        .iter()
        .filter(|p| p.card.is_sushi())
        .map(|p| p.card.base_value() * if p.tripled { 3 } else { 1 })
        .sum()
}

/// End-of-game pudding bonuses, in seating order.
///
/// Most puddings: +6, split (floored) on a tie. Fewest: -6, split the same
/// way, except in a 2-player game where no penalty ever applies. A player
/// cannot be in both groups, and a full tie awards nothing.
pub fn pudding_bonus(players: &[Player]) -> Vec<i32> {
    let counts: Vec<u32> = players.iter().map(|p| p.pudding_count).collect();
    let mut bonuses = vec![0i32; players.len()];

    let (Some(&max), Some(&min)) = (counts.iter().max(), counts.iter().min()) else {
        return bonuses;
    };
    if max == min {
        return bonuses;
    }

    let most: Vec<usize> = (0..counts.len()).filter(|&i| counts[i] == max).collect();
    let each = 6 / most.len() as i32;
    for &i in &most {
        bonuses[i] = each;
    }

    if players.len() > MIN_PLAYERS {
        let least: Vec<usize> = (0..counts.len())
            .filter(|&i| counts[i] == min && !most.contains(&i))
            .collect();
        if !least.is_empty() {
            let each = 6 / least.len() as i32;
            for i in least {
                bonuses[i] = -each;
            }
        }
    }
    bonuses
}

/// Compute end-of-game scores. Pure: the bonuses are *not* folded into the
/// players here, but the ranking already reflects them.
///
/// Ranking order: final score descending, then pudding count descending,
/// then stable seating order.
pub fn score_game_end(players: &[Player]) -> GameEndScores {
    let bonuses = pudding_bonus(players);

    let mut order: Vec<usize> = (0..players.len()).collect();
    let final_score = |i: usize| players[i].score + bonuses[i];
    order.sort_by(|&a, &b| {
        final_score(b)
            .cmp(&final_score(a))
            .then(players[b].pudding_count.cmp(&players[a].pudding_count))
    });

    let ranking = order
        .iter()
        .enumerate()
        .map(|(pos, &i)| RankedPlayer {
            rank: pos + 1,
            player_id: players[i].id,
            name: players[i].name.clone(),
            score: final_score(i),
            pudding_count: players[i].pudding_count,
            round_scores: players[i].round_scores,
        })
        .collect();

    let bonuses = players
        .iter()
        .zip(bonuses)
        .map(|(p, bonus)| PuddingBonus {
            player_id: p.id,
            bonus,
        })
        .collect();

    GameEndScores { bonuses, ranking }
}
