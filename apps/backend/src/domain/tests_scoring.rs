use crate::domain::cards::CardType;
use crate::domain::player::{PlayedCard, Player};
use crate::domain::scoring::{pudding_bonus, score_game_end, score_round};
use crate::domain::test_helpers::{card, player_with_maki, player_with_played};
use uuid::Uuid;

fn totals(players: &[Player]) -> Vec<i32> {
    score_round(players).iter().map(|b| b.total).collect()
}

#[test]
fn maki_unique_first_with_tied_second() {
    // Symbols [5, 3, 3]: first takes 6, the tied pair split 3 into 1 each.
    let players = vec![
        player_with_maki("a", 0, 5),
        player_with_maki("b", 100, 3),
        player_with_maki("c", 200, 3),
    ];
    let maki: Vec<i32> = score_round(&players).iter().map(|b| b.maki).collect();
    assert_eq!(maki, vec![6, 1, 1]);
}

#[test]
fn maki_tied_first_absorbs_second_place() {
    // Symbols [5, 5, 2]: the tie splits 6 into 3 each; no second award.
    let players = vec![
        player_with_maki("a", 0, 5),
        player_with_maki("b", 100, 5),
        player_with_maki("c", 200, 2),
    ];
    let maki: Vec<i32> = score_round(&players).iter().map(|b| b.maki).collect();
    assert_eq!(maki, vec![3, 3, 0]);
}

#[test]
fn maki_zero_symbol_players_never_place() {
    let players = vec![
        player_with_maki("a", 0, 4),
        player_with_maki("b", 100, 0),
        player_with_maki("c", 200, 0),
    ];
    let maki: Vec<i32> = score_round(&players).iter().map(|b| b.maki).collect();
    assert_eq!(maki, vec![6, 0, 0]);
}

#[test]
fn maki_nobody_played_any() {
    let players = vec![player_with_maki("a", 0, 0), player_with_maki("b", 100, 0)];
    let maki: Vec<i32> = score_round(&players).iter().map(|b| b.maki).collect();
    assert_eq!(maki, vec![0, 0]);
}

#[test]
fn tempura_scores_per_pair() {
    let players: Vec<Player> = [1usize, 2, 3, 4]
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            player_with_played(
                &format!("p{i}"),
                (i * 100) as u32,
                &vec![CardType::Tempura; n],
            )
        })
        .collect();
    let tempura: Vec<i32> = score_round(&players).iter().map(|b| b.tempura).collect();
    assert_eq!(tempura, vec![0, 5, 5, 10]);
}

#[test]
fn sashimi_scores_per_triple() {
    let players: Vec<Player> = [1usize, 2, 3, 6]
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            player_with_played(
                &format!("p{i}"),
                (i * 100) as u32,
                &vec![CardType::Sashimi; n],
            )
        })
        .collect();
    let sashimi: Vec<i32> = score_round(&players).iter().map(|b| b.sashimi).collect();
    assert_eq!(sashimi, vec![0, 0, 10, 20]);
}

#[test]
fn dumpling_progression_caps_at_fifteen() {
    let expected = [1, 3, 6, 10, 15, 15];
    for (n, want) in (1usize..=6).zip(expected) {
        let players = vec![
            player_with_played("a", 0, &vec![CardType::Dumpling; n]),
            player_with_played("b", 100, &[]),
        ];
        assert_eq!(totals(&players)[0], want, "dumpling count {n}");
    }
}

#[test]
fn wasabi_triples_squid_but_not_later_salmon() {
    // Play order wasabi, squid, salmon: the squid consumed the wasabi.
    let mut p = Player::new(Uuid::new_v4(), "a");
    p.played_cards.push(PlayedCard::plain(card(1, CardType::Wasabi)));
    p.played_cards.push(PlayedCard {
        card: card(2, CardType::Squid),
        tripled: true,
    });
    p.played_cards.push(PlayedCard::plain(card(3, CardType::Salmon)));
    let other = player_with_played("b", 100, &[]);

    let breakdown = score_round(&[p, other]);
    assert_eq!(breakdown[0].sushi, 9 + 2);
}

#[test]
fn sushi_base_values_sum_without_wasabi() {
    let p = player_with_played(
        "a",
        0,
        &[CardType::Egg, CardType::Salmon, CardType::Squid],
    );
    let other = player_with_played("b", 100, &[]);
    let breakdown = score_round(&[p, other]);
    assert_eq!(breakdown[0].sushi, 1 + 2 + 3);
}

#[test]
fn round_total_sums_all_categories() {
    let mut p = player_with_played(
        "a",
        0,
        &[
            CardType::Tempura,
            CardType::Tempura,
            CardType::Dumpling,
            CardType::Squid,
        ],
    );
    p.played_cards.push(PlayedCard::plain(crate::domain::test_helpers::maki_card(50, 3)));
    let other = player_with_played("b", 100, &[]);

    let breakdown = score_round(&[p, other]);
    assert_eq!(breakdown[0].maki, 6);
    assert_eq!(breakdown[0].tempura, 5);
    assert_eq!(breakdown[0].dumpling, 1);
    assert_eq!(breakdown[0].sushi, 3);
    assert_eq!(breakdown[0].total, 6 + 5 + 1 + 3);
}

fn players_with_puddings(counts: &[u32]) -> Vec<Player> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let mut p = Player::new(Uuid::new_v4(), format!("p{i}"));
            p.pudding_count = n;
            p
        })
        .collect()
}

#[test]
fn pudding_two_player_tie_awards_nothing() {
    let players = players_with_puddings(&[5, 5]);
    assert_eq!(pudding_bonus(&players), vec![0, 0]);
}

#[test]
fn pudding_two_player_no_penalty() {
    let players = players_with_puddings(&[7, 3]);
    assert_eq!(pudding_bonus(&players), vec![6, 0]);
}

#[test]
fn pudding_penalty_splits_floored() {
    assert_eq!(pudding_bonus(&players_with_puddings(&[3, 1, 1])), vec![6, -3, -3]);
    assert_eq!(
        pudding_bonus(&players_with_puddings(&[2, 2, 1, 1])),
        vec![3, 3, -3, -3]
    );
    assert_eq!(
        pudding_bonus(&players_with_puddings(&[5, 1, 1, 1, 1])),
        vec![6, -1, -1, -1, -1]
    );
}

#[test]
fn pudding_full_tie_awards_nothing() {
    let players = players_with_puddings(&[2, 2, 2, 2]);
    assert_eq!(pudding_bonus(&players), vec![0, 0, 0, 0]);
}

#[test]
fn ranking_sorts_by_final_score_then_puddings() {
    // Two players so no pudding penalty muddies the arithmetic.
    let mut players = players_with_puddings(&[0, 2]);
    players[0].score = 30;
    players[1].score = 24; // +6 pudding bonus ties it at 30

    let end = score_game_end(&players);
    assert_eq!(
        end.bonuses.iter().map(|b| b.bonus).collect::<Vec<_>>(),
        vec![0, 6]
    );
    // 30 vs 30: player 1 wins the tie on pudding count.
    assert_eq!(end.ranking[0].player_id, players[1].id);
    assert_eq!(end.ranking[0].score, 30);
    assert_eq!(end.ranking[1].player_id, players[0].id);
    assert_eq!(
        end.ranking.iter().map(|r| r.rank).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn ranking_keeps_seating_order_on_full_tie() {
    let mut players = players_with_puddings(&[1, 1, 1]);
    for p in &mut players {
        p.score = 12;
    }
    let end = score_game_end(&players);
    let ids: Vec<_> = end.ranking.iter().map(|r| r.player_id).collect();
    assert_eq!(ids, players.iter().map(|p| p.id).collect::<Vec<_>>());
}
