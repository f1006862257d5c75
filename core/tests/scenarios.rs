use std::collections::BTreeMap;
use std::time::Duration;

use pairflip_core::*;

/// Shell that keeps the last scheduled hide so tests can fire it by hand.
#[derive(Debug, Default)]
struct ManualShell {
    pending: Option<HideTicket>,
    cues: Vec<&'static str>,
}

impl ManualShell {
    fn fire<S: Shell>(session: &mut GameSession<S>, ticket: Option<HideTicket>) -> bool {
        ticket.is_some_and(|ticket| session.on_hide_elapsed(ticket))
    }
}

impl Scheduler for ManualShell {
    fn schedule_hide(&mut self, _delay: Duration, ticket: HideTicket) {
        self.pending = Some(ticket);
    }

    fn cancel_hide(&mut self, ticket: HideTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }
}

impl GameListener for ManualShell {
    fn mismatch(&mut self, _pos: Position) {
        self.cues.push("fail");
    }

    fn match_kept(&mut self, _pos: Position) {
        self.cues.push("success");
    }

    fn won(&mut self) {
        self.cues.push("end");
    }
}

fn pets() -> Deal {
    Deal::from_cells(
        GridSize::new(2, 2),
        [
            ((0, 0), CardFace::from("cat")),
            ((0, 1), CardFace::from("dog")),
            ((1, 0), CardFace::from("dog")),
            ((1, 1), CardFace::from("cat")),
        ],
    )
    .unwrap()
}

fn new_session(deal: Deal) -> GameSession<ManualShell> {
    let mut session = GameSession::new(ManualShell::default(), SessionConfig::default());
    session.start_new_deal(deal);
    session
}

fn images(count: usize) -> Vec<CardFace> {
    (0..count)
        .map(|i| CardFace::new(format!("/pics/{i:02}.jpg")))
        .collect()
}

/// Clicks every pair in order, which wins any deal without a mismatch.
fn winning_clicks(deal: &Deal) -> Vec<Position> {
    let mut by_face: BTreeMap<&CardFace, Vec<Position>> = BTreeMap::new();
    for (pos, face) in deal.iter() {
        by_face.entry(face).or_default().push(pos);
    }
    by_face.into_values().flatten().collect()
}

#[test_log::test]
fn scenario_a_mismatch_hides_after_delay() {
    let mut session = new_session(pets());

    assert_eq!(session.on_card_clicked((0, 0)), Ok(ClickOutcome::Revealed));
    assert_eq!(
        session.revealed(),
        &RevealState::from([((0, 0), CardFace::from("cat"))])
    );

    assert_eq!(session.on_card_clicked((0, 1)), Ok(ClickOutcome::Mismatched));
    assert_eq!(session.shell().cues, ["fail"]);

    let ticket = session.shell().pending;
    assert!(ManualShell::fire(&mut session, ticket));
    assert!(session.revealed().is_empty());
    assert_eq!(session.outcome(), GameOutcome::InProgress);
}

#[test_log::test]
fn scenario_b_pairs_complete_the_board() {
    let mut session = new_session(pets());

    assert_eq!(session.on_card_clicked((0, 0)), Ok(ClickOutcome::Revealed));
    assert_eq!(session.on_card_clicked((1, 1)), Ok(ClickOutcome::Matched));
    assert_eq!(session.on_card_clicked((0, 1)), Ok(ClickOutcome::Revealed));
    assert_eq!(session.on_card_clicked((1, 0)), Ok(ClickOutcome::Won));

    assert!(session.is_won());
    assert!(session.deal() == session.revealed());
    assert_eq!(session.shell().cues, ["success", "end"]);
}

#[test_log::test]
fn scenario_b_single_pair_deal() {
    let deal = Deal::from_cells(
        GridSize::new(1, 2),
        [((0, 0), CardFace::from("cat")), ((0, 1), CardFace::from("cat"))],
    )
    .unwrap();
    let mut session = new_session(deal);

    session.on_card_clicked((0, 0)).unwrap();
    assert_eq!(session.on_card_clicked((0, 1)), Ok(ClickOutcome::Won));
}

#[test_log::test]
fn scenario_c_no_images() {
    let deal = RandomDealBuilder::new(3, DealConfig::default()).build(&[]);
    assert!(deal.is_empty());

    let mut session = new_session(deal);
    for pos in [(0, 0), (1, 1), (3, 7)] {
        assert_eq!(session.on_card_clicked(pos), Err(GameError::InvalidPosition));
    }
    assert_eq!(
        session.deal_faces(RandomDealBuilder::new(3, DealConfig::default()), &[]),
        Err(GameError::EmptyImageSet)
    );
}

#[test_log::test]
fn scenario_d_seventeen_images() {
    let input = images(17);
    let deal = RandomDealBuilder::new(17, DealConfig::default()).build(&input);

    assert_eq!(deal.card_count(), 32);
    let mut faces = deal.faces();
    faces.sort();
    assert_eq!(faces, input[..16]);
    for face in &faces {
        assert_eq!(deal.positions_of(face).count(), 2);
    }
}

#[test_log::test]
fn built_deals_hold_pairs_on_bounded_grids() {
    for seed in 0..8 {
        for count in 0..=20 {
            let deal = RandomDealBuilder::new(seed, DealConfig::default()).build(&images(count));
            let size = deal.size();

            assert!(deal.faces().len() <= usize::from(DealConfig::DEFAULT_MAX_CARDS));
            assert!(deal.card_count() <= 32);
            assert!(size.rows <= DealConfig::DEFAULT_MAX_ROWS);
            assert!(size.total_cells() >= deal.card_count());
            for face in deal.faces() {
                assert_eq!(deal.positions_of(&face).count(), 2);
            }
        }
    }
}

#[test_log::test]
fn restart_replays_to_the_same_win() {
    let mut session = GameSession::new(ManualShell::default(), SessionConfig::default());
    session
        .deal_faces(RandomDealBuilder::new(11, DealConfig::default()), &images(6))
        .unwrap();
    let clicks = winning_clicks(session.deal());
    let layout = session.deal().clone();

    let first: Vec<_> = clicks
        .iter()
        .map(|&pos| session.on_card_clicked(pos).unwrap())
        .collect();
    assert_eq!(first.last(), Some(&ClickOutcome::Won));

    session.restart();
    assert_eq!(session.deal(), &layout);
    assert_eq!(session.outcome(), GameOutcome::InProgress);

    let second: Vec<_> = clicks
        .iter()
        .map(|&pos| session.on_card_clicked(pos).unwrap())
        .collect();
    assert_eq!(first, second);
    assert!(session.is_won());
}

#[test_log::test]
fn reshuffled_restart_is_still_winnable() {
    let mut session = GameSession::new(ManualShell::default(), SessionConfig::default());
    session
        .deal_faces(RandomDealBuilder::new(4, DealConfig::default()), &images(8))
        .unwrap();

    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(99);
    session.restart_reshuffled(&mut rng);
    assert_eq!(session.deal().card_count(), 16);

    let mut last = ClickOutcome::Ignored;
    for pos in winning_clicks(&session.deal().clone()) {
        last = session.on_card_clicked(pos).unwrap();
    }
    assert_eq!(last, ClickOutcome::Won);
}

#[test_log::test]
fn new_images_replace_the_deal() {
    let mut session = new_session(pets());
    session.on_card_clicked((0, 0)).unwrap();
    session.on_card_clicked((0, 1)).unwrap();
    assert!(session.is_hide_pending());

    session
        .deal_faces(RandomDealBuilder::new(1, DealConfig::default()), &images(3))
        .unwrap();

    assert_eq!(session.deal().card_count(), 6);
    assert!(session.revealed().is_empty());
    assert!(!session.is_hide_pending());
    assert_eq!(session.shell().pending, None);
}
