use alloc::collections::BTreeSet;
use core::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// What to do with a click that arrives while a mismatched pair is still waiting to be hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingHidePolicy {
    /// Drop the click.
    Ignore,
    /// Hide right away, then handle the click on the cleared board.
    #[default]
    Supersede,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(rename = "mismatch_delay_ms", with = "millis")]
    pub mismatch_delay: Duration,
    pub pending_hide: PendingHidePolicy,
}

impl SessionConfig {
    pub const DEFAULT_MISMATCH_DELAY: Duration = Duration::from_secs(1);
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mismatch_delay: Self::DEFAULT_MISMATCH_DELAY,
            pending_hide: PendingHidePolicy::default(),
        }
    }
}

mod millis {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// One playthrough of a deal: which cards are face-up, which pairs are settled, and whether the
/// board has been cleared.
///
/// Cards are turned two at a time. A matching pair stays face-up and locked. A mismatch leaves both
/// cards up until the scheduled hide runs, which turns the whole board face-down again, settled
/// pairs included.
#[derive(Debug)]
pub struct GameSession<S> {
    deal: Deal,
    revealed: RevealState,
    matched: BTreeSet<Position>,
    open_card: Option<Position>,
    pending_hide: Option<HideTicket>,
    last_ticket: HideTicket,
    attempts: u32,
    outcome: GameOutcome,
    config: SessionConfig,
    shell: S,
}

impl<S: Shell> GameSession<S> {
    /// A session with an empty deal. Nothing can be clicked until a deal is started.
    pub fn new(shell: S, config: SessionConfig) -> Self {
        Self {
            deal: Deal::empty(),
            revealed: RevealState::new(),
            matched: BTreeSet::new(),
            open_card: None,
            pending_hide: None,
            last_ticket: HideTicket::first(),
            attempts: 0,
            outcome: GameOutcome::InProgress,
            config,
            shell,
        }
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn revealed(&self) -> &RevealState {
        &self.revealed
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_won(&self) -> bool {
        self.outcome.is_won()
    }

    pub fn is_hide_pending(&self) -> bool {
        self.pending_hide.is_some()
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    /// Pairs settled since the board was last cleared.
    pub fn matched_pairs(&self) -> usize {
        self.matched.len() / 2
    }

    /// Second cards turned since the deal started, matched or not.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn card_state(&self, pos: Position) -> CardState {
        if self.matched.contains(&pos) {
            CardState::Matched
        } else if self.revealed.contains_key(&pos) {
            CardState::Open
        } else {
            CardState::Hidden
        }
    }

    /// Replaces the deal and turns every card face-down.
    pub fn start_new_deal(&mut self, deal: Deal) {
        self.cancel_pending_hide();
        self.deal = deal;
        self.clear_board();
        self.attempts = 0;
        self.outcome = GameOutcome::InProgress;
        log::debug!(
            "New deal: {} pairs on a {:?} grid",
            self.deal.pair_count(),
            self.deal.size()
        );
        self.shell.deal_built(&self.deal);
    }

    /// Builds a deal from `faces` and starts it. An empty image set leaves the current game alone.
    pub fn deal_faces<B: DealBuilder>(&mut self, builder: B, faces: &[CardFace]) -> Result<()> {
        if faces.is_empty() {
            return Err(GameError::EmptyImageSet);
        }
        let deal = builder.build(faces);
        self.start_new_deal(deal);
        Ok(())
    }

    /// Plays the same layout again from the start.
    pub fn restart(&mut self) {
        let deal = core::mem::take(&mut self.deal);
        self.start_new_deal(deal);
    }

    /// Plays the same faces again with their positions shuffled.
    pub fn restart_reshuffled<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let deal = self.deal.reshuffled(rng);
        self.start_new_deal(deal);
    }

    pub fn on_card_clicked(&mut self, pos: Position) -> Result<ClickOutcome> {
        let pos = self.deal.validate_position(pos).inspect_err(|_| {
            log::warn!("Click on {pos:?} which holds no card");
        })?;

        if self.outcome.is_won() {
            return Ok(ClickOutcome::Ignored);
        }

        if let Some(ticket) = self.pending_hide {
            match self.config.pending_hide {
                PendingHidePolicy::Ignore => {
                    log::trace!("{pos:?} ignored, hide {ticket} pending");
                    return Ok(ClickOutcome::Ignored);
                }
                PendingHidePolicy::Supersede => {
                    log::trace!("{pos:?} supersedes hide {ticket}");
                    self.cancel_pending_hide();
                    self.hide_all();
                }
            }
        }

        if self.matched.contains(&pos) {
            return Ok(ClickOutcome::Ignored);
        }

        let outcome = match self.open_card {
            None => {
                self.reveal(pos);
                self.open_card = Some(pos);
                ClickOutcome::Revealed
            }
            Some(open) if open == pos => ClickOutcome::Ignored,
            Some(open) => {
                self.open_card = None;
                self.attempts += 1;
                if self.deal[open] == self.deal[pos] {
                    self.reveal(pos);
                    self.matched.insert(open);
                    self.matched.insert(pos);
                    if self.deal == self.revealed {
                        self.outcome = GameOutcome::Won;
                        self.shell.won();
                        ClickOutcome::Won
                    } else {
                        self.shell.match_kept(pos);
                        ClickOutcome::Matched
                    }
                } else {
                    self.reveal(pos);
                    self.shell.mismatch(pos);
                    self.schedule_hide();
                    ClickOutcome::Mismatched
                }
            }
        };

        log::trace!("{pos:?} -> {outcome:?}");
        Ok(outcome)
    }

    /// Runs the hide scheduled by a mismatch. Returns `false` for a ticket that is no longer
    /// pending, which leaves the board untouched.
    pub fn on_hide_elapsed(&mut self, ticket: HideTicket) -> bool {
        if self.pending_hide != Some(ticket) {
            log::trace!("Stale hide {ticket} ignored");
            return false;
        }
        self.pending_hide = None;
        self.hide_all();
        true
    }

    fn reveal(&mut self, pos: Position) {
        if let Some(face) = self.deal[pos].clone() {
            self.shell.card_revealed(pos, &face);
            self.revealed.insert(pos, face);
        }
    }

    fn schedule_hide(&mut self) {
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.pending_hide = Some(ticket);
        self.shell.schedule_hide(self.config.mismatch_delay, ticket);
    }

    fn cancel_pending_hide(&mut self) {
        if let Some(ticket) = self.pending_hide.take() {
            self.shell.cancel_hide(ticket);
        }
    }

    fn hide_all(&mut self) {
        self.clear_board();
        self.shell.cards_hidden();
    }

    fn clear_board(&mut self) {
        self.revealed.clear();
        self.matched.clear();
        self.open_card = None;
    }
}
