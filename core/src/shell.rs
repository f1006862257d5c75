use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::*;

/// Identifies one scheduled mismatch-hide. Only the most recent ticket is honored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HideTicket(u64);

impl HideTicket {
    pub(crate) const fn first() -> Self {
        Self(0)
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for HideTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Deferred-callback capability supplied by the shell.
///
/// After `delay` the shell must call [`GameSession::on_hide_elapsed`] with the same ticket, unless
/// the ticket was cancelled in the meantime. Delivering a cancelled ticket anyway is harmless.
pub trait Scheduler {
    fn schedule_hide(&mut self, delay: Duration, ticket: HideTicket);

    fn cancel_hide(&mut self, _ticket: HideTicket) {}
}

/// Signals the session emits for the shell to render and play cues.
pub trait GameListener {
    /// A new deal is in play, every card face-down.
    fn deal_built(&mut self, _deal: &Deal) {}

    fn card_revealed(&mut self, _pos: Position, _face: &CardFace) {}

    /// The card at `pos` did not match the open card. After the delay the whole board is hidden,
    /// pairs already settled included.
    fn mismatch(&mut self, _pos: Position) {}

    /// The card at `pos` completed a pair.
    fn match_kept(&mut self, _pos: Position) {}

    fn won(&mut self) {}

    /// The delayed hide ran, every card is face-down again.
    fn cards_hidden(&mut self) {}
}

/// Everything a session needs from its presentation layer.
pub trait Shell: Scheduler + GameListener {}

impl<T: Scheduler + GameListener> Shell for T {}
