use alloc::vec::Vec;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::*;
pub use random::*;

mod random;

pub trait DealBuilder {
    fn build(self, faces: &[CardFace]) -> Deal;
}

/// Pairs up `faces` and lays them out at random.
///
/// Faces beyond `config.max_cards` are dropped, keeping the supplied order. Duplicate faces are not
/// merged; each entry in `faces` becomes its own pair. No faces gives an empty deal.
pub fn build_deal<R: Rng + ?Sized>(faces: &[CardFace], config: &DealConfig, rng: &mut R) -> Deal {
    let config = config.sanitized();
    if faces.is_empty() {
        log::debug!("No faces supplied, dealing an empty board");
        return Deal::empty();
    }

    let max_cards = usize::from(config.max_cards);
    let kept = if faces.len() > max_cards {
        log::warn!(
            "Too many images, requested {} but only {} are dealt",
            faces.len(),
            max_cards
        );
        &faces[..max_cards]
    } else {
        faces
    };

    let mut cards: Vec<CardFace> = kept.iter().chain(kept).cloned().collect();
    cards.shuffle(rng);

    let card_count: CellCount = cards
        .len()
        .try_into()
        .expect("card count is bounded by DealConfig::MAX_CARDS_LIMIT");
    let size = GridSize::for_cards(card_count, config.max_rows);
    log::debug!(
        "Dealing {} cards on a {}x{} grid",
        card_count,
        size.rows,
        size.cols
    );
    Deal::from_row_major(size, cards)
}
