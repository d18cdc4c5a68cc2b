use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;

use crate::*;

/// Checks that a grid can hold complete pairs.
pub fn validate_size((rows, columns): Coord2) -> Result<Coord2> {
    if rows == 0 || columns == 0 {
        return Err(GameError::InvalidArgument("grid dimensions must be positive"));
    }
    if mult(rows, columns) % 2 != 0 {
        return Err(GameError::InvalidArgument("grid must have an even number of cells"));
    }
    Ok((rows, columns))
}

/// Grid of cards, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cards: Array2<CardSlot>,
}

impl Board {
    /// Lays `pairing[i]` on the `i`-th cell in row-major order, all face down.
    pub fn build(size: Coord2, pairing: &[CardValue]) -> Result<Self> {
        let (rows, columns) = validate_size(size)?;
        if pairing.len() != usize::from(mult(rows, columns)) {
            return Err(GameError::InvalidArgument(
                "pairing length does not match the grid",
            ));
        }

        let cards = pairing
            .iter()
            .enumerate()
            .map(|(index, &value)| CardSlot::new(value, coords_from_index(index, columns)))
            .collect();
        Self::from_cards(size, cards)
    }

    /// Rebuilds a board from persisted cards, keeping their faces.
    pub fn from_card_states(size: Coord2, cards: &[CardSlot]) -> Result<Self> {
        let (rows, columns) = validate_size(size)?;
        if cards.len() != usize::from(mult(rows, columns)) {
            return Err(GameError::InvalidArgument(
                "card count does not match the grid",
            ));
        }
        for (index, card) in cards.iter().enumerate() {
            if card.coords() != coords_from_index(index, columns) {
                return Err(GameError::InvalidArgument("card stored out of order"));
            }
        }
        Self::from_cards(size, cards.to_vec())
    }

    fn from_cards((rows, columns): Coord2, cards: Vec<CardSlot>) -> Result<Self> {
        let cards = Array2::from_shape_vec((usize::from(rows), usize::from(columns)), cards)
            .map_err(|_| GameError::InvalidArgument("grid shape mismatch"))?;
        Ok(Self { cards })
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cards.dim();
        // dimensions come from Coord values
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, columns) = self.size();
        mult(rows, columns)
    }

    pub fn total_pairs(&self) -> CellCount {
        self.total_cells() / 2
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfRange)
        }
    }

    /// Position of the `index`-th card in row-major order.
    pub fn coords_of(&self, index: usize) -> Result<Coord2> {
        if index >= usize::from(self.total_cells()) {
            return Err(GameError::OutOfRange);
        }
        Ok(coords_from_index(index, self.size().1))
    }

    pub fn slot_at(&self, coords: Coord2) -> Result<CardSlot> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<()> {
        self.transition(coords, CardFace::is_face_down, CardFace::FaceUp)
    }

    pub fn conceal(&mut self, coords: Coord2) -> Result<()> {
        self.transition(coords, CardFace::is_face_up, CardFace::FaceDown)
    }

    pub fn mark_matched(&mut self, coords: Coord2) -> Result<()> {
        self.transition(coords, CardFace::is_face_up, CardFace::Matched)
    }

    /// Shows a card without the usual sequencing, for previews and restores.
    pub fn force_reveal(&mut self, coords: Coord2) -> Result<()> {
        self.transition(coords, |face| !face.is_matched(), CardFace::FaceUp)
    }

    fn transition(
        &mut self,
        coords: Coord2,
        allowed: fn(CardFace) -> bool,
        to: CardFace,
    ) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        let card = &mut self.cards[coords.to_nd_index()];
        if !allowed(card.face) {
            return Err(GameError::InvalidTransition {
                from: card.face.name(),
                to: to.name(),
            });
        }
        log::trace!("Card {:?}: {:?} -> {:?}", coords, card.face, to);
        card.face = to;
        Ok(())
    }

    /// Cards in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &CardSlot> {
        self.cards.iter()
    }

    /// Face-up cards that still need a comparison, row-major.
    pub fn face_up_unmatched(&self) -> impl Iterator<Item = Coord2> {
        self.iter()
            .filter(|card| card.is_pending())
            .map(CardSlot::coords)
    }

    pub fn matched_count(&self) -> CellCount {
        // bounded by total_cells
        self.iter().filter(|card| card.face.is_matched()).count() as CellCount
    }

    pub fn is_cleared(&self) -> bool {
        self.iter().all(|card| card.face.is_matched())
    }

    /// Cards in row-major order, as stored in snapshots.
    pub fn card_states(&self) -> Vec<CardSlot> {
        self.iter().copied().collect()
    }
}

impl Index<Coord2> for Board {
    type Output = CardSlot;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cards[coords.to_nd_index()]
    }
}
