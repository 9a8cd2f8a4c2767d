use alloc::vec::Vec;

use crate::*;

pub use random::*;

mod random;

/// Pixel margin between the surface edge and the outermost cards.
pub const BOARD_MARGIN: f32 = 16.0;
/// Uniform pixel gap between adjacent cards.
pub const CARD_GUTTER: f32 = 8.0;

/// Produces a full board for one play-through: every symbol exactly twice,
/// positioned into row-major grid cells sized from the target surface.
pub trait BoardGenerator {
    fn generate(
        &mut self,
        profile: &DifficultyProfile,
        symbol_pool: &[Symbol],
        metrics: BoardMetrics,
    ) -> Result<Vec<Card>>;
}
