use super::*;
use crate::types::{flat_index, from_flat_index};

/// Purely random placement that only keeps the starting cell free of mines.
///
/// Mines are a uniform sample of the other `rows * cols - 1` cells, drawn from a `SmallRng` seeded with `seed`, so
/// the same seed and start always give the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;
        use rand::seq::index;

        let total_cells = config.total_cells() as usize;
        let free_cells = total_cells.saturating_sub(1);
        let mut mines = config.mines as usize;

        if mines > free_cells {
            log::warn!(
                "Cannot keep start cell safe, requested {} mines but only {} fit",
                mines,
                free_cells
            );
            mines = free_cells;
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        let skipped = flat_index(self.start, config.cols);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        for place in index::sample(&mut rng, free_cells, mines) {
            // shift past the start cell so it can never be picked
            let place = if place >= skipped { place + 1 } else { place };
            mine_mask[from_flat_index(place, config.cols).to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        log::debug!(
            "Placed {} mines on {}x{} with seed {:#018x}, start {:?}",
            layout.mine_count(),
            config.rows,
            config.cols,
            self.seed,
            self.start
        );
        layout
    }
}
