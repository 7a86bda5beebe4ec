use crate::engine::{Direction, Grid};

use super::Policy;

/// Stateful fallback probe: plays Down until the grid stops changing, then tries
/// Left, Right, Up (and back to Down) while it stays stuck.
///
/// ```
/// use slide_2048::engine::{Direction, Grid};
/// use slide_2048::policy::{FixedCycle, Policy};
/// let mut p = FixedCycle::new();
/// let g = Grid::new([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
/// assert_eq!(p.decide(g), Some(Direction::Down));
/// assert_eq!(p.decide(g), Some(Direction::Left));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedCycle {
    last_grid: Option<Grid>,
    last_decision: Option<Direction>,
}

impl FixedCycle {
    pub fn new() -> Self { Self::default() }

    fn next_decision(&self) -> Direction {
        match self.last_decision {
            None | Some(Direction::Up) => Direction::Down,
            Some(Direction::Down) => Direction::Left,
            Some(Direction::Left) => Direction::Right,
            Some(Direction::Right) => Direction::Up,
        }
    }
}

impl Policy for FixedCycle {
    fn decide(&mut self, grid: Grid) -> Option<Direction> {
        let decision = if self.last_grid == Some(grid) { self.next_decision() } else { Direction::Down };
        self.last_grid = Some(grid);
        self.last_decision = Some(decision);
        Some(decision)
    }

    fn name(&self) -> &'static str { "cycle" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_while_stuck_and_wraps() {
        let mut p = FixedCycle::new();
        let g = Grid::new([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let seq: Vec<_> = (0..6).filter_map(|_| p.decide(g)).collect();
        assert_eq!(
            seq,
            vec![Direction::Down, Direction::Left, Direction::Right, Direction::Up, Direction::Down, Direction::Left]
        );
    }

    #[test]
    fn resets_to_down_when_grid_changes() {
        let mut p = FixedCycle::new();
        let a = Grid::new([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let b = Grid::new([[0; 4], [0; 4], [0; 4], [2, 2, 0, 0]]);
        assert_eq!(p.decide(a), Some(Direction::Down));
        assert_eq!(p.decide(a), Some(Direction::Left));
        assert_eq!(p.decide(a), Some(Direction::Right));
        assert_eq!(p.decide(b), Some(Direction::Down));
        assert_eq!(p.decide(b), Some(Direction::Left));
    }
}
