use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::time::Duration;
use tracing::{debug, info};

use super::{
    config::GameConfig,
    direction::Direction,
    scoring,
    state::{Cell, CollisionKind, Phase, Snake},
};
use crate::error::{Error, Result};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing moved: the round is not running or no direction was given yet
    Idle,
    /// Snake advanced one cell without eating
    Moved,
    /// Snake ate and grew by one
    Ate { score: u32, level: u32 },
    /// Snake ate the last free cell; the round is over
    Won { score: u32, level: u32 },
    /// Head hit a wall or the body; the round is over and the snake is unchanged
    Collided(CollisionKind),
}

impl Outcome {
    pub fn ends_round(&self) -> bool {
        matches!(self, Outcome::Won { .. } | Outcome::Collided(_))
    }
}

/// Grid motion state machine.
///
/// Owns the snake, its heading, the food and the score, and advances them one
/// discrete step per [`tick`](Self::tick). It has no notion of time; the
/// caller decides the cadence, usually from [`tick_interval`](Self::tick_interval).
pub struct GridMotionEngine {
    config: GameConfig,
    rng: StdRng,
    snake: Snake,
    direction: Option<Direction>,
    pending_direction: Option<Direction>,
    food: Option<Cell>,
    score: u32,
    level: u32,
    phase: Phase,
}

impl GridMotionEngine {
    /// Create an engine in its initial configuration.
    ///
    /// `config` is expected to have passed [`GameConfig::validate`]; the
    /// level rules divide by `points_per_level`.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut engine = Self {
            snake: Snake::new(config.origin),
            config,
            rng,
            direction: None,
            pending_direction: None,
            food: None,
            score: 0,
            level: 1,
            phase: Phase::NotStarted,
        };
        engine.reset();
        engine
    }

    /// Create a running engine from an explicit layout.
    ///
    /// Useful for replaying a known position. The config must validate, the
    /// snake must fit on the grid and the food must sit on a free cell.
    pub fn with_layout(
        config: GameConfig,
        snake: Snake,
        direction: Option<Direction>,
        food: Cell,
    ) -> Result<Self> {
        config.validate()?;
        if let Some(cell) = snake.cells().find(|cell| !config.contains(*cell)) {
            return Err(Error::InvalidLayout(format!(
                "snake cell ({}, {}) lies outside the grid",
                cell.x, cell.y
            )));
        }
        if !config.contains(food) || snake.contains(food) {
            return Err(Error::InvalidLayout(format!(
                "food ({}, {}) must be a free cell on the grid",
                food.x, food.y
            )));
        }

        let mut engine = Self::new(config);
        engine.snake = snake;
        engine.direction = direction;
        engine.food = Some(food);
        engine.phase = Phase::Running;
        Ok(engine)
    }

    /// Reinitialize everything to the starting configuration
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.config.origin);
        self.direction = None;
        self.pending_direction = None;
        self.score = 0;
        self.level = 1;
        self.phase = Phase::NotStarted;
        self.food = self.spawn_food();
        debug!(food = ?self.food, "engine reset");
    }

    /// Leave `NotStarted`. Returns false in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Running;
        info!("round started");
        true
    }

    /// Flip between `Running` and `Paused`. Returns false in any other phase.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            _ => return false,
        };
        debug!(phase = ?self.phase, "pause toggled");
        true
    }

    /// Queue a heading for the next tick.
    ///
    /// The exact reverse of the current heading is ignored, as is any request
    /// once the round is over. Later requests before a tick replace earlier ones.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.phase.is_over() {
            return false;
        }
        if self
            .direction
            .is_some_and(|current| current.is_opposite(direction))
        {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> Outcome {
        if self.phase != Phase::Running {
            return Outcome::Idle;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = Some(direction);
        }
        let Some(direction) = self.direction else {
            return Outcome::Idle;
        };

        let new_head = self.snake.head().step(direction);

        if !self.config.contains(new_head) {
            return self.collide(CollisionKind::Wall);
        }
        if self.snake.contains(new_head) {
            return self.collide(CollisionKind::SelfHit);
        }

        let ate_food = self.food == Some(new_head);
        self.snake.advance(new_head, ate_food);

        if !ate_food {
            return Outcome::Moved;
        }

        self.score = self.score.saturating_add(self.config.points_per_food);
        let previous_level = self.level;
        self.level = scoring::level_for_score(&self.config, self.score);
        if self.level > previous_level {
            info!(level = self.level, score = self.score, "level up");
        }

        self.food = self.spawn_food();
        if self.food.is_none() {
            self.phase = Phase::Won;
            info!(score = self.score, "grid filled");
            return Outcome::Won {
                score: self.score,
                level: self.level,
            };
        }

        Outcome::Ate {
            score: self.score,
            level: self.level,
        }
    }

    fn collide(&mut self, kind: CollisionKind) -> Outcome {
        self.phase = Phase::Collided(kind);
        info!(?kind, score = self.score, level = self.level, "collision");
        Outcome::Collided(kind)
    }

    /// Pick a free cell uniformly at random, or `None` when the snake fills the grid.
    ///
    /// Rejection sampling with a bounded number of draws, then a scan of the
    /// remaining free cells.
    fn spawn_food(&mut self) -> Option<Cell> {
        let cell_count = self.config.cell_count();
        if self.snake.len() >= cell_count {
            return None;
        }

        for _ in 0..cell_count * 4 {
            let cell = self.random_cell();
            if !self.snake.contains(cell) {
                return Some(cell);
            }
        }

        let free: Vec<Cell> = (0..self.config.grid_height as i32)
            .flat_map(|y| (0..self.config.grid_width as i32).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.snake.contains(*cell))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    fn random_cell(&mut self) -> Cell {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Cell::new(x, y)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Cell {
        self.snake.head()
    }

    /// Current food cell; `None` only after the grid has been filled
    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Delay the driver should wait between ticks at the current level
    pub fn tick_interval(&self) -> Duration {
        scoring::tick_interval(&self.config, self.level)
    }

    pub fn speed_percent(&self) -> u16 {
        scoring::speed_percent(&self.config, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: GameConfig) -> GridMotionEngine {
        GridMotionEngine::new(config.with_seed(42))
    }

    fn layout(cells: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> GridMotionEngine {
        let snake = Snake::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y))).unwrap();
        GridMotionEngine::with_layout(
            GameConfig::default().with_seed(7),
            snake,
            Some(direction),
            Cell::new(food.0, food.1),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let engine = seeded(GameConfig::default());

        assert_eq!(engine.phase(), Phase::NotStarted);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.head(), Cell::new(10, 10));
        assert_eq!(engine.direction(), None);
        assert_eq!(engine.tick_interval(), Duration::from_millis(150));

        let food = engine.food().unwrap();
        assert!(engine.config().contains(food));
        assert_ne!(food, engine.head());
    }

    #[test]
    fn test_tick_idle_before_start_and_before_direction() {
        let mut engine = seeded(GameConfig::default());
        engine.set_direction(Direction::Right);
        assert_eq!(engine.tick(), Outcome::Idle);
        assert_eq!(engine.head(), Cell::new(10, 10));
        // Pending input survives until the round actually runs
        assert_eq!(engine.pending_direction(), Some(Direction::Right));

        let mut engine = seeded(GameConfig::default());
        assert!(engine.start());
        assert_eq!(engine.tick(), Outcome::Idle);
        assert_eq!(engine.head(), Cell::new(10, 10));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = layout(&[(10, 10)], Direction::Right, (0, 0));

        assert_eq!(engine.tick(), Outcome::Moved);
        assert_eq!(engine.head(), Cell::new(11, 10));
        assert_eq!(engine.snake().len(), 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = layout(&[(10, 10)], Direction::Right, (11, 10));

        let outcome = engine.tick();

        assert_eq!(outcome, Outcome::Ate { score: 10, level: 1 });
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.head(), Cell::new(11, 10));
        let food = engine.food().unwrap();
        assert!(!engine.snake().contains(food));
        assert!(engine.config().contains(food));
    }

    #[test]
    fn test_wall_collision_leaves_snake_untouched() {
        let mut engine = layout(&[(0, 5), (1, 5), (2, 5)], Direction::Left, (9, 9));
        let before = engine.snake().clone();

        assert_eq!(engine.tick(), Outcome::Collided(CollisionKind::Wall));
        assert_eq!(engine.snake(), &before);
        assert_eq!(engine.phase(), Phase::Collided(CollisionKind::Wall));
        assert!(engine.is_over());

        // Terminal: further ticks and inputs do nothing
        assert_eq!(engine.tick(), Outcome::Idle);
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.snake(), &before);
    }

    #[test]
    fn test_wall_collision_on_every_edge() {
        let edges = [
            ((0, 4), Direction::Left),
            ((19, 4), Direction::Right),
            ((4, 0), Direction::Up),
            ((4, 19), Direction::Down),
        ];
        for ((x, y), direction) in edges {
            let mut engine = layout(&[(x, y)], direction, (10, 10));
            assert_eq!(engine.tick(), Outcome::Collided(CollisionKind::Wall));
            assert_eq!(engine.head(), Cell::new(x, y));
        }
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,5) heading up into a body cell at (5,4)
        let mut engine = layout(
            &[(5, 5), (6, 5), (6, 4), (5, 4), (4, 4)],
            Direction::Up,
            (12, 12),
        );
        let before = engine.snake().clone();

        assert_eq!(engine.tick(), Outcome::Collided(CollisionKind::SelfHit));
        assert_eq!(engine.snake(), &before);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = layout(&[(10, 10), (9, 10)], Direction::Right, (0, 0));

        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.pending_direction(), None);
        assert_eq!(engine.tick(), Outcome::Moved);
        assert_eq!(engine.direction(), Some(Direction::Right));
        assert_eq!(engine.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_set_direction_every_pair() {
        for current in Direction::ALL {
            for requested in Direction::ALL {
                let mut engine = layout(&[(10, 10)], current, (0, 0));
                let accepted = engine.set_direction(requested);

                if requested == current.opposite() {
                    assert!(!accepted, "{current:?} -> {requested:?}");
                    assert_eq!(engine.pending_direction(), None);
                    assert_eq!(engine.direction(), Some(current));
                } else {
                    assert!(accepted, "{current:?} -> {requested:?}");
                    assert_eq!(engine.pending_direction(), Some(requested));

                    engine.tick();
                    assert_eq!(engine.direction(), Some(requested));
                    assert_eq!(engine.head(), Cell::new(10, 10).step(requested));
                }
            }
        }
    }

    #[test]
    fn test_latest_pending_direction_wins() {
        let mut engine = layout(&[(10, 10), (9, 10)], Direction::Right, (0, 0));

        assert!(engine.set_direction(Direction::Up));
        assert!(engine.set_direction(Direction::Down));
        // Reverse of the applied heading, not of the pending one
        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.pending_direction(), Some(Direction::Down));

        engine.tick();
        assert_eq!(engine.head(), Cell::new(10, 11));
        assert_eq!(engine.pending_direction(), None);
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut engine = layout(&[(10, 10)], Direction::Right, (0, 0));

        assert!(engine.toggle_pause());
        assert_eq!(engine.phase(), Phase::Paused);
        assert_eq!(engine.tick(), Outcome::Idle);
        assert_eq!(engine.head(), Cell::new(10, 10));

        assert!(engine.toggle_pause());
        assert_eq!(engine.tick(), Outcome::Moved);
        assert_eq!(engine.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_start_and_pause_only_from_valid_phases() {
        let mut engine = seeded(GameConfig::default());
        assert!(!engine.toggle_pause());
        assert!(engine.start());
        assert!(!engine.start());
    }

    #[test]
    fn test_level_up_speeds_ticks() {
        let mut engine = layout(&[(10, 10)], Direction::Right, (11, 10));
        engine.score = 40;

        assert_eq!(engine.tick(), Outcome::Ate { score: 50, level: 2 });
        assert_eq!(engine.tick_interval(), Duration::from_millis(140));
        assert_eq!(engine.speed_percent(), 10);
    }

    #[test]
    fn test_reset_restores_initial_configuration() {
        let mut engine = layout(&[(10, 10), (9, 10)], Direction::Right, (11, 10));
        engine.tick();
        engine.set_direction(Direction::Up);
        engine.reset();

        assert_eq!(engine.phase(), Phase::NotStarted);
        assert_eq!(engine.snake(), &Snake::new(Cell::new(10, 10)));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.direction(), None);
        assert_eq!(engine.pending_direction(), None);
        assert!(!engine.snake().contains(engine.food().unwrap()));
    }

    #[test]
    fn test_filling_the_grid_wins() {
        // 2x2 grid: snake covers three cells, food on the last
        let config = GameConfig::new(2, 2).with_seed(1);
        let snake = Snake::from_cells([Cell::new(0, 1), Cell::new(0, 0), Cell::new(1, 0)]).unwrap();
        let mut engine =
            GridMotionEngine::with_layout(config, snake, Some(Direction::Right), Cell::new(1, 1))
                .unwrap();

        assert_eq!(engine.tick(), Outcome::Won { score: 10, level: 1 });
        assert_eq!(engine.phase(), Phase::Won);
        assert_eq!(engine.food(), None);
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.tick(), Outcome::Idle);
    }

    #[test]
    fn test_food_spawn_finds_last_free_cell() {
        // Only (2,2) is free after the snake eats at (1,2); sampling must still find it
        let config = GameConfig::new(3, 3).with_seed(3);
        let snake = Snake::from_cells(
            [(0, 2), (0, 1), (0, 0), (1, 0), (2, 0), (2, 1), (1, 1)]
                .into_iter()
                .map(|(x, y)| Cell::new(x, y)),
        )
        .unwrap();
        let mut engine =
            GridMotionEngine::with_layout(config, snake, Some(Direction::Right), Cell::new(1, 2))
                .unwrap();

        assert_eq!(engine.tick(), Outcome::Ate { score: 10, level: 1 });
        assert_eq!(engine.food(), Some(Cell::new(2, 2)));
    }

    #[test]
    fn test_with_layout_rejects_invalid_positions() {
        let config = GameConfig::default();
        let snake = Snake::new(Cell::new(10, 10));
        assert!(
            GridMotionEngine::with_layout(config.clone(), snake.clone(), None, Cell::new(10, 10))
                .is_err()
        );
        assert!(
            GridMotionEngine::with_layout(config.clone(), snake, None, Cell::new(20, 0)).is_err()
        );
        assert!(
            GridMotionEngine::with_layout(
                config,
                Snake::new(Cell::new(-1, 0)),
                None,
                Cell::new(3, 3)
            )
            .is_err()
        );
    }

    #[test]
    fn test_with_layout_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.points_per_level = 0;

        let result = GridMotionEngine::with_layout(
            config,
            Snake::new(Cell::new(10, 10)),
            Some(Direction::Right),
            Cell::new(11, 10),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_seeded_engines_place_food_identically() {
        let a = seeded(GameConfig::default());
        let b = seeded(GameConfig::default());
        assert_eq!(a.food(), b.food());
    }
}
