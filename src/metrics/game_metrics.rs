use std::time::{Duration, Instant};

/// Per-session stats shown in the HUD
pub struct GameMetrics {
    pub round_started: Option<Instant>,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub rounds_played: u32,
    pub foods_eaten: u32,
    /// Set when the last finished round beat the previous best
    pub new_best: bool,
}

impl GameMetrics {
    /// Start a session that already knows the persisted best score
    pub fn new(best_score: u32) -> Self {
        Self {
            round_started: None,
            elapsed_time: Duration::ZERO,
            best_score,
            rounds_played: 0,
            foods_eaten: 0,
            new_best: false,
        }
    }

    /// Refresh the elapsed time of the round in progress
    pub fn update(&mut self) {
        if let Some(started) = self.round_started {
            self.elapsed_time = started.elapsed();
        }
    }

    pub fn on_round_start(&mut self) {
        self.round_started = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
        self.foods_eaten = 0;
        self.new_best = false;
    }

    pub fn on_food(&mut self) {
        self.foods_eaten += 1;
    }

    /// Freeze the clock and fold the final score into the best.
    /// Returns true when the score is a new session best.
    pub fn on_round_over(&mut self, final_score: u32) -> bool {
        self.update();
        self.round_started = None;
        self.rounds_played += 1;
        self.new_best = final_score > self.best_score;
        if self.new_best {
            self.best_score = final_score;
        }
        self.new_best
    }

    /// Forget the current round without counting it
    pub fn on_reset(&mut self) {
        self.round_started = None;
        self.elapsed_time = Duration::ZERO;
        self.foods_eaten = 0;
        self.new_best = false;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::default();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_score_tracking() {
        let mut metrics = GameMetrics::new(20);

        assert!(!metrics.on_round_over(10));
        assert_eq!(metrics.best_score, 20);
        assert_eq!(metrics.rounds_played, 1);
        assert!(!metrics.new_best);

        assert!(metrics.on_round_over(30));
        assert_eq!(metrics.best_score, 30);
        assert_eq!(metrics.rounds_played, 2);
        assert!(metrics.new_best);

        // A tie is not a new best
        assert!(!metrics.on_round_over(30));
        assert!(!metrics.new_best);

        metrics.on_round_start();
        assert!(!metrics.new_best);
    }

    #[test]
    fn test_clock_only_runs_during_a_round() {
        let mut metrics = GameMetrics::default();
        metrics.update();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);

        metrics.on_round_start();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_round_over(0);
        let frozen = metrics.elapsed_time;
        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed_time, frozen);
    }

    #[test]
    fn test_reset_clears_round() {
        let mut metrics = GameMetrics::default();
        metrics.on_round_start();
        metrics.on_food();
        metrics.on_reset();
        assert_eq!(metrics.foods_eaten, 0);
        assert_eq!(metrics.rounds_played, 0);
        assert!(metrics.round_started.is_none());
    }
}
