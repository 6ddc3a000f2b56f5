//! Level and pacing rules derived from the score.

use std::time::Duration;

use super::config::GameConfig;

/// level = floor(score / points_per_level) + 1
pub fn level_for_score(config: &GameConfig, score: u32) -> u32 {
    score / config.points_per_level + 1
}

/// Milliseconds between ticks at `level`, never below the configured floor
pub fn tick_interval_ms(config: &GameConfig, level: u32) -> u64 {
    let speedup = u64::from(level.saturating_sub(1)).saturating_mul(config.interval_step_ms);
    config
        .base_interval_ms
        .saturating_sub(speedup)
        .max(config.min_interval_ms)
}

pub fn tick_interval(config: &GameConfig, level: u32) -> Duration {
    Duration::from_millis(tick_interval_ms(config, level))
}

/// How far the pace has moved from the base interval toward the floor, 0..=100
pub fn speed_percent(config: &GameConfig, level: u32) -> u16 {
    let span = config.base_interval_ms.saturating_sub(config.min_interval_ms);
    if span == 0 {
        return 100;
    }
    let gained = config.base_interval_ms - tick_interval_ms(config, level);
    (gained * 100 / span).min(100) as u16
}
