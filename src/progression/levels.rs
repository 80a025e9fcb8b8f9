//! Level table math.
//!
//! Levels are defined by a strictly ascending `points_required` threshold.
//! A user holds the highest level whose threshold they have reached.

use serde::{Deserialize, Serialize};

/// Level definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: i64,
    pub name: String,
    /// Points needed to reach this level
    pub points_required: i64,
    /// Informational only
    pub points_total: i64,
}

/// Fields for a new level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLevel {
    pub name: String,
    pub points_required: i64,
    pub points_total: i64,
}

impl NewLevel {
    pub fn new(name: impl Into<String>, points_required: i64) -> Self {
        Self {
            name: name.into(),
            points_required,
            points_total: 0,
        }
    }
}

/// Level table seeded into an empty database.
pub fn default_levels() -> Vec<NewLevel> {
    vec![
        NewLevel::new("Principiante", 0),
        NewLevel::new("Constante", 100),
        NewLevel::new("Comprometido", 250),
        NewLevel::new("Disciplinado", 500),
        NewLevel::new("Experto", 1000),
        NewLevel::new("Maestro", 2000),
    ]
}

/// Highest level whose threshold is at most `points`.
pub fn level_for_points(points: i64, levels: &[Level]) -> Option<&Level> {
    levels
        .iter()
        .filter(|level| level.points_required <= points)
        .max_by_key(|level| level.points_required)
}

/// Lowest level whose threshold is above `points`. `None` at the top level.
pub fn next_level(points: i64, levels: &[Level]) -> Option<&Level> {
    levels
        .iter()
        .filter(|level| level.points_required > points)
        .min_by_key(|level| level.points_required)
}

/// Progress from `current` toward `next` as a whole percentage in `0..=100`.
///
/// Without a current level the base is 0. Without a next level, or when the
/// span between the two is not positive, progress is complete.
pub fn progress_percent(points: i64, current: Option<&Level>, next: Option<&Level>) -> u8 {
    let base = current.map_or(0, |level| level.points_required);

    let Some(next) = next else {
        return 100;
    };

    let span = i128::from(next.points_required) - i128::from(base);
    if span <= 0 {
        return 100;
    }

    let gained = i128::from(points) - i128::from(base);
    (gained * 100).div_euclid(span).clamp(0, 100) as u8
}

/// A user's standing in the level table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub points: i64,
    pub current: Option<Level>,
    pub next: Option<Level>,
    /// Whole percentage toward `next`
    pub percent: u8,
}

impl LevelProgress {
    pub fn compute(points: i64, levels: &[Level]) -> Self {
        let current = level_for_points(points, levels);
        let next = next_level(points, levels);

        Self {
            points,
            percent: progress_percent(points, current, next),
            current: current.cloned(),
            next: next.cloned(),
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next.is_none()
    }
}
