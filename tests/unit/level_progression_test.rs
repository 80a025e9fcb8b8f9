//! Unit tests for level table math

use habitrack::progression::{
    level_for_points, next_level, progress_percent, Level, LevelProgress,
};

fn levels(thresholds: &[i64]) -> Vec<Level> {
    thresholds
        .iter()
        .enumerate()
        .map(|(i, &points_required)| Level {
            id: i as i64 + 10,
            name: format!("L{}", points_required),
            points_required,
            points_total: 0,
        })
        .collect()
}

#[test]
fn test_threshold_table() {
    let table = levels(&[0, 100, 500]);

    let current = level_for_points(150, &table);
    let next = next_level(150, &table);
    assert_eq!(current.map(|l| l.name.as_str()), Some("L100"));
    assert_eq!(next.map(|l| l.name.as_str()), Some("L500"));
    assert_eq!(progress_percent(150, current, next), 12);
}

#[test]
fn test_unsorted_table_gives_same_answers() {
    let sorted = levels(&[0, 100, 500]);
    let mut shuffled = sorted.clone();
    shuffled.reverse();

    for points in [-1, 0, 99, 100, 101, 499, 500, 10_000] {
        assert_eq!(
            level_for_points(points, &sorted),
            level_for_points(points, &shuffled)
        );
        assert_eq!(next_level(points, &sorted), next_level(points, &shuffled));
    }
}

#[test]
fn test_percent_stays_in_range() {
    let table = levels(&[0, 7, 13, 1000]);
    for points in -50..1100 {
        let progress = LevelProgress::compute(points, &table);
        assert!(progress.percent <= 100);
        if progress.next.is_none() {
            assert_eq!(progress.percent, 100);
        }
    }
}

#[test]
fn test_no_levels() {
    let progress = LevelProgress::compute(42, &[]);
    assert!(progress.current.is_none());
    assert!(progress.is_max_level());
    assert_eq!(progress.percent, 100);
}

#[test]
fn test_extreme_points_do_not_overflow() {
    let table = levels(&[i64::MIN + 1, 0, i64::MAX]);
    let progress = LevelProgress::compute(i64::MAX - 1, &table);
    assert_eq!(progress.percent, 99);
}
