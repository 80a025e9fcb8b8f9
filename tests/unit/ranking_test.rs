//! Unit tests for ranking aggregation

use habitrack::achievements::{AchievementManager, NewAchievement};
use habitrack::leaderboards::RankingService;
use habitrack::MemoryStore;

fn award(store: &MemoryStore, user_id: i64, points: &[i64]) {
    let manager = AchievementManager::new(store);
    for &value in points {
        let achievement = manager
            .create_achievement(&NewAchievement::new(format!("+{}", value), value))
            .unwrap();
        manager.unlock(user_id, achievement.id).unwrap();
    }
}

#[test]
fn test_tied_users_occupy_consecutive_positions() {
    let store = MemoryStore::new();
    let first = store.add_user();
    let second = store.add_user();
    let third = store.add_user();
    award(&store, first, &[30]);
    award(&store, second, &[10]);
    award(&store, third, &[20, 10]);

    let ranking = RankingService::new(&store).general_ranking().unwrap();

    let thirties: Vec<_> = ranking
        .iter()
        .filter(|e| e.points == 30)
        .map(|e| e.position)
        .collect();
    assert_eq!(thirties, vec![1, 2]);
    assert_eq!(ranking[2].user_id, second);
    assert_eq!(ranking[2].position, 3);
}

#[test]
fn test_positions_are_a_permutation() {
    let store = MemoryStore::new();
    for points in [5, 5, 0, 40, 5, 12] {
        let user = store.add_user();
        if points > 0 {
            award(&store, user, &[points]);
        }
    }

    let ranking = RankingService::new(&store).general_ranking().unwrap();
    let positions: Vec<_> = ranking.iter().map(|e| e.position).collect();
    assert_eq!(positions, (1..=6).collect::<Vec<u32>>());
    assert!(ranking.windows(2).all(|w| w[0].points >= w[1].points));
}

#[test]
fn test_repeated_unlock_does_not_double_points() {
    let store = MemoryStore::new();
    let user = store.add_user();
    let manager = AchievementManager::new(&store);
    let achievement = manager
        .create_achievement(&NewAchievement::new("Única", 50))
        .unwrap();

    manager.unlock(user, achievement.id).unwrap();
    manager.unlock(user, achievement.id).unwrap();

    assert_eq!(RankingService::new(&store).total_points(user).unwrap(), 50);
}

#[test]
fn test_empty_ranking() {
    let store = MemoryStore::new();
    let service = RankingService::new(&store);

    assert!(service.general_ranking().unwrap().is_empty());
    let position = service.position_of(1).unwrap();
    assert_eq!(position.position, 1);
    assert_eq!(position.points, 0);
}
