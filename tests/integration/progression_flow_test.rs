//! Integration tests for achievements, ranking and levels together.

use habitrack::achievements::{AchievementManager, NewAchievement};
use habitrack::leaderboards::RankingService;
use habitrack::progression::{default_levels, LevelManager, NewLevel};
use habitrack::users::{NewUser, UserManager};
use habitrack::Database;

fn setup_users(db: &Database, names: &[&str]) -> Vec<i64> {
    let users = UserManager::new(db);
    names
        .iter()
        .map(|name| users.create_user(&NewUser::new(*name, *name, "Test")).unwrap().id)
        .collect()
}

#[test]
fn test_unlocks_drive_levels_and_ranking() {
    let db = Database::open_in_memory().unwrap();
    let ids = setup_users(&db, &["ana", "bruno", "carla"]);

    let levels = LevelManager::new(&db);
    levels.create_level(&NewLevel::new("Bronce", 0)).unwrap();
    let plata = levels.create_level(&NewLevel::new("Plata", 100)).unwrap();
    levels.create_level(&NewLevel::new("Oro", 500)).unwrap();

    let achievements = AchievementManager::new(&db);
    let big = achievements
        .create_achievement(&NewAchievement::new("Un mes", 120))
        .unwrap();
    let small = achievements
        .create_achievement(&NewAchievement::new("Una semana", 30))
        .unwrap();

    achievements.unlock(ids[0], big.id).unwrap();
    achievements.unlock(ids[0], small.id).unwrap();
    achievements.unlock(ids[2], small.id).unwrap();

    for id in &ids {
        levels.refresh_level(*id).unwrap();
    }

    assert_eq!(levels.current_level(ids[0]).unwrap(), Some(plata.clone()));
    assert_eq!(levels.users_at_level(plata.id).unwrap(), vec![ids[0]]);

    let progress = levels.progress_for_user(ids[0]).unwrap();
    assert_eq!(progress.points, 150);
    assert_eq!(progress.percent, 12);

    let ranking = RankingService::new(&db);
    let rows: Vec<_> = ranking
        .general_ranking()
        .unwrap()
        .into_iter()
        .map(|e| (e.position, e.user_id, e.username, e.points))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, ids[0], "ana".to_string(), 150),
            (2, ids[2], "carla".to_string(), 30),
            (3, ids[1], "bruno".to_string(), 0),
        ]
    );
    assert_eq!(ranking.position_of(ids[1]).unwrap().position, 3);
    assert_eq!(ranking.top(1).unwrap()[0].user_id, ids[0]);
}

#[test]
fn test_default_level_seed() {
    let db = Database::open_in_memory().unwrap();
    let levels = LevelManager::new(&db);

    assert_eq!(levels.initialize_levels().unwrap(), default_levels().len());
    assert_eq!(levels.initialize_levels().unwrap(), 0);

    let ids = setup_users(&db, &["nuevo"]);
    let level = levels.assign_level(ids[0], 0).unwrap();
    assert_eq!(level.map(|l| l.points_required), Some(0));
}

#[test]
fn test_deleting_level_drops_assignments() {
    let db = Database::open_in_memory().unwrap();
    let ids = setup_users(&db, &["ana"]);
    let levels = LevelManager::new(&db);
    let base = levels.create_level(&NewLevel::new("Base", 0)).unwrap();
    levels.assign_level(ids[0], 10).unwrap();

    db.execute(
        "DELETE FROM levels WHERE id = ?1",
        rusqlite::params![base.id],
    )
    .unwrap();

    assert!(levels.current_level(ids[0]).unwrap().is_none());
}
