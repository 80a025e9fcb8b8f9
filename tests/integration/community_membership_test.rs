//! Integration tests for community membership against SQLite.

use habitrack::communities::{
    CommunityManager, MembershipError, MembershipRules, MembershipStats, MembershipStatus,
    NewCommunity,
};
use habitrack::users::{NewUser, UserManager};
use habitrack::Database;

struct Setup {
    db: Database,
}

impl Setup {
    fn new() -> Self {
        Self {
            db: Database::open_in_memory().expect("Failed to create database"),
        }
    }

    fn user(&self, username: &str) -> i64 {
        UserManager::new(&self.db)
            .create_user(&NewUser::new(username, username, "Prueba"))
            .unwrap()
            .id
    }

    fn community(&self, creator: i64, name: &str) -> i64 {
        CommunityManager::new(&self.db)
            .create_community(creator, &NewCommunity::new(name), &[])
            .unwrap()
            .id
    }
}

#[test]
fn test_member_count_with_implicit_creator() {
    let setup = Setup::new();
    let creator = setup.user("creator");
    let community = setup.community(creator, "Runners");
    let rules = MembershipRules::new(&setup.db);

    let a = setup.user("a");
    let b = setup.user("b");
    let c = setup.user("c");
    for user in [a, b, c] {
        rules.join(user, community).unwrap();
    }
    rules
        .set_status(c, community, MembershipStatus::Pendiente)
        .unwrap();

    assert_eq!(rules.member_count(community, None).unwrap(), 3);
    assert_eq!(
        rules
            .member_count(community, Some(MembershipStatus::Activo))
            .unwrap(),
        3
    );
    assert_eq!(
        rules.membership_stats(community).unwrap(),
        MembershipStats {
            total: 4,
            activo: 3,
            pendiente: 1,
            bloqueado: 0,
            inactivo: 0,
        }
    );
}

#[test]
fn test_join_leave_rules() {
    let setup = Setup::new();
    let creator = setup.user("creator");
    let member = setup.user("member");
    let community = setup.community(creator, "Lectores");
    let rules = MembershipRules::new(&setup.db);

    assert!(matches!(
        rules.leave(creator, community),
        Err(MembershipError::CreatorCannotLeave)
    ));

    rules.join(member, community).unwrap();
    assert!(matches!(
        rules.join(member, community),
        Err(MembershipError::AlreadyMember)
    ));

    rules.leave(member, community).unwrap();
    assert!(matches!(
        rules.leave(member, community),
        Err(MembershipError::NotAMember)
    ));
}

#[test]
fn test_blocked_member_is_not_active() {
    let setup = Setup::new();
    let creator = setup.user("creator");
    let member = setup.user("member");
    let community = setup.community(creator, "Yoga");
    let rules = MembershipRules::new(&setup.db);

    rules.join(member, community).unwrap();
    rules
        .set_status(member, community, MembershipStatus::Bloqueado)
        .unwrap();

    assert!(!rules.is_member_active(member, community).unwrap());
    assert!(rules.is_member_active(creator, community).unwrap());
    assert_eq!(rules.member_count(community, None).unwrap(), 1);

    // Blocked members still hold their row
    assert!(matches!(
        rules.join(member, community),
        Err(MembershipError::AlreadyMember)
    ));
}

#[test]
fn test_user_communities() {
    let setup = Setup::new();
    let creator = setup.user("creator");
    let member = setup.user("member");
    let first = setup.community(creator, "Uno");
    let second = setup.community(creator, "Dos");
    let rules = MembershipRules::new(&setup.db);

    rules.join(member, first).unwrap();
    rules.join(member, second).unwrap();
    rules
        .set_status(member, second, MembershipStatus::Inactivo)
        .unwrap();

    let active = rules
        .communities_of_user(member, Some(MembershipStatus::Activo))
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].community_id, first);

    let created = CommunityManager::new(&setup.db)
        .communities_by_creator(creator)
        .unwrap();
    assert_eq!(created.len(), 2);
}

#[test]
fn test_unknown_community_is_reported() {
    let setup = Setup::new();
    let user = setup.user("solo");
    let rules = MembershipRules::new(&setup.db);

    assert!(matches!(
        rules.is_member_active(user, 77),
        Err(MembershipError::CommunityNotFound(77))
    ));
    assert!(matches!(
        rules.set_status(user, 77, MembershipStatus::Activo),
        Err(MembershipError::CommunityNotFound(77))
    ));
}
