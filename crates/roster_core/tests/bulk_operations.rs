use roster_core::db::open_db_in_memory;
use roster_core::query::MemberProjection;
use roster_core::{
    Assignment, Column, Member, MemberQuery, MemberRepository, MemberService, Predicate,
    QueryExecutor, RepoError, SqliteMemberRepository,
};
use rusqlite::Connection;

fn seed_four_members(conn: &Connection) -> Vec<Member> {
    let repo = SqliteMemberRepository::new(conn);
    let team_a = repo.save_team("teamA").unwrap();
    let team_b = repo.save_team("teamB").unwrap();
    vec![
        repo.save_member(Some("member1"), 10, Some(team_a.id)).unwrap(),
        repo.save_member(Some("member2"), 20, Some(team_a.id)).unwrap(),
        repo.save_member(Some("member3"), 30, Some(team_b.id)).unwrap(),
        repo.save_member(Some("member4"), 40, Some(team_b.id)).unwrap(),
    ]
}

fn ages(members: &[Member]) -> Vec<i32> {
    members.iter().map(|member| member.age).collect()
}

#[test]
fn bulk_increment_leaves_snapshots_stale_until_requery() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    let before = repo.find_all().unwrap();
    let affected = repo.bulk_increment_age(1).unwrap();

    assert_eq!(affected, 4);
    assert_eq!(ages(&before), vec![10, 20, 30, 40]);
    assert_eq!(ages(&repo.find_all().unwrap()), vec![11, 21, 31, 41]);
}

#[test]
fn bulk_rename_only_touches_younger_members() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    let affected = repo.bulk_rename(28, "removed").unwrap();

    assert_eq!(affected, 2);
    let names: Vec<_> = repo
        .find_all()
        .unwrap()
        .into_iter()
        .map(|member| member.username.unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["removed", "removed", "member3", "member4"]);
    assert_eq!(repo.find_by_username("removed").unwrap().len(), 2);
}

#[test]
fn bulk_delete_removes_members_above_threshold() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    let affected = repo.bulk_delete_by_age_greater_than(18).unwrap();

    assert_eq!(affected, 3);
    let remaining = repo.find_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].username.as_deref(), Some("member1"));
}

#[test]
fn bulk_writes_matching_nothing_report_zero() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    assert_eq!(repo.bulk_rename(0, "removed").unwrap(), 0);
    assert_eq!(repo.bulk_delete_by_age_greater_than(99).unwrap(), 0);
    assert_eq!(repo.count(&MemberQuery::new()).unwrap(), 4);
}

#[test]
fn bulk_increment_on_empty_store_reports_zero() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::new(&conn);

    assert_eq!(repo.bulk_increment_age(1).unwrap(), 0);
}

#[test]
fn generic_update_combines_assignments() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    let affected = repo
        .update(
            &[
                Assignment::set(Column::MemberName, "senior".to_string()),
                Assignment::add(Column::MemberAge, -5),
            ],
            &Column::MemberAge.goe(30),
        )
        .unwrap();

    assert_eq!(affected, 2);
    let seniors = repo.find_by_username("senior").unwrap();
    assert_eq!(ages(&seniors), vec![25, 35]);
}

#[test]
fn bulk_writes_reject_team_filters_and_empty_assignments() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    let team_filter = Column::TeamName.eq("teamA".to_string());
    assert!(matches!(
        repo.delete(&team_filter),
        Err(RepoError::InvalidArgument(_))
    ));
    assert!(matches!(
        repo.update(&[Assignment::add(Column::MemberAge, 1)], &team_filter),
        Err(RepoError::InvalidArgument(_))
    ));
    assert!(matches!(
        repo.update(&[], &Predicate::always()),
        Err(RepoError::InvalidArgument(_))
    ));
    assert!(matches!(
        repo.update(
            &[Assignment::set(Column::TeamName, "x".to_string())],
            &Predicate::always()
        ),
        Err(RepoError::InvalidArgument(_))
    ));
    assert_eq!(repo.count(&MemberQuery::new()).unwrap(), 4);
}

#[test]
fn deleting_every_member_with_always_filter() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    assert_eq!(repo.delete(&Predicate::always()).unwrap(), 4);
    assert!(repo.find_all().unwrap().is_empty());
    assert!(repo.find_team(1).unwrap().is_some());
}

#[test]
fn service_reload_refreshes_and_drops_deleted_members() {
    let conn = open_db_in_memory().unwrap();
    let snapshots = seed_four_members(&conn);
    let service = MemberService::new(SqliteMemberRepository::new(&conn));

    let incremented = service.increment_ages(1).unwrap();
    assert_eq!(incremented.affected, 4);
    assert_eq!(ages(&snapshots), vec![10, 20, 30, 40]);

    let deleted = service.delete_older_than(30).unwrap();
    assert_eq!(deleted.affected, 2);

    let reloaded = service.reload(&snapshots).unwrap();
    assert_eq!(ages(&reloaded), vec![11, 21]);
    assert_eq!(reloaded[0].id, snapshots[0].id);
}

#[test]
fn service_rename_reports_affected_rows() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let service = MemberService::new(SqliteMemberRepository::new(&conn));

    let outcome = service.rename_younger_than(28, "removed").unwrap();
    assert_eq!(outcome.affected, 2);

    let query = MemberQuery::new()
        .filter(Column::MemberName.eq("removed".to_string()))
        .order_by(Column::MemberId.asc());
    let renamed = service
        .repository()
        .fetch(&query, &MemberProjection::new())
        .unwrap();
    assert_eq!(ages(&renamed), vec![10, 20]);
}

#[test]
fn service_registration_validates_input() {
    let conn = open_db_in_memory().unwrap();
    let service = MemberService::new(SqliteMemberRepository::new(&conn));

    let team = service.register_team("teamA").unwrap();
    let member = service
        .register_member(Some("member1"), 10, Some(team.id))
        .unwrap();
    assert_eq!(member.team_id(), Some(team.id));

    assert!(matches!(
        service.register_team("  "),
        Err(RepoError::Validation(_))
    ));
    assert!(matches!(
        service.register_member(Some("member2"), -1, None),
        Err(RepoError::Validation(_))
    ));
}

#[test]
fn bulk_increment_refuses_to_overflow_age() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::new(&conn);
    repo.save_member(Some("young"), 10, None).unwrap();
    repo.save_member(Some("old"), i32::MAX, None).unwrap();

    assert!(matches!(
        repo.bulk_increment_age(1),
        Err(RepoError::InvalidArgument(_))
    ));

    let members = repo.find_all().unwrap();
    assert_eq!(ages(&members), vec![10, i32::MAX]);
}

#[test]
fn bulk_increment_refuses_to_make_age_negative() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let repo = SqliteMemberRepository::new(&conn);

    assert!(matches!(
        repo.bulk_increment_age(-20),
        Err(RepoError::InvalidArgument(_))
    ));
    assert_eq!(ages(&repo.find_all().unwrap()), vec![10, 20, 30, 40]);

    assert_eq!(repo.bulk_increment_age(-10).unwrap(), 4);
    assert_eq!(ages(&repo.find_all().unwrap()), vec![0, 10, 20, 30]);
}

#[test]
fn age_guard_only_considers_filtered_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::new(&conn);
    repo.save_member(Some("young"), 10, None).unwrap();
    repo.save_member(Some("old"), i32::MAX, None).unwrap();

    let affected = repo
        .update(
            &[Assignment::add(Column::MemberAge, 5)],
            &Column::MemberAge.lt(100),
        )
        .unwrap();

    assert_eq!(affected, 1);
    assert_eq!(ages(&repo.find_all().unwrap()), vec![15, i32::MAX]);
    assert!(matches!(
        repo.update(
            &[Assignment::set(Column::MemberAge, -1)],
            &Predicate::always()
        ),
        Err(RepoError::InvalidArgument(_))
    ));
}

#[test]
fn service_increment_surfaces_out_of_range_age() {
    let conn = open_db_in_memory().unwrap();
    seed_four_members(&conn);
    let service = MemberService::new(SqliteMemberRepository::new(&conn));

    assert!(matches!(
        service.increment_ages(i32::MAX),
        Err(RepoError::InvalidArgument(_))
    ));
    assert_eq!(
        ages(&service.repository().find_all().unwrap()),
        vec![10, 20, 30, 40]
    );
}
