//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `roster_core` linkage.
//! - Seed an in-memory roster and print one search page deterministically.

use roster_core::db::open_db_in_memory;
use roster_core::{
    MemberRepository, MemberSearch, MemberSearchCondition, PageRequest, SqliteMemberRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("roster_core ping={}", roster_core::ping());
    println!("roster_core version={}", roster_core::core_version());

    match print_demo_page() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("roster demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_demo_page() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteMemberRepository::new(&conn);

    let team_a = repo.save_team("teamA")?;
    let team_b = repo.save_team("teamB")?;
    for (name, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        repo.save_member(Some(name), age, Some(team.id))?;
    }

    let search = MemberSearch::new(&repo);
    let request = PageRequest::of(0, 3)?;
    let page = search.search_page_complex(&MemberSearchCondition::default(), &request)?;
    println!(
        "page offset={} limit={} total={} rows={}",
        page.offset,
        page.limit,
        page.total,
        page.results.len()
    );
    for row in &page.results {
        println!(
            "member_id={} username={} age={} team={}",
            row.member_id,
            row.username.as_deref().unwrap_or("-"),
            row.age,
            row.team_name.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
