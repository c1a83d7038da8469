//! Integration tests for the unit of work and the audit rows it derives.

use sqlx::PgPool;
use taskflow_db::models::project::CreateProject;
use taskflow_db::models::user::CreateUser;
use taskflow_db::repositories::{AuditLogRepo, ProjectRepo, UserRepo};
use taskflow_db::uow::UnitOfWork;

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::create(
        &mut conn,
        &CreateUser {
            username: username.to_string(),
            display_name: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "$argon2id$fake$hash".to_string(),
        },
    )
    .await
    .unwrap();
    user.id
}

fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        description: None,
    }
}

#[sqlx::test]
async fn commit_persists_mutation_and_audit_together(pool: PgPool) {
    let actor = seed_user(&pool, "actor").await;

    let mut uow = UnitOfWork::begin(&pool, actor).await.unwrap();
    let project = ProjectRepo::create(uow.conn(), actor, &new_project("Audited"))
        .await
        .unwrap();
    uow.changes().record_create(&project);
    uow.commit().await.unwrap();

    let stored = ProjectRepo::find_by_id(&pool, project.id).await.unwrap();
    assert!(stored.is_some());

    let entries = AuditLogRepo::list_for_table(&pool, "projects").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].audit_type, "Create");
    assert_eq!(entries[0].user_id, actor);
}

#[sqlx::test]
async fn dropping_uncommitted_work_rolls_back_everything(pool: PgPool) {
    let actor = seed_user(&pool, "actor").await;

    let project_id = {
        let mut uow = UnitOfWork::begin(&pool, actor).await.unwrap();
        let project = ProjectRepo::create(uow.conn(), actor, &new_project("Vanishing"))
            .await
            .unwrap();
        uow.changes().record_create(&project);
        project.id
        // uow dropped here without commit
    };

    let stored = ProjectRepo::find_by_id(&pool, project_id).await.unwrap();
    assert!(stored.is_none(), "the mutation must roll back");

    let entries = AuditLogRepo::list_for_table(&pool, "projects").await.unwrap();
    assert!(entries.is_empty(), "no audit row may survive a rollback");
}

#[sqlx::test]
async fn audit_rows_preserve_recording_order(pool: PgPool) {
    let actor = seed_user(&pool, "actor").await;

    let mut uow = UnitOfWork::begin(&pool, actor).await.unwrap();
    let first = ProjectRepo::create(uow.conn(), actor, &new_project("First"))
        .await
        .unwrap();
    let second = ProjectRepo::create(uow.conn(), actor, &new_project("Second"))
        .await
        .unwrap();
    uow.changes().record_create(&first);
    uow.changes().record_create(&second);
    uow.commit().await.unwrap();

    let entries = AuditLogRepo::list_for_table(&pool, "projects").await.unwrap();
    let keys: Vec<&str> = entries.iter().map(|e| e.key_values.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            format!("id={}", first.id).as_str(),
            format!("id={}", second.id).as_str()
        ]
    );
}

#[sqlx::test]
async fn update_with_no_changes_writes_no_audit_row(pool: PgPool) {
    let actor = seed_user(&pool, "actor").await;

    let mut uow = UnitOfWork::begin(&pool, actor).await.unwrap();
    let before = ProjectRepo::create(uow.conn(), actor, &new_project("Stable"))
        .await
        .unwrap();
    let after = ProjectRepo::update(uow.conn(), before.id, "Stable", None, actor)
        .await
        .unwrap()
        .unwrap();
    uow.changes().record_update(&before, &after);
    uow.commit().await.unwrap();

    let updates = AuditLogRepo::list_for_table(&pool, "projects")
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.audit_type == "Update")
        .count();
    assert_eq!(updates, 0);
}
