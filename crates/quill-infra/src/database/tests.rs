use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Value};

use quill_core::domain::{NewPost, NewUser, PageRequest, Post, SortDirection, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

use super::entity::{post, user};
use super::postgres_base::map_db_err;
use super::postgres_repo::{PostgresPostRepository, PostgresUserRepository, escape_like};

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

fn post_model(id: i64, user_id: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        user_id,
        title: format!("Post {id}"),
        content: "Content".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(7, 3)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, NewPost, i64>::find_by_id(&repo, 7)
        .await
        .unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.id, 7);
    assert_eq!(post.user_id, 3);
    assert_eq!(post.title, "Post 7");
}

#[tokio::test]
async fn test_find_page_reports_total_across_pages() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(25)]])
        .append_query_results([(21..=25).map(|id| post_model(id, 1)).collect::<Vec<_>>()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let request = PageRequest::new(2, 10, "createdAt", SortDirection::Desc);

    let page = BaseRepository::<Post, NewPost, i64>::find_page(&repo, &request)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_elements, 25);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.page, 2);
}

#[tokio::test]
async fn test_page_past_offset_limit_is_empty() {
    // Only the count query is answered; fetching rows would exhaust the mock.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(25)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);
    let request = PageRequest::new(u64::MAX / 2, 10, "id", SortDirection::Asc);

    let page = BaseRepository::<Post, NewPost, i64>::find_page(&repo, &request)
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_elements, 25);
    assert_eq!(page.page, u64::MAX / 2);
    assert_eq!(repo.db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    assert!(repo.search("a_c%").await.unwrap().is_empty());

    let log = repo.db.into_transaction_log();
    let statement = &log[0].statements()[0];
    assert!(statement.sql.contains("ESCAPE"));
    let values = statement.values.as_ref().expect("bound values").0.clone();
    assert_eq!(values.iter().filter(|v| **v == Value::from("%a\\_c\\%%")).count(), 2);
}

#[test]
fn test_escape_like() {
    assert_eq!(escape_like("plain"), "plain");
    assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    assert_eq!(escape_like("a\\b"), "a\\\\b");
}

#[tokio::test]
async fn test_unknown_sort_column_is_rejected_before_querying() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);
    let request = PageRequest::new(0, 10, "nonexistent", SortDirection::Asc);

    let err = repo.search_page("rust", &request).await.unwrap_err();

    assert!(matches!(err, RepoError::InvalidSort(field) if field == "nonexistent"));
}

#[tokio::test]
async fn test_exists_by_email_counts_matches() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![count_row(0)]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    assert!(repo.exists_by_email("ada@example.com").await.unwrap());
    assert!(!repo.exists_by_email("nobody@example.com").await.unwrap());
}

#[tokio::test]
async fn test_insert_user_returns_stored_row() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id: 1,
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
            surname: "Lovelace".to_owned(),
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user = BaseRepository::<User, NewUser, i64>::insert(
        &repo,
        NewUser::new("ada@example.com", "Ada", "Lovelace"),
    )
    .await
    .unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.full_name(), "Ada Lovelace");
}

#[tokio::test]
async fn test_find_by_ids_skips_query_for_empty_input() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresUserRepository::new(db);

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

#[test]
fn test_db_error_classification() {
    assert!(matches!(map_db_err(DbErr::RecordNotUpdated), RepoError::NotFound));
    assert!(matches!(
        map_db_err(DbErr::Custom("boom".into())),
        RepoError::Query(msg) if msg.contains("boom")
    ));
}
