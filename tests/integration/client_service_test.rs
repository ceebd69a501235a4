// Integration tests for the client service against in-memory SQLite
//
// Covers uniqueness enforcement on create and update, field validation,
// not-found outcomes, and the storage-level unique indexes as the last
// line of defense when the service-level check is bypassed.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use facturation::clients::{ClientRepository, ClientService, SqliteClientRepository};
use facturation::core::AppError;

async fn setup() -> (ClientService, Arc<dyn ClientRepository>, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let repo: Arc<dyn ClientRepository> = Arc::new(SqliteClientRepository::new(pool.clone()));
    (ClientService::new(repo.clone()), repo, pool)
}

#[tokio::test]
async fn test_create_assigns_id_and_timestamp() {
    let (service, _, _pool) = setup().await;

    let client = service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    assert!(client.id > 0);
    assert_eq!(client.name, "Acme");
    assert_eq!(client.email, "a@acme.test");
    assert_eq!(client.siret, "12345678901234");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let (service, _, _pool) = setup().await;

    service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    let err = service
        .create("Other", "a@acme.test", "98765432109876")
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(message) => assert!(message.contains("email")),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_siret_rejected() {
    let (service, _, _pool) = setup().await;

    service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    let err = service
        .create("Other", "b@other.test", "12345678901234")
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(message) => assert!(message.contains("SIRET")),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_fields_reported_together() {
    let (service, _, _pool) = setup().await;

    let err = service.create("", "not-an-email", "123").await.unwrap_err();

    match err {
        AppError::Validation(errors) => {
            assert_eq!(errors.len(), 3);
            assert!(errors.get("name").is_some());
            assert!(errors.get("email").is_some());
            assert!(errors.get("siret").is_some());
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_absent_returns_none() {
    let (service, _, _pool) = setup().await;

    assert!(service.get(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_returns_all_clients() {
    let (service, _, _pool) = setup().await;

    service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();
    service
        .create("Globex", "g@globex.test", "98765432109876")
        .await
        .unwrap();

    let clients = service.list().await.unwrap();
    assert_eq!(clients.len(), 2);
}

#[tokio::test]
async fn test_update_changes_fields_keeps_identity() {
    let (service, _, _pool) = setup().await;

    let created = service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    let updated = service
        .update(created.id, "Acme SARL", "contact@acme.test", "12345678901234")
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Acme SARL");
    assert_eq!(updated.email, "contact@acme.test");
    assert_eq!(updated.created_at, created.created_at);

    let fetched = service.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_missing_client_not_found() {
    let (service, _, _pool) = setup().await;

    let err = service
        .update(42, "Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_rejects_email_held_by_other_client() {
    let (service, _, _pool) = setup().await;

    service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();
    let globex = service
        .create("Globex", "g@globex.test", "98765432109876")
        .await
        .unwrap();

    let err = service
        .update(globex.id, "Globex", "a@acme.test", "98765432109876")
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(message) => assert!(message.contains("email")),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_keeping_own_email_and_siret_is_allowed() {
    let (service, _, _pool) = setup().await;

    let created = service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    let updated = service
        .update(created.id, "Acme Renamed", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    assert_eq!(updated.name, "Acme Renamed");
}

#[tokio::test]
async fn test_delete_missing_client_not_found() {
    let (service, _, _pool) = setup().await;

    let err = service.delete(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_removes_client() {
    let (service, _, _pool) = setup().await;

    let created = service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    service.delete(created.id).await.unwrap();

    assert!(service.get(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unique_index_guards_direct_inserts() {
    // Bypass the service-level checks: the database indexes must still
    // reject the duplicate (the check-then-insert race of concurrent
    // creates lands here).
    let (service, repo, _pool) = setup().await;

    service
        .create("Acme", "a@acme.test", "12345678901234")
        .await
        .unwrap();

    let err = repo
        .insert("Imposter", "a@acme.test", "11111111111111", chrono::Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}
