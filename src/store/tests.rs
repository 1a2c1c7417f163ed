//! Tests for the employee store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::Notify;

use super::*;
use crate::db::init_database;
use crate::models::{Role, SortDirection};

/// Store over a fresh database, seeded from a local HTTP server.
struct StoreFixture {
    store: Arc<EmployeeStore>,
    storage: EmployeeStorage,
    _temp_dir: TempDir,
}

impl StoreFixture {
    async fn new() -> Self {
        Self::with_seed(Router::new()).await
    }

    async fn with_remote(remote: Value) -> Self {
        let app = Router::new().route(
            "/assets/employees.json",
            get(move || {
                let remote = remote.clone();
                async move { Json(remote) }
            }),
        );
        Self::with_seed(app).await
    }

    async fn with_seed(app: Router) -> Self {
        Self::with_seed_and_list(app, &[]).await
    }

    async fn with_seed_and_list(app: Router, initial: &[Employee]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        let storage = EmployeeStorage::new(pool, "employees");
        storage.save(initial).await.expect("Failed to seed storage");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let seed = SeedLoader::new(format!("http://{}/assets/employees.json", addr)).unwrap();
        let store = Arc::new(
            EmployeeStore::load(storage.clone(), seed)
                .await
                .expect("Failed to load store"),
        );

        StoreFixture {
            store,
            storage,
            _temp_dir: temp_dir,
        }
    }
}

fn employee(id: i64, name: &str, birthday: &str, role: Role) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        phone: "+7 (900) 111-22-33".to_string(),
        birthday: birthday.to_string(),
        role,
        is_archive: false,
    }
}

fn ids(list: &[Employee]) -> Vec<i64> {
    list.iter().map(|e| e.id).collect()
}

#[tokio::test]
async fn test_initial_state() {
    let fixture = StoreFixture::new().await;
    let state = fixture.store.snapshot().await;

    assert!(state.list.is_empty());
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.filters, EmployeeFilters::default());
    assert_eq!(state.sort.sort_criteria, None);
    assert_eq!(state.sort.sort_direction, SortDirection::Asc);
}

#[tokio::test]
async fn test_load_uses_stored_list() {
    let initial = vec![
        employee(1, "Иванов", "1990-05-10", Role::Cook),
        employee(2, "Петров", "15.03.1985", Role::Driver),
    ];
    let fixture = StoreFixture::with_seed_and_list(Router::new(), &initial).await;

    assert_eq!(fixture.store.snapshot().await.list, initial);
}

#[tokio::test]
async fn test_load_fails_on_corrupt_storage() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("test.sqlite"))
        .await
        .unwrap();
    let storage = EmployeeStorage::new(pool, "employees");
    storage.put_raw("{broken").await.unwrap();

    let seed = SeedLoader::new("http://127.0.0.1:9/assets/employees.json").unwrap();
    let result = EmployeeStore::load(storage, seed).await;

    assert!(matches!(result, Err(AppError::PersistenceParse(_))));
}

#[tokio::test]
async fn test_add_persists_exactly_once() {
    let fixture = StoreFixture::new().await;
    let new_employee = employee(10, "Иванов", "1990-05-10", Role::Cook);

    fixture.store.add(new_employee.clone()).await.unwrap();

    let stored = fixture.storage.load().await.unwrap();
    assert_eq!(stored.iter().filter(|e| **e == new_employee).count(), 1);
    assert_eq!(fixture.store.snapshot().await.list, stored);
}

#[tokio::test]
async fn test_add_appends_in_order() {
    let fixture = StoreFixture::new().await;
    fixture
        .store
        .add(employee(3, "В", "", Role::Cook))
        .await
        .unwrap();
    fixture
        .store
        .add(employee(1, "А", "", Role::Cook))
        .await
        .unwrap();

    assert_eq!(ids(&fixture.store.snapshot().await.list), vec![3, 1]);
}

#[tokio::test]
async fn test_update_replaces_only_matching_record() {
    let initial = vec![
        employee(1, "Иванов", "1990-05-10", Role::Cook),
        employee(2, "Петров", "15.03.1985", Role::Driver),
        employee(3, "Сидоров", "01.06.1970", Role::Waiter),
    ];
    let fixture = StoreFixture::with_seed_and_list(Router::new(), &initial).await;

    let mut changed = initial[1].clone();
    changed.name = "Петров-Водкин".to_string();
    changed.is_archive = true;

    assert!(fixture.store.update(changed.clone()).await.unwrap());

    let list = fixture.store.snapshot().await.list;
    assert_eq!(list.len(), 3);
    assert_eq!(list[0], initial[0]);
    assert_eq!(list[1], changed);
    assert_eq!(list[2], initial[2]);
    assert_eq!(fixture.storage.load().await.unwrap(), list);
}

#[tokio::test]
async fn test_update_missing_id_is_a_no_op() {
    let initial = vec![employee(1, "Иванов", "1990-05-10", Role::Cook)];
    let fixture = StoreFixture::with_seed_and_list(Router::new(), &initial).await;

    let updated = fixture
        .store
        .update(employee(99, "Никто", "", Role::Waiter))
        .await
        .unwrap();

    assert!(!updated);
    assert_eq!(fixture.store.snapshot().await.list, initial);
    assert_eq!(fixture.storage.load().await.unwrap(), initial);
}

#[tokio::test]
async fn test_get() {
    let initial = vec![employee(1, "Иванов", "1990-05-10", Role::Cook)];
    let fixture = StoreFixture::with_seed_and_list(Router::new(), &initial).await;

    assert_eq!(fixture.store.get(1).await, Some(initial[0].clone()));
    assert_eq!(fixture.store.get(2).await, None);
}

#[tokio::test]
async fn test_create_moves_past_largest_id() {
    let fixture = StoreFixture::new().await;
    let far_future = chrono::Utc::now().timestamp_millis() + 1_000_000;
    fixture
        .store
        .add(employee(far_future, "А", "", Role::Cook))
        .await
        .unwrap();

    let created = fixture
        .store
        .create(|id| employee(id, "Б", "", Role::Waiter))
        .await
        .unwrap();

    assert_eq!(created.id, far_future + 1);
    assert_eq!(fixture.storage.load().await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_creates_get_distinct_ids() {
    let fixture = StoreFixture::new().await;

    let handles: Vec<_> = (0..40)
        .map(|n| {
            let store = fixture.store.clone();
            tokio::spawn(async move {
                store
                    .create(|id| employee(id, &format!("Сотрудник {}", n), "", Role::Cook))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut created = Vec::new();
    for handle in handles {
        created.push(handle.await.unwrap().id);
    }

    let list = fixture.store.snapshot().await.list;
    let distinct: std::collections::HashSet<i64> = list.iter().map(|e| e.id).collect();
    assert_eq!(list.len(), 40);
    assert_eq!(distinct.len(), 40);
    assert!(created.iter().all(|id| distinct.contains(id)));
}

#[tokio::test]
async fn test_set_filters_overwrites_wholesale() {
    let fixture = StoreFixture::new().await;

    fixture
        .store
        .set_filters(EmployeeFilters::new(Some(Role::Cook), true, Some(5)))
        .await;
    let filters = fixture
        .store
        .set_filters(EmployeeFilters::new(None, false, None))
        .await;

    assert_eq!(filters, EmployeeFilters::default());
    assert_eq!(fixture.store.snapshot().await.filters, filters);
}

#[tokio::test]
async fn test_sort_by_name_toggles() {
    let initial = vec![
        employee(1, "Петров", "", Role::Cook),
        employee(2, "Алексеев", "", Role::Cook),
        employee(3, "Сидоров", "", Role::Cook),
    ];
    let fixture = StoreFixture::with_seed_and_list(Router::new(), &initial).await;

    let sort = fixture.store.sort_by(SortCriteria::Name).await;
    assert_eq!(sort.sort_direction, SortDirection::Asc);
    assert_eq!(ids(&fixture.store.view().await), vec![2, 1, 3]);

    let sort = fixture.store.sort_by(SortCriteria::Name).await;
    assert_eq!(sort.sort_direction, SortDirection::Desc);
    assert_eq!(ids(&fixture.store.view().await), vec![3, 1, 2]);

    let sort = fixture.store.sort_by(SortCriteria::Name).await;
    assert_eq!(sort.sort_direction, SortDirection::Asc);
    assert_eq!(ids(&fixture.store.view().await), vec![2, 1, 3]);
}

#[tokio::test]
async fn test_sort_switch_resets_direction() {
    let fixture = StoreFixture::new().await;

    fixture.store.sort_by(SortCriteria::Name).await;
    fixture.store.sort_by(SortCriteria::Name).await;
    let sort = fixture.store.sort_by(SortCriteria::Birthday).await;

    assert_eq!(sort.sort_criteria, Some(SortCriteria::Birthday));
    assert_eq!(sort.sort_direction, SortDirection::Asc);
}

#[tokio::test]
async fn test_sort_by_birthday_scenario() {
    let initial = vec![
        employee(1, "Иванов", "1990-05-10", Role::Cook),
        employee(2, "Петров", "15.03.1985", Role::Driver),
    ];
    let fixture = StoreFixture::with_seed_and_list(Router::new(), &initial).await;

    fixture.store.sort_by(SortCriteria::Birthday).await;

    assert_eq!(ids(&fixture.store.view().await), vec![2, 1]);
}

#[tokio::test]
async fn test_sort_and_filter_are_not_persisted() {
    let initial = vec![
        employee(1, "Петров", "", Role::Cook),
        employee(2, "Алексеев", "", Role::Driver),
    ];
    let fixture = StoreFixture::with_seed_and_list(Router::new(), &initial).await;

    fixture.store.sort_by(SortCriteria::Name).await;
    fixture
        .store
        .set_filters(EmployeeFilters::new(Some(Role::Driver), false, None))
        .await;

    assert_eq!(fixture.storage.load().await.unwrap(), initial);
    assert_eq!(fixture.store.snapshot().await.list, initial);
    assert_eq!(ids(&fixture.store.view().await), vec![2]);
}

#[tokio::test]
async fn test_fetch_remote_merges_new_ids_only() {
    let local = employee(2, "Петров (локально)", "15.03.1985", Role::Driver);
    let remote = serde_json::json!([
        {"id": 2, "name": "Петров (удалённо)", "phone": "", "birthday": "",
         "role": "Повар", "isArchive": true},
        {"id": 3, "name": "Сидоров", "phone": "+7 (900) 333-44-55",
         "birthday": "1970-06-01", "role": "Официант", "isArchive": false}
    ]);
    let app = Router::new().route(
        "/assets/employees.json",
        get(move || {
            let remote = remote.clone();
            async move { Json(remote) }
        }),
    );
    let fixture = StoreFixture::with_seed_and_list(app, &[local.clone()]).await;

    fixture.store.fetch_remote().await;

    let state = fixture.store.snapshot().await;
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(ids(&state.list), vec![2, 3]);
    assert_eq!(state.list[0], local);
    assert_eq!(fixture.storage.load().await.unwrap(), state.list);
}

#[tokio::test]
async fn test_fetch_remote_twice_is_idempotent() {
    let fixture = StoreFixture::with_remote(serde_json::json!([
        {"id": 3, "name": "Сидоров", "phone": "", "birthday": "",
         "role": "Официант", "isArchive": false},
        {"id": 3, "name": "Сидоров-дубль", "phone": "", "birthday": "",
         "role": "Официант", "isArchive": false}
    ]))
    .await;

    fixture.store.fetch_remote().await;
    fixture.store.fetch_remote().await;

    let state = fixture.store.snapshot().await;
    assert_eq!(ids(&state.list), vec![3]);
    assert_eq!(state.list[0].name, "Сидоров");
}

#[tokio::test]
async fn test_fetch_remote_failure_sets_error() {
    let app = Router::new().route(
        "/assets/employees.json",
        get(|| async { (StatusCode::NOT_FOUND, "missing") }),
    );
    let initial = vec![employee(1, "Иванов", "1990-05-10", Role::Cook)];
    let fixture = StoreFixture::with_seed_and_list(app, &initial).await;

    fixture.store.fetch_remote().await;

    let state = fixture.store.snapshot().await;
    assert!(!state.loading);
    assert!(state.error.is_some());
    assert_eq!(state.list, initial);
}

#[tokio::test]
async fn test_fetch_remote_clears_previous_error() {
    let fixture = StoreFixture::with_remote(serde_json::json!([])).await;
    {
        let mut state = fixture.store.state.write().await;
        state.error = Some("stale".to_string());
    }

    fixture.store.fetch_remote().await;

    assert!(fixture.store.snapshot().await.error.is_none());
}

#[tokio::test]
async fn test_overlapping_fetches_keep_loading_until_all_finish() {
    let calls = Arc::new(AtomicUsize::new(0));
    let release = Arc::new(Notify::new());

    let app = {
        let calls = calls.clone();
        let release = release.clone();
        Router::new().route(
            "/assets/employees.json",
            get(move || {
                let calls = calls.clone();
                let release = release.clone();
                async move {
                    // The first request is held until the test releases it
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        release.notified().await;
                    }
                    Json(serde_json::json!([]))
                }
            }),
        )
    };
    let fixture = StoreFixture::with_seed(app).await;

    let slow = {
        let store = fixture.store.clone();
        tokio::spawn(async move { store.fetch_remote().await })
    };
    while calls.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    fixture.store.fetch_remote().await;
    assert!(fixture.store.snapshot().await.loading);

    release.notify_one();
    slow.await.unwrap();
    assert!(!fixture.store.snapshot().await.loading);
}
