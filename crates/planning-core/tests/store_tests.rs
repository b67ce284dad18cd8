mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use jiff::civil::date;
use planning_core::{
    backend::{FsBlobStore, SqliteDocumentStore},
    CreateComment, CreatePlanning, CreateTask, ErrorKind, PlanningStatus, PlanningStoreBuilder,
    PlanningType, SessionResolver, TaskPriority, TaskStatus, TenantContext, UploadDocument,
};
use tempfile::TempDir;

use common::{create_test_store, TENANT, UNIT, USER};

fn create_params(title: &str) -> CreatePlanning {
    CreatePlanning {
        title: title.to_string(),
        description: "Annual maintenance".to_string(),
        planning_type: PlanningType::Annual,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        assigned_to: BTreeSet::new(),
        tags: BTreeSet::from(["maintenance".to_string()]),
        budget: Some(1500.50),
    }
}

fn task_params(planning_id: &str, title: &str, parent: Option<&str>) -> CreateTask {
    CreateTask {
        planning_id: planning_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        priority: TaskPriority::Medium,
        start_date: date(2024, 2, 1),
        due_date: date(2024, 2, 28),
        assigned_to: BTreeSet::new(),
        parent_task_id: parent.map(String::from),
    }
}

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_complete_planning_workflow() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = create_test_store(&temp_dir).await;

    let planning = store
        .create_planning(create_params("Elevator modernization"))
        .await
        .expect("Failed to create planning");
    assert_eq!(planning.status, PlanningStatus::Draft);
    assert_eq!(planning.budget.map(|b| b.minor()), Some(150050));

    let cabin = store
        .add_task(task_params(&planning.id, "Cabin", None))
        .await
        .expect("Failed to add task");
    let doors = store
        .add_task(task_params(&planning.id, "Doors", Some(&cabin.id)))
        .await
        .expect("Failed to add subtask");
    let motor = store
        .add_task(task_params(&planning.id, "Motor", None))
        .await
        .expect("Failed to add task");
    assert_eq!((cabin.order, doors.order, motor.order), (0, 0, 1));

    store
        .set_task_status(&planning.id, &cabin.id, TaskStatus::Completed)
        .await
        .expect("Failed to complete task");
    store
        .set_task_progress(&planning.id, &doors.id, 50)
        .await
        .expect("Failed to set progress");

    // (100 + 50 + 0) / 3 = 50
    let opened = store
        .get_planning(&planning.id)
        .await
        .expect("Failed to open planning");
    assert_eq!(opened.progress, 50);

    let document = store
        .upload_document(UploadDocument {
            planning_id: planning.id.clone(),
            task_id: Some(motor.id.clone()),
            file_name: "quote.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            description: Some("Supplier quote".to_string()),
            bytes: b"%PDF-1.7".to_vec(),
        })
        .await
        .expect("Failed to upload document");
    let blob_file = FsBlobStore::new(temp_dir.path().join("blobs"))
        .resolve(&document.file_url)
        .expect("Blob URL outside blob dir");
    assert_eq!(std::fs::read(&blob_file).unwrap(), b"%PDF-1.7");

    store
        .add_comment(CreateComment {
            planning_id: planning.id.clone(),
            task_id: None,
            text: "Board approved the quote".to_string(),
        })
        .await
        .expect("Failed to add comment");

    let state = store.state();
    assert_eq!(state.tasks.len(), 3);
    assert_eq!(state.documents_for_task(&motor.id).len(), 1);
    assert_eq!(state.comments.len(), 1);

    store
        .delete_planning(&planning.id)
        .await
        .expect("Failed to delete planning");
    assert!(!blob_file.exists());

    let records = SqliteDocumentStore::open(temp_dir.path().join("planning.db"))
        .await
        .unwrap();
    let ctx = TenantContext::new(TENANT, UNIT, USER);
    assert_eq!(records.count_under(&ctx.planning(&planning.id).unwrap()).await.unwrap(), 0);
    assert!(store.state().current_planning.is_none());
}

#[tokio::test]
async fn test_plannings_persist_across_stores() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planning = {
        let store = create_test_store(&temp_dir).await;
        store.create_planning(create_params("Persisted")).await.unwrap()
    };

    let store = create_test_store(&temp_dir).await;
    let plannings = store.list_plannings().await.unwrap();

    assert_eq!(plannings.len(), 1);
    assert_eq!(plannings[0].id, planning.id);
    assert_eq!(plannings[0].budget.map(|b| b.major()), Some(1500.5));
    assert_eq!(plannings[0].tags, BTreeSet::from(["maintenance".to_string()]));
}

#[tokio::test]
async fn test_units_are_isolated() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = create_test_store(&temp_dir).await;
    store.create_planning(create_params("Tower A only")).await.unwrap();

    let other_unit = PlanningStoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("planning.db")))
        .with_blob_dir(Some(temp_dir.path().join("blobs")))
        .with_resolver(Arc::new(SessionResolver::signed_in(TENANT, "tower-b", USER)))
        .build()
        .await
        .unwrap();

    assert!(other_unit.list_plannings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_builder_requires_resolver() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = PlanningStoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("planning.db")))
        .build()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_missing_task_reports_not_found() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = create_test_store(&temp_dir).await;
    let planning = store.create_planning(create_params("Garden")).await.unwrap();

    assert!(store
        .set_task_progress(&planning.id, "missing", 10)
        .await
        .is_none());
    let error = store.last_error().unwrap();
    assert_eq!(error.kind, ErrorKind::NotFound);
    assert!(error.message.contains("Task"));
}
