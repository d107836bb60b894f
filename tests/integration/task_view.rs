//! Integration tests for the derived task views.
//!
//! Seeds real stores, fetches their contents and runs the filter, urgency
//! and summary derivations over them the way the board does.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::similar_names)]

use chrono::{DateTime, Duration, Utc};
use taskflow::store::{CategoryStore, Latency, Stores, TaskStore};
use taskflow::view::{
    DailySummary, FilterState, StatusFilter, Urgency, category_counts, filter_tasks,
    resolve_category, task_rows,
};
use taskflow_model::{CategoryDraft, CategoryId, Priority, Task, TaskDraft, TaskPatch};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn empty_stores() -> Stores {
    Stores::new(
        TaskStore::new(Latency::none()),
        CategoryStore::new(Latency::none()),
    )
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Seeds "Buy milk" (low, active) and "Ship release" (high, completed).
async fn seed_milk_and_release(stores: &Stores) -> (Task, Task) {
    let milk = stores
        .tasks
        .create(TaskDraft::new("Buy milk").with_priority(Priority::Low))
        .await;
    let release = stores
        .tasks
        .create(TaskDraft::new("Ship release").with_priority(Priority::High))
        .await;
    let release = stores
        .tasks
        .update(&release.id, TaskPatch::completion(true, Some(Utc::now())))
        .await
        .expect("complete release");
    (milk, release)
}

fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id.as_str().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn active_filter_yields_only_open_task() {
    let stores = empty_stores();
    let (milk, _) = seed_milk_and_release(&stores).await;
    let tasks = stores.tasks.get_all().await;

    let visible = filter_tasks(&tasks, &FilterState::new().with_status(StatusFilter::Active));
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0], &milk);
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let stores = empty_stores();
    let (_, release) = seed_milk_and_release(&stores).await;
    let tasks = stores.tasks.get_all().await;

    let visible = filter_tasks(&tasks, &FilterState::new().with_search("ship"));
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0], &release);

    let visible = filter_tasks(&tasks, &FilterState::new().with_search("SHIP"));
    assert_eq!(ids(&visible), vec![release.id.as_str().to_string()]);
}

#[tokio::test]
async fn search_matches_description() {
    let stores = empty_stores();
    let task = stores
        .tasks
        .create(TaskDraft::new("Errands").with_description("pick up Dry Cleaning"))
        .await;
    stores.tasks.create(TaskDraft::new("Other")).await;
    let tasks = stores.tasks.get_all().await;

    let visible = filter_tasks(&tasks, &FilterState::new().with_search("dry clean"));
    assert_eq!(ids(&visible), vec![task.id.as_str().to_string()]);
}

#[tokio::test]
async fn neutral_filter_returns_everything_in_order() {
    let stores = empty_stores();
    for i in 0..5 {
        stores.tasks.create(TaskDraft::new(format!("task {i}"))).await;
    }
    let tasks = stores.tasks.get_all().await;

    let visible = filter_tasks(&tasks, &FilterState::default());
    let expected: Vec<&Task> = tasks.iter().collect();
    assert_eq!(visible, expected);
}

#[tokio::test]
async fn filters_combine_with_and() {
    let stores = empty_stores();
    let work = stores.categories.create(CategoryDraft::new("Work")).await;
    let hit = stores
        .tasks
        .create(
            TaskDraft::new("Deploy api")
                .with_category(work.id.clone())
                .with_priority(Priority::High),
        )
        .await;
    stores
        .tasks
        .create(
            TaskDraft::new("Deploy docs")
                .with_category(work.id.clone())
                .with_priority(Priority::Low),
        )
        .await;
    stores
        .tasks
        .create(TaskDraft::new("Deploy blog").with_priority(Priority::High))
        .await;
    let tasks = stores.tasks.get_all().await;

    let filter = FilterState::new()
        .with_search("deploy")
        .with_category(work.id.clone())
        .with_priority(Priority::High)
        .with_status(StatusFilter::Active);
    let visible = filter_tasks(&tasks, &filter);
    assert_eq!(ids(&visible), vec![hit.id.as_str().to_string()]);
}

#[tokio::test]
async fn filtering_twice_is_stable() {
    let stores =
        Stores::from_fixtures(Default::default(), Latency::none()).expect("builtin fixtures");
    let tasks = stores.tasks.get_all().await;
    let filter = FilterState::new().with_status(StatusFilter::Active);

    let once: Vec<Task> = filter_tasks(&tasks, &filter).into_iter().cloned().collect();
    let twice = filter_tasks(&once, &filter);
    assert_eq!(twice, once.iter().collect::<Vec<_>>());
}

// ---------------------------------------------------------------------------
// Urgency and summary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn urgency_and_summary_over_store_contents() {
    let stores = empty_stores();
    let now = at("2024-06-12T12:00:00Z");
    let overdue = stores
        .tasks
        .create(TaskDraft::new("late").with_due_date(now - Duration::days(1)))
        .await;
    let today = stores
        .tasks
        .create(TaskDraft::new("today").with_due_date(at("2024-06-12T23:30:00Z")))
        .await;
    let tomorrow = stores
        .tasks
        .create(TaskDraft::new("later").with_due_date(now + Duration::days(1)))
        .await;
    let done_today = stores
        .tasks
        .create(TaskDraft::new("done").with_due_date(now))
        .await;
    stores
        .tasks
        .update(&done_today.id, TaskPatch::completion(true, Some(now)))
        .await
        .expect("complete");
    stores.tasks.create(TaskDraft::new("someday")).await;

    assert_eq!(
        Urgency::classify(overdue.due_date.as_ref(), &now),
        Urgency::Overdue
    );
    assert_eq!(Urgency::classify(today.due_date.as_ref(), &now), Urgency::Today);
    assert_eq!(
        Urgency::classify(tomorrow.due_date.as_ref(), &now),
        Urgency::None
    );

    let tasks = stores.tasks.get_all().await;
    let summary = DailySummary::compute(&tasks, &now);
    assert_eq!(
        summary,
        DailySummary {
            due_today: 1,
            overdue: 1,
            total: 5,
            completed: 1,
        }
    );
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_category_appears_with_generated_id() {
    let stores = empty_stores();
    let work = stores
        .categories
        .create(CategoryDraft::new("Work").with_color("#123456"))
        .await;

    assert!(!work.id.as_str().is_empty());
    assert_eq!(work.task_count, 0);
    assert_eq!(work.color, "#123456");
    let all = stores.categories.get_all().await;
    assert!(all.contains(&work));
}

#[tokio::test]
async fn deleted_category_is_unresolved_in_views() {
    let stores = empty_stores();
    let work = stores.categories.create(CategoryDraft::new("Work")).await;
    let task = stores
        .tasks
        .create(TaskDraft::new("filed").with_category(work.id.clone()))
        .await;

    stores.categories.delete(&work.id).await.expect("delete");

    let tasks = stores.tasks.get_all().await;
    let categories = stores.categories.get_all().await;
    assert_eq!(tasks, vec![task.clone()]);
    assert!(resolve_category(&tasks[0], &categories).is_none());

    let visible = filter_tasks(&tasks, &FilterState::default());
    let rows = task_rows(&visible, &categories, &Utc::now());
    assert_eq!(rows.len(), 1);
    assert!(rows[0].category.is_none());

    // Filtering by the vanished category still works on the raw reference.
    let by_old = filter_tasks(&tasks, &FilterState::new().with_category(work.id));
    assert_eq!(by_old.len(), 1);
}

#[tokio::test]
async fn live_counts_ignore_stored_task_count() {
    let stores =
        Stores::from_fixtures(Default::default(), Latency::none()).expect("builtin fixtures");
    let tasks = stores.tasks.get_all().await;
    let categories = stores.categories.get_all().await;

    let counts = category_counts(&tasks, &categories);
    assert_eq!(counts.len(), categories.len());
    for count in &counts {
        let expected = tasks
            .iter()
            .filter(|t| t.category_id.as_ref() == Some(&count.category.id))
            .count();
        assert_eq!(count.live_count, expected);
    }

    // New tasks show up in the live count immediately.
    let work_id = CategoryId::from("1");
    let before = counts
        .iter()
        .find(|c| c.category.id == work_id)
        .map(|c| c.live_count)
        .expect("work category");
    stores
        .tasks
        .create(TaskDraft::new("more work").with_category(work_id.clone()))
        .await;
    let tasks = stores.tasks.get_all().await;
    let after = category_counts(&tasks, &categories)
        .into_iter()
        .find(|c| c.category.id == work_id)
        .map(|c| c.live_count)
        .expect("work category");
    assert_eq!(after, before + 1);
}
