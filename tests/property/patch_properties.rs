//! Property-based tests for task and category patches.
//!
//! Uses proptest to verify:
//! 1. An empty patch changes nothing.
//! 2. Set fields win over the base record; unset fields keep it.
//! 3. `id` and `created_at` survive any patch.
//! 4. Setting `completed` alone never touches `completed_at`.

#![allow(clippy::expect_used)]

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use taskflow_model::{
    Category, CategoryDraft, CategoryId, CategoryPatch, Priority, Task, TaskDraft, TaskId,
    TaskPatch,
};

// --- Strategies ---

fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000).prop_map(|secs| DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(secs))
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        "[a-z]{1,8}",
        ".{0,16}",
        ".{0,32}",
        prop::option::of("[0-9]{1,3}"),
        arb_priority(),
        prop::option::of(arb_time()),
        any::<bool>(),
        arb_time(),
        prop::option::of(arb_time()),
    )
        .prop_map(
            |(id, title, description, category, priority, due, completed, created, done_at)| {
                let mut draft = TaskDraft::new(title)
                    .with_description(description)
                    .with_priority(priority);
                if let Some(category) = category {
                    draft = draft.with_category(CategoryId::from(category));
                }
                if let Some(due) = due {
                    draft = draft.with_due_date(due);
                }
                let mut task = draft.into_task(TaskId::from(id), created);
                task.completed = completed;
                task.completed_at = done_at;
                task
            },
        )
}

fn arb_task_patch() -> impl Strategy<Value = TaskPatch> {
    (
        prop::option::of(".{0,16}"),
        prop::option::of(".{0,32}"),
        prop::option::of(prop::option::of("[0-9]{1,3}".prop_map(CategoryId::from))),
        prop::option::of(arb_priority()),
        prop::option::of(prop::option::of(arb_time())),
        prop::option::of(any::<bool>()),
        prop::option::of(prop::option::of(arb_time())),
    )
        .prop_map(
            |(title, description, category_id, priority, due_date, completed, completed_at)| {
                TaskPatch {
                    title,
                    description,
                    category_id,
                    priority,
                    due_date,
                    completed,
                    completed_at,
                }
            },
        )
}

fn arb_category() -> impl Strategy<Value = Category> {
    ("[a-z]{1,8}", ".{0,16}", "#[0-9A-F]{6}", 0u32..100).prop_map(|(id, name, color, count)| {
        let mut category = CategoryDraft::new(name)
            .with_color(color)
            .into_category(CategoryId::from(id));
        category.task_count = count;
        category
    })
}

fn arb_category_patch() -> impl Strategy<Value = CategoryPatch> {
    (
        prop::option::of(".{0,16}"),
        prop::option::of("#[0-9A-F]{6}"),
        prop::option::of(0u32..100),
    )
        .prop_map(|(name, color, task_count)| CategoryPatch {
            name,
            color,
            task_count,
        })
}

// --- Properties ---

proptest! {
    #[test]
    fn empty_task_patch_is_identity(task in arb_task()) {
        let patch = TaskPatch::default();
        prop_assert!(patch.is_empty());
        let mut patched = task.clone();
        patch.apply_to(&mut patched);
        prop_assert_eq!(patched, task);
    }

    #[test]
    fn task_patch_overrides_only_set_fields(task in arb_task(), patch in arb_task_patch()) {
        let mut patched = task.clone();
        patch.clone().apply_to(&mut patched);

        prop_assert_eq!(&patched.id, &task.id);
        prop_assert_eq!(patched.created_at, task.created_at);
        prop_assert_eq!(&patched.title, patch.title.as_ref().unwrap_or(&task.title));
        prop_assert_eq!(
            &patched.description,
            patch.description.as_ref().unwrap_or(&task.description)
        );
        prop_assert_eq!(
            &patched.category_id,
            patch.category_id.as_ref().unwrap_or(&task.category_id)
        );
        prop_assert_eq!(patched.priority, patch.priority.unwrap_or(task.priority));
        prop_assert_eq!(patched.due_date, patch.due_date.unwrap_or(task.due_date));
        prop_assert_eq!(patched.completed, patch.completed.unwrap_or(task.completed));
        prop_assert_eq!(
            patched.completed_at,
            patch.completed_at.unwrap_or(task.completed_at)
        );
    }

    #[test]
    fn completed_flag_alone_keeps_timestamp(task in arb_task(), completed in any::<bool>()) {
        let mut patched = task.clone();
        TaskPatch { completed: Some(completed), ..TaskPatch::default() }.apply_to(&mut patched);
        prop_assert_eq!(patched.completed, completed);
        prop_assert_eq!(patched.completed_at, task.completed_at);
    }

    #[test]
    fn empty_category_patch_is_identity(category in arb_category()) {
        let mut patched = category.clone();
        CategoryPatch::default().apply_to(&mut patched);
        prop_assert_eq!(patched, category);
    }

    #[test]
    fn category_patch_overrides_only_set_fields(
        category in arb_category(),
        patch in arb_category_patch()
    ) {
        let mut patched = category.clone();
        patch.clone().apply_to(&mut patched);
        prop_assert_eq!(&patched.id, &category.id);
        prop_assert_eq!(&patched.name, patch.name.as_ref().unwrap_or(&category.name));
        prop_assert_eq!(&patched.color, patch.color.as_ref().unwrap_or(&category.color));
        prop_assert_eq!(patched.task_count, patch.task_count.unwrap_or(category.task_count));
    }

    #[test]
    fn tasks_survive_json(task in arb_task()) {
        let json = serde_json::to_string(&task).expect("encode");
        let back: Task = serde_json::from_str(&json).expect("decode");
        prop_assert_eq!(back, task);
    }
}
