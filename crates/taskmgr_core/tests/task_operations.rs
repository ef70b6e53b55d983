use taskmgr_core::{
    Counters, EmptyState, Filter, MemorySlotStore, NotificationCenter, PendingAction,
    ServiceError, Severity, SlotTaskRepository, TaskId, TaskService, TaskValidationError,
    ViewProjector, STORAGE_KEY,
};

type MemoryService<'a> = TaskService<SlotTaskRepository<&'a MemorySlotStore>, NotificationCenter>;

fn open(store: &MemorySlotStore) -> MemoryService<'_> {
    TaskService::open(SlotTaskRepository::new(store), NotificationCenter::new())
}

fn last_notification(service: &MemoryService<'_>) -> (String, Severity) {
    let last = service
        .notifier()
        .pending()
        .last()
        .expect("a notification should have been posted");
    (last.message.clone(), last.severity)
}

#[test]
fn add_to_empty_store_appends_active_task() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);

    let id = service.add("Buy milk").unwrap();

    assert_eq!(service.tasks().len(), 1);
    let task = &service.tasks()[0];
    assert_eq!(task.id, id);
    assert_eq!(task.text, "Buy milk");
    assert!(!task.completed);
    assert_eq!(
        service.counters(),
        Counters {
            total: 1,
            active: 1,
            completed: 0
        }
    );
    assert_eq!(
        last_notification(&service),
        ("Task added".to_string(), Severity::Success)
    );
}

#[test]
fn add_trims_text_before_storing() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);

    service.add("   call mom  ").unwrap();
    assert_eq!(service.tasks()[0].text, "call mom");
}

#[test]
fn short_text_is_rejected_with_warning_and_no_mutation() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    service.add("existing task").unwrap();

    let err = service.add(" ok ").unwrap_err();

    assert_eq!(
        err,
        ServiceError::Validation(TaskValidationError::TextTooShort { chars: 2 })
    );
    assert_eq!(service.tasks().len(), 1);
    let (message, severity) = last_notification(&service);
    assert_eq!(severity, Severity::Warning);
    assert!(message.contains("at least 3 characters"));
}

#[test]
fn empty_text_is_rejected_with_enter_a_task_warning() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);

    let err = service.add("   ").unwrap_err();

    assert_eq!(err, ServiceError::Validation(TaskValidationError::EmptyText));
    assert!(service.tasks().is_empty());
    assert_eq!(
        last_notification(&service),
        ("Please enter a task".to_string(), Severity::Warning)
    );
    assert_eq!(
        taskmgr_core::SlotStore::read_slot(&store, STORAGE_KEY).unwrap(),
        None
    );
}

#[test]
fn delete_requires_confirmation_and_cancel_keeps_task() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    let id = service.add("temporary").unwrap();

    let request = service.request_delete(id);
    assert_eq!(request.action(), PendingAction::DeleteOne(id));
    assert_eq!(service.tasks().len(), 1);

    service.cancel(request);
    assert_eq!(service.tasks().len(), 1);

    let request = service.request_delete(id);
    assert_eq!(service.confirm(request), 1);
    assert!(service.tasks().is_empty());
    assert_eq!(
        last_notification(&service),
        ("Task deleted".to_string(), Severity::Info)
    );
}

#[test]
fn confirming_delete_of_missing_task_is_noop() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    service.add("keep me").unwrap();
    let posted = service.notifier().pending().len();

    let request = service.request_delete(TaskId::new(999));
    assert_eq!(service.confirm(request), 0);

    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.notifier().pending().len(), posted);
}

#[test]
fn clear_completed_with_nothing_completed_skips_confirmation() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    service.add("still active").unwrap();

    assert!(service.request_clear_completed().is_none());
    assert_eq!(
        last_notification(&service),
        ("No completed tasks to delete".to_string(), Severity::Info)
    );
}

#[test]
fn clear_completed_removes_only_completed_tasks() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    let first = service.add("first task").unwrap();
    let second = service.add("second task").unwrap();
    let third = service.add("third task").unwrap();
    service.toggle_complete(first);
    service.toggle_complete(third);

    let request = service.request_clear_completed().unwrap();
    assert_eq!(request.prompt(), "Delete 2 completed task(s)?");
    assert_eq!(service.confirm(request), 2);

    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.tasks()[0].id, second);
    assert_eq!(
        service.counters(),
        Counters {
            total: 1,
            active: 1,
            completed: 0
        }
    );
    assert_eq!(
        last_notification(&service),
        ("2 task(s) deleted".to_string(), Severity::Success)
    );
}

#[test]
fn stale_clear_completed_request_removes_nothing() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    let id = service.add("flip flop").unwrap();
    service.toggle_complete(id);

    let request = service.request_clear_completed().unwrap();
    service.toggle_complete(id);

    assert_eq!(service.confirm(request), 0);
    assert_eq!(service.tasks().len(), 1);
}

#[test]
fn clear_all_on_empty_store_is_informational() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);

    assert!(service.request_clear_all().is_none());
    assert_eq!(
        last_notification(&service),
        ("No tasks to delete".to_string(), Severity::Info)
    );
}

#[test]
fn clear_all_empties_store_and_slot() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    service.add("one task").unwrap();
    service.add("two tasks").unwrap();

    let request = service.request_clear_all().unwrap();
    assert_eq!(request.action(), PendingAction::ClearAll { count: 2 });
    assert_eq!(service.confirm(request), 2);

    assert!(service.tasks().is_empty());
    assert_eq!(
        taskmgr_core::SlotStore::read_slot(&store, STORAGE_KEY)
            .unwrap()
            .as_deref(),
        Some("[]")
    );
}

#[test]
fn active_filter_on_fully_completed_store_shows_all_done() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    let id = service.add("only task").unwrap();
    service.toggle_complete(id);

    let mut projector = ViewProjector::new();
    projector.set_filter(Filter::Active);
    let view = projector.project(service.tasks());

    assert!(view.tasks.is_empty());
    assert_eq!(view.empty_state, Some(EmptyState::AllDone));
    assert_eq!(view.empty_state.map(EmptyState::title), Some("All tasks are done!"));
}

#[test]
fn filters_preserve_insertion_order() {
    let store = MemorySlotStore::new();
    let mut service = open(&store);
    let a = service.add("task a").unwrap();
    let b = service.add("task b").unwrap();
    let c = service.add("task c").unwrap();
    let d = service.add("task d").unwrap();
    service.toggle_complete(b);
    service.toggle_complete(d);

    let mut projector = ViewProjector::new();
    let ids = |projector: &ViewProjector| -> Vec<TaskId> {
        projector
            .project(service.tasks())
            .tasks
            .iter()
            .map(|task| task.id)
            .collect()
    };

    assert_eq!(ids(&projector), vec![a, b, c, d]);
    projector.set_filter(Filter::Active);
    assert_eq!(ids(&projector), vec![a, c]);
    projector.set_filter(Filter::Completed);
    assert_eq!(ids(&projector), vec![b, d]);
}
