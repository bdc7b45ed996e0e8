use taskmaster_core::store::TASKS_KEY;
use taskmaster_core::{
    Category, CategoryFilter, KeyValueStore, LoadSource, MemoryStore, SortMode, TaskRepository,
    TaskService, TaskServiceError,
};

fn open(store: &MemoryStore) -> TaskService<MemoryStore> {
    TaskService::open(TaskRepository::new(store.clone()))
}

fn stored_ids(store: &MemoryStore) -> Vec<i64> {
    let raw = store.get(TASKS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json.as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn first_run_seeds_and_persists_sample_tasks() {
    let store = MemoryStore::new();
    let service = open(&store);

    assert_eq!(service.load_source(), LoadSource::SeededMissing);
    assert_eq!(stored_ids(&store), vec![1, 2, 3]);

    let newest = service.view("", CategoryFilter::All, SortMode::Newest);
    assert_eq!(
        newest.iter().map(|task| task.id).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );

    let trash = service.view("trash", CategoryFilter::All, SortMode::Newest);
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].title, "Use the trash icon to delete");
    assert!(trash[0].completed);
    assert_eq!(trash[0].category, Category::Urgent);
}

#[test]
fn add_trims_and_appears_exactly_once() {
    let store = MemoryStore::new();
    let mut service = open(&store);

    for title in ["  Buy groceries ", "file taxes", "Call  mom"] {
        let task = service.add(title, Category::Personal).unwrap();
        let matches: Vec<_> = service
            .view("", CategoryFilter::All, SortMode::Newest)
            .into_iter()
            .filter(|candidate| candidate.title == title.trim())
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, task.id);
        assert!(!matches[0].completed);
    }
    assert_eq!(stored_ids(&store).len(), 6);
}

#[test]
fn duplicate_title_is_rejected_without_growth() {
    let store = MemoryStore::new();
    let mut service = open(&store);
    service.add("Write report", Category::Work).unwrap();
    let before = service.len();

    let err = service.add("  WRITE report ", Category::Urgent).unwrap_err();
    assert!(matches!(err, TaskServiceError::DuplicateTitle(title) if title == "WRITE report"));
    assert_eq!(service.len(), before);
    assert_eq!(stored_ids(&store).len(), before);
}

#[test]
fn empty_title_is_rejected() {
    let mut service = open(&MemoryStore::new());
    let err = service.add("   ", Category::Work).unwrap_err();
    assert!(matches!(err, TaskServiceError::EmptyTitle));
    assert_eq!(service.len(), 3);
}

#[test]
fn delete_missing_id_is_noop() {
    let store = MemoryStore::new();
    let mut service = open(&store);
    let before = service.tasks().to_vec();

    assert!(!service.delete(987_654).unwrap());
    assert_eq!(service.tasks(), before.as_slice());

    assert!(service.delete(2).unwrap());
    assert!(!service.delete(2).unwrap());
    assert_eq!(stored_ids(&store), vec![1, 3]);
}

#[test]
fn double_toggle_restores_completion() {
    let store = MemoryStore::new();
    let mut service = open(&store);

    for id in [1, 3] {
        let original = service.get(id).unwrap().completed;
        assert_eq!(service.toggle_complete(id).unwrap(), Some(!original));
        assert_eq!(service.toggle_complete(id).unwrap(), Some(original));
        assert_eq!(service.get(id).unwrap().completed, original);
    }
    assert_eq!(service.toggle_complete(555).unwrap(), None);
}

#[test]
fn toggle_is_persisted_immediately() {
    let store = MemoryStore::new();
    {
        let mut service = open(&store);
        service.toggle_complete(1).unwrap();
    }
    let reopened = open(&store);
    assert_eq!(reopened.load_source(), LoadSource::Stored);
    assert!(reopened.get(1).unwrap().completed);
}

#[test]
fn empty_category_filter_yields_nothing_for_any_term() {
    let mut service = open(&MemoryStore::new());
    service.delete(3).unwrap();

    for term in ["", "trash", "welcome", "zzz"] {
        let view = service.view(term, CategoryFilter::Only(Category::Urgent), SortMode::Newest);
        assert!(view.is_empty(), "term `{term}` should match nothing");
    }
}

#[test]
fn view_never_reorders_collection() {
    let mut service = open(&MemoryStore::new());
    service.add_at("zebra", Category::Work, 10).unwrap();
    let before = service.tasks().to_vec();

    let _ = service.view("", CategoryFilter::All, SortMode::Alphabetical);
    let _ = service.view("", CategoryFilter::All, SortMode::Newest);
    assert_eq!(service.tasks(), before.as_slice());
}

#[test]
fn failed_save_surfaces_error_but_keeps_change() {
    let store = MemoryStore::new();
    let mut service = open(&store);
    store.set_reject_writes(true);

    let err = service.add("offline task", Category::Work).unwrap_err();
    assert!(matches!(err, TaskServiceError::Repo(_)));
    assert_eq!(service.len(), 4);
    assert_eq!(stored_ids(&store).len(), 3);

    store.set_reject_writes(false);
    service.toggle_complete(1).unwrap();
    assert_eq!(stored_ids(&store).len(), 4);
}

#[test]
fn unreadable_store_is_not_overwritten_by_seed() {
    let document = r#"[{"id":100,"title":"my real task","completed":false,"category":"Work"}]"#;
    let store = MemoryStore::with_entries([(TASKS_KEY, document)]);
    store.set_reject_reads(true);

    let service = open(&store);
    assert_eq!(service.load_source(), LoadSource::SeededUnavailable);
    assert_eq!(service.len(), 3);

    store.set_reject_reads(false);
    assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some(document));
    assert_eq!(open(&store).get(100).unwrap().title, "my real task");
}
