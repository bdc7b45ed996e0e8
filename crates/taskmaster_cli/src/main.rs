//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskmaster_core` linkage without the UI host.
//! - Print the stored task list, newest first, for quick local checks.

use std::process::ExitCode;
use taskmaster_core::{
    resolve_store_path, CategoryFilter, SortMode, SqliteStore, TaskRepository, TaskService,
};

fn main() -> ExitCode {
    println!("taskmaster_core ping={}", taskmaster_core::ping());
    println!("taskmaster_core version={}", taskmaster_core::core_version());

    let explicit = std::env::args().nth(1);
    let path = resolve_store_path(explicit.as_deref());
    let store = match SqliteStore::open(&path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open store at {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let service = TaskService::open(TaskRepository::new(store));
    let stats = service.stats();
    println!(
        "store={} source={} total={} completed={} pending={}",
        path.display(),
        service.load_source().as_str(),
        stats.total,
        stats.completed,
        stats.pending
    );

    let view = service.view("", CategoryFilter::All, SortMode::Newest);
    if view.is_empty() {
        println!("{}", taskmaster_core::empty_state_message("", CategoryFilter::All));
    }
    for task in view {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "[{mark}] {} {} {}",
            task.id,
            task.category.icon(),
            task.title
        );
    }
    ExitCode::SUCCESS
}
