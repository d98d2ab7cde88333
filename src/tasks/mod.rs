// Remote task service access and the migration engine

pub mod api;
pub mod migrate;
pub mod models;

pub use api::{GoogleTasksClient, TasksApi};
pub use migrate::{migrate, MigrationReport, MoveOutcome};
pub use models::{Task, TaskList, TaskStatus};
