use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

pub mod memory;
pub mod models;

pub use memory::MemoryExerciseStore;
pub use models::{Exercise, ExerciseFilter, StorageConfig, User};

/// Storage for the exercise tracker.
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    async fn create_user(&self, username: &str) -> Result<User>;

    /// All users in creation order.
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    /// Fails with `NotFound` when `exercise.user_id` is unknown.
    async fn add_exercise(&self, exercise: Exercise) -> Result<Exercise>;

    /// Exercises of one user in insertion order, filtered by `filter`.
    async fn exercises_for(&self, user_id: &str, filter: &ExerciseFilter)
    -> Result<Vec<Exercise>>;

    /// Removes every user together with their exercises.
    async fn delete_all_users(&self) -> Result<usize>;

    async fn delete_all_exercises(&self) -> Result<usize>;

    async fn count_users(&self) -> Result<usize>;

    fn backend_config(&self) -> StorageConfig;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create() -> Arc<dyn ExerciseStore> {
        Arc::new(MemoryExerciseStore::new())
    }
}
