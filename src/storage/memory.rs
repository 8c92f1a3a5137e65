//! In-memory exercise store
//!
//! Contents live for the lifetime of the process.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::models::{Exercise, ExerciseFilter, StorageConfig, User};
use super::ExerciseStore;
use crate::errors::{AppError, Result};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    exercises: Vec<Exercise>,
}

#[derive(Default)]
pub struct MemoryExerciseStore {
    state: RwLock<MemoryState>,
}

impl MemoryExerciseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExerciseStore for MemoryExerciseStore {
    async fn create_user(&self, username: &str) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
        };
        self.state.write().users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.state.read().users.clone())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.state.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn add_exercise(&self, exercise: Exercise) -> Result<Exercise> {
        let mut state = self.state.write();
        if !state.users.iter().any(|u| u.id == exercise.user_id) {
            return Err(AppError::not_found("User not found"));
        }
        state.exercises.push(exercise.clone());
        Ok(exercise)
    }

    async fn exercises_for(
        &self,
        user_id: &str,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>> {
        let state = self.state.read();
        let matching = state
            .exercises
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn delete_all_users(&self) -> Result<usize> {
        let mut state = self.state.write();
        let deleted = state.users.len();
        state.users.clear();
        state.exercises.clear();
        Ok(deleted)
    }

    async fn delete_all_exercises(&self) -> Result<usize> {
        let mut state = self.state.write();
        let deleted = state.exercises.len();
        state.exercises.clear();
        Ok(deleted)
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.state.read().users.len())
    }

    fn backend_config(&self) -> StorageConfig {
        StorageConfig {
            storage_type: "memory".to_string(),
        }
    }
}
