//! Exercise tracker service
//!
//! Turns raw request fields into store calls and shapes the results the
//! way the HTTP layer returns them.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{AppError, Result};
use crate::storage::{Exercise, ExerciseFilter, ExerciseStore, User};

/// Input date format (`YYYY-MM-DD`)
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Output date format, e.g. `Mon Jan 01 1990`
pub const DATE_OUTPUT_FORMAT: &str = "%a %b %d %Y";

// ============ Response DTOs ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            id: user.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub description: String,
    pub duration: u32,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: u32,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

/// Raw log query parameters (all optional strings)
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

pub struct ExerciseService {
    store: Arc<dyn ExerciseStore>,
}

impl ExerciseService {
    pub fn new(store: Arc<dyn ExerciseStore>) -> Self {
        Self { store }
    }

    pub async fn create_user(&self, username: &str) -> Result<UserResponse> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::validation("username is required"));
        }

        let user = self.store.create_user(username).await?;
        info!("Created user {} ({})", user.username, user.id);
        Ok(user.into())
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn add_exercise(
        &self,
        user_id: &str,
        description: &str,
        duration: &str,
        date: Option<&str>,
    ) -> Result<ExerciseResponse> {
        let user = self.require_user(user_id).await?;

        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::validation("description is required"));
        }

        let duration = parse_duration(duration)?;
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => parse_date(d, "date")?,
            None => Utc::now().date_naive(),
        };

        let exercise = self
            .store
            .add_exercise(Exercise {
                user_id: user.id.clone(),
                description: description.to_string(),
                duration,
                date,
            })
            .await?;

        debug!(
            "Added exercise '{}' ({} min) for {}",
            exercise.description, exercise.duration, user.id
        );

        Ok(ExerciseResponse {
            id: user.id,
            username: user.username,
            description: exercise.description,
            duration: exercise.duration,
            date: format_date(exercise.date),
        })
    }

    pub async fn log(&self, user_id: &str, query: &LogQuery) -> Result<LogResponse> {
        let user = self.require_user(user_id).await?;
        let filter = parse_filter(query)?;

        let log: Vec<LogEntry> = self
            .store
            .exercises_for(&user.id, &filter)
            .await?
            .into_iter()
            .map(|e| LogEntry {
                description: e.description,
                duration: e.duration,
                date: format_date(e.date),
            })
            .collect();

        Ok(LogResponse {
            id: user.id,
            username: user.username,
            count: log.len(),
            log,
        })
    }

    pub async fn delete_all_users(&self) -> Result<usize> {
        let deleted = self.store.delete_all_users().await?;
        info!("Deleted {} users", deleted);
        Ok(deleted)
    }

    pub async fn delete_all_exercises(&self) -> Result<usize> {
        let deleted = self.store.delete_all_exercises().await?;
        info!("Deleted {} exercises", deleted);
        Ok(deleted)
    }

    pub async fn count_users(&self) -> Result<usize> {
        self.store.count_users().await
    }

    pub fn backend_name(&self) -> String {
        self.store.backend_config().storage_type
    }

    async fn require_user(&self, user_id: &str) -> Result<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_OUTPUT_FORMAT).to_string()
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT).map_err(|_| {
        AppError::validation(format!("{} must be a YYYY-MM-DD date, got '{}'", field, raw))
    })
}

fn parse_duration(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(d) if d > 0 => Ok(d),
        _ => Err(AppError::validation(format!(
            "duration must be a positive integer, got '{}'",
            raw
        ))),
    }
}

fn parse_filter(query: &LogQuery) -> Result<ExerciseFilter> {
    fn present(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    let from = present(&query.from)
        .map(|d| parse_date(d, "from"))
        .transpose()?;
    // 未指定 to 时截止到今天，未来日期的记录不出现在日志里
    let to = match present(&query.to) {
        Some(d) => parse_date(d, "to")?,
        None => Utc::now().date_naive(),
    };
    let limit = match present(&query.limit) {
        Some(raw) => {
            let n: usize = raw.parse().map_err(|_| {
                AppError::validation(format!("limit must be a non-negative integer, got '{}'", raw))
            })?;
            // 0 表示不限
            (n > 0).then_some(n)
        }
        None => None,
    };

    Ok(ExerciseFilter {
        from,
        to: Some(to),
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryExerciseStore;

    fn service() -> ExerciseService {
        ExerciseService::new(Arc::new(MemoryExerciseStore::new()))
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(format_date(d), "Mon Jan 01 1990");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("60").unwrap(), 60);
        assert_eq!(parse_duration(" 5 ").unwrap(), 5);
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("-3").is_err());
        assert!(parse_duration("ten").is_err());
    }

    #[test]
    fn test_parse_filter_limit_zero_is_unlimited() {
        let filter = parse_filter(&LogQuery {
            limit: Some("0".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.limit, None);

        assert!(
            parse_filter(&LogQuery {
                from: Some("01/02/2024".to_string()),
                ..Default::default()
            })
            .is_err()
        );
    }

    #[tokio::test]
    async fn test_create_user_requires_name() {
        let service = service();
        assert!(matches!(
            service.create_user("   ").await,
            Err(AppError::Validation(_))
        ));
        let user = service.create_user(" alice ").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_add_exercise_and_log() {
        let service = service();
        let user = service.create_user("bob").await.unwrap();

        let added = service
            .add_exercise(&user.id, "pushups", "15", Some("2024-03-10"))
            .await
            .unwrap();
        assert_eq!(added.date, "Sun Mar 10 2024");
        assert_eq!(added.id, user.id);

        service
            .add_exercise(&user.id, "run", "30", Some("2024-04-01"))
            .await
            .unwrap();

        let log = service
            .log(
                &user.id,
                &LogQuery {
                    from: Some("2024-03-01".to_string()),
                    to: Some("2024-03-31".to_string()),
                    limit: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(log.count, 1);
        assert_eq!(log.log[0].description, "pushups");
    }

    #[tokio::test]
    async fn test_add_exercise_defaults_date_to_today() {
        let service = service();
        let user = service.create_user("carol").await.unwrap();
        let added = service
            .add_exercise(&user.id, "yoga", "20", None)
            .await
            .unwrap();
        assert_eq!(added.date, format_date(Utc::now().date_naive()));
    }

    #[test]
    fn test_parse_filter_to_defaults_to_today() {
        let filter = parse_filter(&LogQuery::default()).unwrap();
        assert_eq!(filter.to, Some(Utc::now().date_naive()));
        assert_eq!(filter.from, None);
    }

    #[tokio::test]
    async fn test_log_excludes_future_without_to() {
        let service = service();
        let user = service.create_user("dave").await.unwrap();
        let tomorrow = (Utc::now().date_naive() + chrono::Days::new(1))
            .format(DATE_INPUT_FORMAT)
            .to_string();

        service
            .add_exercise(&user.id, "past", "10", Some("2020-01-01"))
            .await
            .unwrap();
        service
            .add_exercise(&user.id, "planned", "10", Some(tomorrow.as_str()))
            .await
            .unwrap();

        let log = service.log(&user.id, &LogQuery::default()).await.unwrap();
        assert_eq!(log.count, 1);
        assert_eq!(log.log[0].description, "past");

        let log = service
            .log(
                &user.id,
                &LogQuery {
                    to: Some(tomorrow),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(log.count, 2);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let service = service();
        assert!(matches!(
            service.add_exercise("nobody", "run", "10", None).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.log("nobody", &LogQuery::default()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
