use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub user_id: String,
    pub description: String,
    /// 时长（分钟）
    pub duration: u32,
    pub date: NaiveDate,
}

/// 运动记录过滤条件
#[derive(Default, Clone, Debug)]
pub struct ExerciseFilter {
    /// date >= from
    pub from: Option<NaiveDate>,
    /// date <= to
    pub to: Option<NaiveDate>,
    /// 最多返回条数，None 表示不限
    pub limit: Option<usize>,
}

impl ExerciseFilter {
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.from.is_none_or(|from| exercise.date >= from)
            && self.to.is_none_or(|to| exercise.date <= to)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
