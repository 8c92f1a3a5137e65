use std::sync::Arc;

use actix_web::{Either, HttpResponse, web};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::services::{ExerciseService, LogQuery};

/// 表单中的标量值：form 提交均为字符串，JSON 可能是数字
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddExerciseForm {
    pub description: Option<String>,
    pub duration: Option<Scalar>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

type FormOrJson<T> = Either<web::Form<T>, web::Json<T>>;

fn into_inner<T>(body: FormOrJson<T>) -> T {
    match body {
        Either::Left(f) => f.into_inner(),
        Either::Right(j) => j.into_inner(),
    }
}

pub struct ExerciseHandlers;

impl ExerciseHandlers {
    pub async fn create_user(
        body: FormOrJson<CreateUserForm>,
        service: web::Data<Arc<ExerciseService>>,
    ) -> Result<HttpResponse, AppError> {
        let form = into_inner(body);
        let user = service
            .create_user(form.username.as_deref().unwrap_or_default())
            .await?;
        Ok(HttpResponse::Ok().json(user))
    }

    pub async fn list_users(
        service: web::Data<Arc<ExerciseService>>,
    ) -> Result<HttpResponse, AppError> {
        Ok(HttpResponse::Ok().json(service.list_users().await?))
    }

    pub async fn add_exercise(
        path: web::Path<String>,
        body: FormOrJson<AddExerciseForm>,
        service: web::Data<Arc<ExerciseService>>,
    ) -> Result<HttpResponse, AppError> {
        let user_id = path.into_inner();
        let form = into_inner(body);

        let duration = form.duration.map(Scalar::into_string).unwrap_or_default();
        let exercise = service
            .add_exercise(
                &user_id,
                form.description.as_deref().unwrap_or_default(),
                &duration,
                form.date.as_deref(),
            )
            .await?;
        Ok(HttpResponse::Ok().json(exercise))
    }

    pub async fn get_log(
        path: web::Path<String>,
        query: web::Query<LogQueryParams>,
        service: web::Data<Arc<ExerciseService>>,
    ) -> Result<HttpResponse, AppError> {
        let user_id = path.into_inner();
        let params = query.into_inner();
        let log = service
            .log(
                &user_id,
                &LogQuery {
                    from: params.from,
                    to: params.to,
                    limit: params.limit,
                },
            )
            .await?;
        Ok(HttpResponse::Ok().json(log))
    }

    pub async fn delete_all_users(
        service: web::Data<Arc<ExerciseService>>,
    ) -> Result<HttpResponse, AppError> {
        info!("Exercise API: delete all users request");
        let deleted = service.delete_all_users().await?;
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "All users have been deleted!",
            "deleted": deleted,
        })))
    }

    pub async fn delete_all_exercises(
        service: web::Data<Arc<ExerciseService>>,
    ) -> Result<HttpResponse, AppError> {
        info!("Exercise API: delete all exercises request");
        let deleted = service.delete_all_exercises().await?;
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "All exercises have been deleted!",
            "deleted": deleted,
        })))
    }
}

/// Exercise tracker 路由配置
///
/// `/api/users/delete` 必须在 `/api/users/{id}/...` 之前注册。
pub fn exercise_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("", web::get().to(ExerciseHandlers::list_users))
            .route("", web::post().to(ExerciseHandlers::create_user))
            .route("/delete", web::get().to(ExerciseHandlers::delete_all_users))
            .route(
                "/{user_id}/exercises",
                web::post().to(ExerciseHandlers::add_exercise),
            )
            .route("/{user_id}/logs", web::get().to(ExerciseHandlers::get_log)),
    )
    .route(
        "/api/exercises/delete",
        web::get().to(ExerciseHandlers::delete_all_exercises),
    );
}
