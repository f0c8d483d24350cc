//! User registration and log-in handlers.
//!
//! This module implements:
//! - POST /register - Store a new user with a hashed password
//! - POST /log-in - Check a username/password pair

use axum::Json;

use crate::{
    auth::password,
    error::{AppError, UserStoreError},
    extract::JsonBody,
    middleware::connection::RequestConnection,
    models::user::{LogInRequest, RegisterRequest, SuccessResponse, User},
};

/// Register a new user.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Request Body
///
/// ```json
/// {
///   "username": "driver",
///   "password": "hunter2",
///   "userIsAdmin": false
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{"success": true}`
/// - **Error (500)**: The body could not be read, hashing failed or the
///   insert was rejected (for example a duplicate username); `details`
///   carries the cause
pub async fn register(
    conn: RequestConnection,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let hashed = password::hash_password(request.password)
        .await
        .map_err(|err| AppError::Registration(err.into()))?;

    let mut conn = conn.lock().await?;
    let result = sqlx::query(
        r#"
        INSERT INTO `user` (user_name, password, admin_flag)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&request.username)
    .bind(hashed)
    .bind(request.user_is_admin)
    .execute(&mut *conn)
    .await
    .map_err(|err| AppError::Registration(err.into()))?;

    tracing::info!(
        user_id = result.last_insert_id(),
        username = %request.username,
        admin = request.user_is_admin,
        "user registered"
    );

    Ok(Json(SuccessResponse::ok()))
}

/// Log a user in.
///
/// # Endpoint
///
/// `POST /log-in`
///
/// # Response
///
/// - **Success (200 OK)**: `{"success": true}`
/// - **Error (404)**: `{"error": "Username not found"}`
/// - **Error (401)**: `{"error": "Password is wrong"}`
/// - **Error (500)**: Unreadable body, or lookup or hash comparison failed
pub async fn log_in(
    conn: RequestConnection,
    JsonBody(request): JsonBody<LogInRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = {
        let mut conn = conn.lock().await?;
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, password, admin_flag
            FROM `user`
            WHERE user_name = ?
            "#,
        )
        .bind(&request.username)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| AppError::LogIn(err.into()))?
        .ok_or(AppError::UsernameNotFound)?
    };

    let matches = password::verify_password(request.password, user.password)
        .await
        .map_err(|err| AppError::LogIn(UserStoreError::from(err)))?;

    if !matches {
        return Err(AppError::WrongPassword);
    }

    tracing::info!(user_id = user.id, username = %user.user_name, "user logged in");
    Ok(Json(SuccessResponse::ok()))
}
