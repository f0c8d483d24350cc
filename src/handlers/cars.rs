//! Car inventory HTTP handlers.
//!
//! This module implements the car endpoints:
//! - GET /car - List cars that are not deleted
//! - POST /car - Create a car
//! - PUT /car - Update a car's make, model and year
//! - DELETE /car/{id} - Soft-delete a car

use axum::Json;

use crate::{
    error::AppError,
    extract::{CarId, JsonBody},
    middleware::connection::RequestConnection,
    models::{
        car::{Car, CarListResponse, CarResponse, CreateCarRequest, UpdateCarRequest},
        user::SuccessResponse,
    },
};

/// List every car whose `deleted_flag` is unset.
///
/// # Response
///
/// - **Success (200 OK)**: `{"cars": [...]}`, possibly empty
/// - **Error (500)**: Database error
///
/// ```json
/// {
///   "cars": [
///     {
///       "id": 1,
///       "make": "Toyota",
///       "model": "Corolla",
///       "year": 2020,
///       "date_created": "2025-01-15T10:30:00",
///       "deleted_flag": false
///     }
///   ]
/// }
/// ```
pub async fn list_cars(
    conn: RequestConnection,
) -> Result<Json<CarListResponse>, AppError> {
    let mut conn = conn.lock().await?;
    let cars = sqlx::query_as::<_, Car>(
        r#"
        SELECT id, make, model, year, date_created, deleted_flag
        FROM cars
        WHERE deleted_flag = 0
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(Json(CarListResponse { cars }))
}

/// Create a car.
///
/// # Request Body
///
/// ```json
/// { "make": "Toyota", "model": "Corolla", "year": 2020 }
/// ```
///
/// # Database Operation
///
/// Inserts a row with `date_created = NOW()` and `deleted_flag = 0`.
/// The response carries the generated id and echoes the request fields.
pub async fn create_car(
    conn: RequestConnection,
    JsonBody(request): JsonBody<CreateCarRequest>,
) -> Result<Json<CarResponse>, AppError> {
    let mut conn = conn.lock().await?;
    let result = sqlx::query(
        r#"
        INSERT INTO cars (make, model, year, date_created, deleted_flag)
        VALUES (?, ?, ?, NOW(), 0)
        "#,
    )
    .bind(&request.make)
    .bind(&request.model)
    .bind(request.year)
    .execute(&mut *conn)
    .await?;

    Ok(Json(CarResponse::created(result.last_insert_id(), request)))
}

/// Update a car's make, model and year.
///
/// # Request Body
///
/// ```json
/// { "id": 1, "make": "Toyota", "model": "Corolla", "year": 2021 }
/// ```
///
/// Echoes the request. An unknown id is not an error; nothing is updated.
pub async fn update_car(
    conn: RequestConnection,
    JsonBody(request): JsonBody<UpdateCarRequest>,
) -> Result<Json<CarResponse>, AppError> {
    let mut conn = conn.lock().await?;
    let updated = sqlx::query(
        r#"
        UPDATE cars
        SET make = ?, model = ?, year = ?
        WHERE id = ?
        "#,
    )
    .bind(&request.make)
    .bind(&request.model)
    .bind(request.year)
    .bind(request.id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if updated == 0 {
        tracing::debug!(car_id = request.id, "car update matched no changed row");
    }

    Ok(Json(request.into()))
}

/// Soft-delete a car.
///
/// # URL Parameters
///
/// - `id` - id of the car to delete; a non-numeric id fails with 500
///
/// # Process
///
/// Sets `deleted_flag = 1`; the row is kept. An unknown id is not an error.
pub async fn delete_car(
    conn: RequestConnection,
    CarId(car_id): CarId,
) -> Result<Json<SuccessResponse>, AppError> {
    let mut conn = conn.lock().await?;
    let deleted = sqlx::query("UPDATE cars SET deleted_flag = 1 WHERE id = ?")
        .bind(car_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if deleted == 0 {
        tracing::debug!(car_id, "car delete matched no changed row");
    }

    Ok(Json(SuccessResponse::ok()))
}
