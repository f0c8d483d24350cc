//! Car data models and API request/response types.
//!
//! This module defines:
//! - `Car`: Database entity representing a row of the `cars` table
//! - `CreateCarRequest` / `UpdateCarRequest`: Request bodies
//! - `CarListResponse` / `CarResponse`: Response bodies returned to clients

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Represents a car record from the database.
///
/// # Database Table
///
/// Maps to the `cars` table. Rows are never physically removed:
/// deleting a car sets `deleted_flag` and listing skips flagged rows.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Car {
    /// Auto-increment identifier
    pub id: u64,

    pub make: String,

    pub model: String,

    pub year: i32,

    /// Insert time in the session time zone
    pub date_created: NaiveDateTime,

    /// Soft-delete marker
    pub deleted_flag: bool,
}

/// Request body for creating a new car.
///
/// # JSON Example
///
/// ```json
/// {
///   "make": "Toyota",
///   "model": "Corolla",
///   "year": 2020
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCarRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// Request body for updating an existing car.
///
/// All three fields are written; send the current values for the fields
/// that should stay unchanged.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "make": "Toyota",
///   "model": "Corolla",
///   "year": 2021
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCarRequest {
    pub id: u64,
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// Response body for `GET /car`.
#[derive(Debug, Serialize)]
pub struct CarListResponse {
    pub cars: Vec<Car>,
}

/// Response body for car create and update.
///
/// Echoes the written fields alongside the row id.
///
/// ```json
/// {
///   "id": 1,
///   "make": "Toyota",
///   "model": "Corolla",
///   "year": 2020,
///   "success": true
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: u64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub success: bool,
}

impl CarResponse {
    pub fn created(id: u64, request: CreateCarRequest) -> Self {
        Self {
            id,
            make: request.make,
            model: request.model,
            year: request.year,
            success: true,
        }
    }
}

impl From<UpdateCarRequest> for CarResponse {
    fn from(request: UpdateCarRequest) -> Self {
        Self {
            id: request.id,
            make: request.make,
            model: request.model,
            year: request.year,
            success: true,
        }
    }
}
