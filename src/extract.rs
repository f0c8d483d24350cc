//! Request extractors whose rejections go through [`AppError`].
//!
//! axum's own `Json` and `Path` extractors answer malformed input with a
//! plain-text 4xx that bypasses the JSON error body and the error log. The
//! wrappers here run the same extraction and turn the rejection into the
//! route's own error instead.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, InputError, UserStoreError},
    middleware::connection::RequestConnection,
    models::{
        car::{CreateCarRequest, UpdateCarRequest},
        user::{LogInRequest, RegisterRequest},
    },
};

/// A JSON request body that knows which error its route reports when the
/// body cannot be read.
pub trait RequestBody: DeserializeOwned {
    fn rejected(err: InputError) -> AppError {
        AppError::InvalidInput(err)
    }
}

impl RequestBody for RegisterRequest {
    fn rejected(err: InputError) -> AppError {
        AppError::Registration(UserStoreError::Input(err))
    }
}

impl RequestBody for LogInRequest {
    fn rejected(err: InputError) -> AppError {
        AppError::LogIn(UserStoreError::Input(err))
    }
}

impl RequestBody for CreateCarRequest {}

impl RequestBody for UpdateCarRequest {}

/// `Json<T>` with rejections mapped by [`RequestBody::rejected`].
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: RequestBody,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(request, state)
            .await
            .map_err(|err| T::rejected(err.into()))?;
        Ok(Self(body))
    }
}

/// The numeric `{id}` segment of a car route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarId(pub u64);

impl<S> FromRequestParts<S> for CarId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<u64>::from_request_parts(parts, state)
            .await
            .map_err(InputError::from)?;
        Ok(Self(id))
    }
}

/// Handlers take the request's connection as a plain argument.
///
/// Fails with `AppError::ConnectionUnavailable` when the route is not
/// wrapped by the connection middleware.
impl<S> FromRequestParts<S> for RequestConnection
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestConnection>()
            .cloned()
            .ok_or(AppError::ConnectionUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{self, StatusCode},
        response::IntoResponse,
        routing::{delete, get},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn json_request(body: &'static str) -> Request {
        http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn error_json(err: AppError) -> (StatusCode, Value) {
        response_json(err.into_response()).await
    }

    async fn response_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn malformed_register_body_is_a_registration_failure() {
        let err = JsonBody::<RegisterRequest>::from_request(json_request(r#"{"username": 1}"#), &())
            .await
            .unwrap_err();

        let (status, body) = error_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Registration failed");
        assert!(!body["details"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn log_in_body_without_content_type_is_a_log_in_failure() {
        let request = http::Request::builder()
            .method("POST")
            .body(Body::from(r#"{"username":"a","password":"b"}"#))
            .unwrap();

        let err = JsonBody::<LogInRequest>::from_request(request, &())
            .await
            .unwrap_err();

        let (status, body) = error_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Log-in failed");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn malformed_car_body_is_an_internal_error_with_details() {
        let err = JsonBody::<CreateCarRequest>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        let (status, body) = error_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let JsonBody(request) = JsonBody::<RegisterRequest>::from_request(
            json_request(r#"{"username":"boss","password":"pw","userIsAdmin":1}"#),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(request.username, "boss");
        assert!(request.user_is_admin);
    }

    #[tokio::test]
    async fn car_id_rejects_non_numeric_segment_with_json_error() {
        let app = Router::new().route(
            "/car/{id}",
            delete(|CarId(id): CarId| async move { id.to_string() }),
        );

        let response = app
            .clone()
            .oneshot(
                http::Request::builder()
                    .method("DELETE")
                    .uri("/car/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let (status, body) = response_json(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert!(body["details"].is_string());

        let response = app
            .oneshot(
                http::Request::builder()
                    .method("DELETE")
                    .uri("/car/7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn handler_outside_connection_middleware_gets_connection_error() {
        let app = Router::new().route("/car", get(crate::handlers::cars::list_cars));

        let response = app
            .oneshot(http::Request::builder().uri("/car").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let (status, body) = response_json(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database connection error");
        assert_eq!(body["details"], "no connection attached to request");
    }
}
