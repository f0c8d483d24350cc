//! Request-scoped database connection middleware.
//!
//! This middleware wraps every request to:
//! 1. Check one connection out of the pool
//! 2. Apply the session settings to it
//! 3. Attach it to the request for the route handler
//! 4. Release it once the handler has produced a response
//!
//! Requests that cannot get a configured connection are rejected with HTTP 500.

use std::{
    future::Future,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::{
    app::AppState,
    db::{DbConnection, Lease, session},
    error::AppError,
};

/// The connection attached to one request.
///
/// Inserted into the request's extension map by [`connection_middleware`];
/// handlers take it as an extractor argument. Clones share the
/// same lease. The lease is released exactly once: by [`release`] at the end
/// of the request, or by the drop of the last clone if the request is
/// abandoned first.
///
/// [`release`]: RequestConnection::release
pub struct RequestConnection<C = DbConnection> {
    slot: Arc<Mutex<Option<Lease<C>>>>,
}

impl<C> Clone for RequestConnection<C> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<C> RequestConnection<C> {
    pub fn new(lease: Lease<C>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(lease))),
        }
    }

    /// Borrow the connection exclusively.
    ///
    /// # Errors
    ///
    /// `AppError::ConnectionUnavailable` if the lease was already released.
    pub async fn lock(&self) -> Result<ConnectionGuard<'_, C>, AppError> {
        let guard = self.slot.lock().await;
        MutexGuard::try_map(guard, |slot| slot.as_mut())
            .map(ConnectionGuard)
            .map_err(|_| AppError::ConnectionUnavailable)
    }

    /// Return the connection to the pool.
    ///
    /// Returns `false` if it had already been released; the lease is never
    /// dropped twice.
    pub async fn release(&self) -> bool {
        self.slot.lock().await.take().is_some()
    }
}

/// Exclusive borrow of a request's connection, obtained from
/// [`RequestConnection::lock`].
///
/// Dereferences to the underlying connection, so queries take `&mut *conn`.
pub struct ConnectionGuard<'a, C>(MappedMutexGuard<'a, Lease<C>>);

impl<C: Deref> Deref for ConnectionGuard<'_, C> {
    type Target = C::Target;

    fn deref(&self) -> &C::Target {
        &***self.0
    }
}

impl<C: DerefMut> DerefMut for ConnectionGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C::Target {
        &mut ***self.0
    }
}

/// Run `stage` with `lease` attached, releasing the lease when it finishes.
pub async fn with_request_connection<C, F, Fut>(lease: Lease<C>, stage: F) -> Fut::Output
where
    F: FnOnce(RequestConnection<C>) -> Fut,
    Fut: Future,
{
    let conn = RequestConnection::new(lease);
    let output = stage(conn.clone()).await;

    if conn.release().await {
        tracing::debug!("request connection released");
    } else {
        tracing::warn!("request connection was released before the request finished");
    }

    output
}

/// Connection middleware function.
///
/// # Flow
///
/// 1. Acquire a lease from the pool (waits while the pool is exhausted)
/// 2. Run the session configurator on it
/// 3. Insert a `RequestConnection` into the request extensions
/// 4. Call the next handler
/// 5. Release the lease, then hand the response back
///
/// # Returns
///
/// - `Ok(Response)` with whatever the handler produced, success or error
/// - `Err(AppError::Connection)` if no connection could be acquired
/// - `Err(AppError::SessionSetup)` if the session settings failed; the lease
///   acquired for it is released before the error response is built
pub async fn connection_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let mut lease = state.pool.acquire().await.map_err(AppError::Connection)?;

    session::configure(&mut lease, &state.session)
        .await
        .map_err(AppError::SessionSetup)?;

    let response = with_request_connection(lease, |conn| {
        request.extensions_mut().insert(conn);
        next.run(request)
    })
    .await;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::tests::fake_lease;

    #[tokio::test]
    async fn lease_is_released_after_successful_stage() {
        let (lease, pool) = fake_lease(String::from("conn"));

        let seen = with_request_connection(lease, |conn| async move {
            let guard = conn.lock().await.expect("live connection");
            guard.len()
        })
        .await;

        assert_eq!(seen, 4);
        assert_eq!(pool.stats().acquired, 1);
        assert_eq!(pool.stats().released, 1);
    }

    #[tokio::test]
    async fn lease_is_released_after_failing_stage() {
        let (lease, pool) = fake_lease(String::from("conn"));

        let result: Result<(), AppError> =
            with_request_connection(lease, |_conn| async { Err(AppError::WrongPassword) }).await;

        assert!(matches!(result, Err(AppError::WrongPassword)));
        assert_eq!(pool.stats().outstanding(), 0);
        assert_eq!(pool.stats().released, 1);
    }

    #[tokio::test]
    async fn lease_is_released_when_stage_panics() {
        let (lease, pool) = fake_lease(String::from("conn"));

        let task = tokio::spawn(with_request_connection(lease, |_conn| async {
            panic!("handler blew up");
        }));

        assert!(task.await.unwrap_err().is_panic());
        assert_eq!(pool.stats().acquired, 1);
        assert_eq!(pool.stats().released, 1);
    }

    #[tokio::test]
    async fn lease_is_released_when_request_is_abandoned() {
        let (lease, pool) = fake_lease(String::from("conn"));

        let stalled = with_request_connection(lease, |_conn| std::future::pending::<()>());
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(10), stalled).await;

        assert!(timed_out.is_err());
        assert_eq!(pool.stats().released, 1);
    }

    #[tokio::test]
    async fn leaked_clone_cannot_release_twice_or_reuse_connection() {
        let (lease, pool) = fake_lease(String::from("conn"));

        let leaked = with_request_connection(lease, |conn| async move { conn }).await;

        assert_eq!(pool.stats().released, 1);
        assert!(matches!(
            leaked.lock().await,
            Err(AppError::ConnectionUnavailable)
        ));
        assert!(!leaked.release().await);
        drop(leaked);
        assert_eq!(pool.stats().released, 1);
    }

    #[tokio::test]
    async fn guard_gives_mutable_access() {
        let (lease, _pool) = fake_lease(String::from("conn"));
        let conn = RequestConnection::new(lease);

        conn.lock()
            .await
            .expect("live connection")
            .make_ascii_uppercase();

        assert_eq!(&*conn.lock().await.expect("live connection"), "CONN");
        assert!(conn.release().await);
    }
}
