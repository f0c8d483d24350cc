//! Bounded MySQL connection pool handing out counted leases.

use std::{
    ops::{Deref, DerefMut},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use sqlx::{
    MySql, MySqlPool,
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    pool::PoolConnection,
};

/// A connection checked out of the MySQL pool.
pub type DbConnection = PoolConnection<MySql>;

#[derive(Debug, Default)]
struct LeaseCounters {
    acquired: AtomicU64,
    released: AtomicU64,
}

impl LeaseCounters {
    fn snapshot(&self) -> PoolStats {
        // Read released first so a concurrent release can never make
        // `released` exceed `acquired` in the snapshot.
        let released = self.released.load(Ordering::Acquire);
        let acquired = self.acquired.load(Ordering::Acquire);
        PoolStats { acquired, released }
    }
}

/// Point-in-time lease counters of a [`ConnectionPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Leases handed out since the pool was created
    pub acquired: u64,

    /// Leases returned since the pool was created
    pub released: u64,
}

impl PoolStats {
    /// Leases currently held by in-flight requests.
    pub fn outstanding(&self) -> u64 {
        self.acquired.saturating_sub(self.released)
    }
}

/// Bounded pool of MySQL connections.
///
/// Constructed once at startup and injected into the request pipeline.
/// Cloning is cheap: clones share the same underlying pool and counters.
///
/// # Configuration
///
/// - Maximum connections: fixed at construction, requests wait for a free
///   connection up to the acquire timeout
/// - Connections are returned to the pool when their [`Lease`] is dropped
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    pool: MySqlPool,
    counters: Arc<LeaseCounters>,
}

impl ConnectionPool {
    /// Create the pool and open its first connection.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The MySQL server cannot be reached
    /// - Database authentication fails
    pub async fn connect(
        options: MySqlConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(max_connections, acquire_timeout)
            .connect_with(options)
            .await?;
        Ok(Self::from_pool(pool))
    }

    /// Create the pool without connecting; connections open on first acquire.
    pub fn connect_lazy(
        options: MySqlConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Self {
        let pool =
            Self::pool_options(max_connections, acquire_timeout).connect_lazy_with(options);
        Self::from_pool(pool)
    }

    /// Wrap an already built sqlx pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self {
            pool,
            counters: Arc::default(),
        }
    }

    fn pool_options(max_connections: u32, acquire_timeout: Duration) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
    }

    /// Check out one connection, waiting while the pool is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::PoolTimedOut` if no connection frees up within
    /// the acquire timeout, or the connect error if a new connection fails.
    pub async fn acquire(&self) -> Result<Lease, sqlx::Error> {
        let conn = self.pool.acquire().await?;
        Ok(Lease::new(conn, Arc::clone(&self.counters)))
    }

    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    /// Close every connection; pending and future acquisitions fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Exclusive use of one pooled connection.
///
/// Counted as acquired on creation and as released exactly once, when
/// dropped. Dropping also hands the inner connection back to the pool.
#[derive(Debug)]
pub struct Lease<C = DbConnection> {
    conn: C,
    counters: Arc<LeaseCounters>,
}

impl<C> Lease<C> {
    fn new(conn: C, counters: Arc<LeaseCounters>) -> Self {
        counters.acquired.fetch_add(1, Ordering::AcqRel);
        tracing::trace!("connection lease acquired");
        Self { conn, counters }
    }
}

impl<C> Deref for Lease<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.conn
    }
}

impl<C> DerefMut for Lease<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.conn
    }
}

impl<C> Drop for Lease<C> {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::AcqRel);
        tracing::trace!("connection lease released");
    }
}
