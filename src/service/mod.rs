use actix_web::web;

use crate::errors::StoreError;

pub mod intake;
pub mod reporting;
pub mod review;

/// Runs synchronous store work on the blocking thread pool.
pub(crate) async fn blocking<T, E, F>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<StoreError> + Send + 'static,
{
    web::block(f).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking store task failed");
        E::from(StoreError::Interrupted)
    })?
}
