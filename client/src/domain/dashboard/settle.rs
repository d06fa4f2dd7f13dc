//! Settle-all-with-default combinator.
//!
//! A dashboard is assembled from sources that fail independently. [`settle`]
//! awaits one source and never propagates its error: a failure becomes the
//! payload's `Default` plus a recorded [`SourceFailure`]. Callers join
//! several settled futures, so one slow or broken source can neither abort
//! nor short-circuit the others.

use std::collections::BTreeMap;
use std::future::Future;

use futures_util::future::join_all;
use tracing::{debug, warn};

use super::{SourceFailure, SourceName};

/// Result of one settled source: always a usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<T> {
    source: SourceName,
    value: T,
    failure: Option<SourceFailure>,
}

impl<T> Settled<T> {
    /// Source this slot was fetched from.
    pub fn source(&self) -> SourceName {
        self.source
    }

    /// Payload, or the default when the source failed.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Failure details, when the source failed.
    pub fn failure(&self) -> Option<&SourceFailure> {
        self.failure.as_ref()
    }

    /// Move the value out, recording any failure in `failures`.
    pub fn record(self, failures: &mut BTreeMap<SourceName, SourceFailure>) -> T {
        if let Some(failure) = self.failure {
            failures.insert(self.source, failure);
        }
        self.value
    }
}

/// Await one source; on error substitute `T::default()`.
///
/// # Examples
/// ```
/// use portal_client::domain::dashboard::{settle, SourceName};
/// use portal_client::domain::ports::GatewayError;
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let settled = rt.block_on(settle(SourceName::RecentIncidents, async {
///     Err::<Vec<u64>, _>(GatewayError::timeout("elapsed"))
/// }));
/// assert!(settled.value().is_empty());
/// assert!(settled.failure().is_some());
/// ```
pub async fn settle<T, E, F>(source: SourceName, fetch: F) -> Settled<T>
where
    T: Default,
    F: Future<Output = Result<T, E>>,
    SourceFailure: From<E>,
{
    match fetch.await {
        Ok(value) => {
            debug!(source = %source, "dashboard source settled");
            Settled {
                source,
                value,
                failure: None,
            }
        }
        Err(error) => {
            let failure = SourceFailure::from(error);
            warn!(
                source = %source,
                kind = failure.kind,
                reason = %failure.reason,
                "dashboard source failed; using default"
            );
            Settled {
                source,
                value: T::default(),
                failure: Some(failure),
            }
        }
    }
}

/// Settle a homogeneous batch of sources concurrently, preserving order.
pub async fn settle_all<T, E, F, I>(fetches: I) -> Vec<Settled<T>>
where
    T: Default,
    F: Future<Output = Result<T, E>>,
    I: IntoIterator<Item = (SourceName, F)>,
    SourceFailure: From<E>,
{
    join_all(
        fetches
            .into_iter()
            .map(|(source, fetch)| settle(source, fetch)),
    )
    .await
}
