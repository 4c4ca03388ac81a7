//! Batch Tools

mod tests;

use futures_util::stream::{self, StreamExt};
use std::future::Future;

/// Batch execute async operations with bounded concurrency.
///
/// Results arrive in completion order.
pub async fn batch<T, F, Fut, R>(items: Vec<T>, concurrency: usize, operation: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(operation)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

/// Like [`batch`], but results come back in input order.
pub async fn batch_ordered<T, F, Fut, R>(items: Vec<T>, concurrency: usize, operation: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let operation = &operation;
    let indexed: Vec<(usize, T)> = items.into_iter().enumerate().collect();
    let mut results = batch(indexed, concurrency, |(index, item)| async move {
        (index, operation(item).await)
    })
    .await;
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}
