#[cfg(test)]
mod tests {
    use crate::tools::batch::{batch, batch_ordered};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn test_batch_basic() {
        let items = vec![1, 2, 3, 4, 5];

        let results = batch(items, 2, |n| async move { n * 2 }).await;

        assert_eq!(results.len(), 5);
        // Completion order
        let mut sorted = results.clone();
        sorted.sort();
        assert_eq!(sorted, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let items: Vec<i32> = vec![];
        let results = batch(items, 5, |n| async move { n }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_batch_zero_concurrency_still_runs() {
        let results = batch(vec![1, 2], 0, |n| async move { n }).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_ordered_keeps_input_order() {
        let items = vec![30u64, 10, 20];

        let results = batch_ordered(items, 3, |n| async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(n)).await;
            n
        })
        .await;

        assert_eq!(results, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn test_batch_borrows_from_caller() {
        let prefix = String::from("item-");
        let results = batch_ordered(vec![1, 2], 2, |n| {
            let prefix = &prefix;
            async move { format!("{prefix}{n}") }
        })
        .await;
        assert_eq!(results, vec!["item-1", "item-2"]);
    }

    #[tokio::test]
    async fn test_batch_concurrency_limit() {
        let max_concurrent = Arc::new(Mutex::new(0));
        let current = Arc::new(Mutex::new(0));

        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let results = batch(items, 3, |_n| {
            let max_concurrent = Arc::clone(&max_concurrent);
            let current = Arc::clone(&current);

            async move {
                {
                    let mut curr = current.lock().await;
                    *curr += 1;
                    let mut max = max_concurrent.lock().await;
                    *max = (*max).max(*curr);
                }

                tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

                {
                    let mut curr = current.lock().await;
                    *curr -= 1;
                }

                42
            }
        })
        .await;

        assert_eq!(results.len(), 10);

        let max = max_concurrent.lock().await;
        assert!(*max <= 3, "Max concurrent was {}, expected <= 3", *max);
    }
}
