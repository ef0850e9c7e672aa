/// Join primitives for independently resolving async producers.
///
/// All producers are driven concurrently. The join resolves only once every one
/// of them has succeeded; the first failure fails the whole join and the
/// remaining results are dropped.
use futures::future::try_join_all;
use std::future::Future;

use crate::{BoxSceneError, BoxSceneResult};

pub async fn join_all<I, F, T>(producers: I) -> BoxSceneResult<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = BoxSceneResult<T>>,
{
    try_join_all(producers).await
}

/// Like `join_all`, for a fixed number of producers.
/// A wrong count is rejected before any producer is polled.
pub async fn join_exact<const N: usize, I, F, T>(producers: I) -> BoxSceneResult<[T; N]>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = BoxSceneResult<T>>,
{
    let producers: Vec<F> = producers.into_iter().collect();
    if producers.len() != N {
        return Err(BoxSceneError::InvalidArgument(format!(
            "expected {} producers, got {}",
            N,
            producers.len()
        )));
    }

    let results = try_join_all(producers).await?;
    results.try_into().map_err(|results: Vec<T>| {
        BoxSceneError::InvalidArgument(format!(
            "expected {} results, got {}",
            N,
            results.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{FutureExt, channel::oneshot, executor::block_on, future::BoxFuture};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_join_all_collects_in_order() {
        let producers = (0..4).map(|i| async move { Ok::<_, BoxSceneError>(i * 10) });
        assert_eq!(block_on(join_all(producers)).unwrap(), vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_join_all_waits_for_late_producers() {
        let (tx, rx) = oneshot::channel::<u32>();
        let producers: Vec<BoxFuture<'static, BoxSceneResult<u32>>> = vec![
            async { Ok::<u32, BoxSceneError>(1) }.boxed(),
            async move {
                rx.await
                    .map_err(|_| BoxSceneError::AssetLoading("sender dropped".to_string()))
            }
            .boxed(),
        ];

        let join = join_all(producers);
        tx.send(2).unwrap();
        assert_eq!(block_on(join).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_join_all_fails_as_a_whole() {
        let producers: Vec<BoxFuture<'static, BoxSceneResult<u32>>> = vec![
            async { Ok::<u32, BoxSceneError>(1) }.boxed(),
            async { Err::<u32, _>(BoxSceneError::AssetLoading("texture".to_string())) }.boxed(),
            async { Ok::<u32, BoxSceneError>(3) }.boxed(),
        ];
        assert!(matches!(
            block_on(join_all(producers)),
            Err(BoxSceneError::AssetLoading(_))
        ));
    }

    #[test]
    fn test_join_exact_array() {
        let producers = (0..6).map(|i| async move { Ok::<_, BoxSceneError>(i) });
        let joined: [i32; 6] = block_on(join_exact(producers)).unwrap();
        assert_eq!(joined, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_join_exact_wrong_count_polls_nothing() {
        let polled = AtomicUsize::new(0);
        let counter = &polled;
        let producers = (0..5).map(move |i| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, BoxSceneError>(i)
        });

        let result = block_on(join_exact::<6, _, _, _>(producers));
        assert!(matches!(result, Err(BoxSceneError::InvalidArgument(_))));
        assert_eq!(polled.load(Ordering::SeqCst), 0);
    }
}
