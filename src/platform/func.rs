use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt::Debug;

use super::{Context, Query, ReviewApi};
use crate::cache::ReviewCollection;
use crate::error::PlatformError;

type Handler<P, R> =
    Box<dyn Fn(Context, Query<P>) -> BoxFuture<'static, Result<R, PlatformError>> + Send + Sync>;

/// A [`ReviewApi`] built from two async functions.
pub struct FnReviewApi<R, S, A> {
    search: Handler<S, R>,
    add: Handler<A, R>,
}

impl<R, S, A> FnReviewApi<R, S, A> {
    pub fn new<F, G>(search: F, add: G) -> Self
    where
        F: Fn(Context, Query<S>) -> BoxFuture<'static, Result<R, PlatformError>>
            + Send
            + Sync
            + 'static,
        G: Fn(Context, Query<A>) -> BoxFuture<'static, Result<R, PlatformError>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            search: Box::new(search),
            add: Box::new(add),
        }
    }
}

#[async_trait]
impl<R, S, A> ReviewApi for FnReviewApi<R, S, A>
where
    R: ReviewCollection,
    S: Debug + Send + Sync + 'static,
    A: Debug + Send + Sync + 'static,
{
    type Review = R;
    type SearchParams = S;
    type AddParams = A;

    async fn search_reviews(&self, context: &Context, query: Query<S>) -> Result<R, PlatformError> {
        (self.search)(context.clone(), query).await
    }

    async fn add_review(&self, context: &Context, query: Query<A>) -> Result<R, PlatformError> {
        (self.add)(context.clone(), query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[tokio::test]
    async fn forwards_context_and_params() {
        let api = FnReviewApi::new(
            |ctx: Context, q: Query<String>| {
                async move { Ok(vec![format!("{}:{}", ctx.platform, q.params)]) }.boxed()
            },
            |_ctx: Context, _q: Query<u8>| async { Err(PlatformError::other("read-only")) }.boxed(),
        );
        let ctx = Context::new("shop");

        let found = api.search_reviews(&ctx, Query::new("p1".to_string())).await;
        assert_eq!(found, Ok(vec!["shop:p1".to_string()]));

        let added = api.add_review(&ctx, Query::new(5)).await;
        assert_eq!(added, Err(PlatformError::other("read-only")));
    }
}
