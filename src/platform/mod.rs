//! The collaborator contract: how review state talks to an e-commerce platform.
//!
//! The crate never performs platform calls itself. A [`ReviewApi`] is
//! injected into [`ReviewFactory`](crate::factory::ReviewFactory) and invoked
//! with the factory's [`Context`] and a [`Query`] built from caller params.

pub mod func;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::cache::ReviewCollection;
use crate::error::PlatformError;

/// Ambient values handed to every collaborator call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub platform: String,
    #[serde(default)]
    pub extensions: HashMap<String, serde_json::Value>,
}

impl Context {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            extensions: HashMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.get(key)
    }
}

/// Replaces the platform's default query with a named custom one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomQuery {
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Value,
}

/// Caller params plus an optional query customisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query<P> {
    pub params: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_query: Option<CustomQuery>,
}

impl<P> Query<P> {
    pub fn new(params: P) -> Self {
        Self {
            params,
            custom_query: None,
        }
    }

    pub fn with_custom_query(mut self, custom_query: CustomQuery) -> Self {
        self.custom_query = Some(custom_query);
        self
    }
}

impl<P> From<P> for Query<P> {
    fn from(params: P) -> Self {
        Self::new(params)
    }
}

/// The two platform operations review state depends on. Both return the
/// full, updated review collection.
#[async_trait]
pub trait ReviewApi: Send + Sync + 'static {
    type Review: ReviewCollection;
    type SearchParams: Debug + Send + Sync + 'static;
    type AddParams: Debug + Send + Sync + 'static;

    async fn search_reviews(
        &self,
        context: &Context,
        query: Query<Self::SearchParams>,
    ) -> Result<Self::Review, PlatformError>;

    async fn add_review(
        &self,
        context: &Context,
        query: Query<Self::AddParams>,
    ) -> Result<Self::Review, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_extensions() {
        let ctx = Context::new("shop").with("locale", json!("en"));
        assert_eq!(ctx.platform, "shop");
        assert_eq!(ctx.get("locale"), Some(&json!("en")));
        assert!(ctx.get("currency").is_none());
    }

    #[test]
    fn query_omits_missing_custom_query() {
        let json = serde_json::to_value(Query::new(json!({"productId": "p1"}))).unwrap();
        assert_eq!(json, json!({"params": {"productId": "p1"}}));
    }

    #[test]
    fn query_carries_custom_query() {
        let query = Query::new(1u32).with_custom_query(CustomQuery {
            query: "reviews-with-media".to_string(),
            variables: json!({"limit": 5}),
        });
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["custom_query"]["query"], "reviews-with-media");

        let back: Query<u32> = serde_json::from_value(json).unwrap();
        assert_eq!(back, query);
    }
}
