//! GraphQL boundary
//!
//! The transport is external. It is handed in as a [`GraphqlClient`] whose
//! futures resolve to the selected operation field (for a paged list query
//! that is the `{ items, nextToken }` object) and whose subscription streams
//! yield one created, updated or deleted entity per event. Dropping a
//! subscription stream unsubscribes.

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod domains;
pub mod hook;
pub mod mutations;
#[cfg(test)]
pub(crate) mod testing;

pub use hook::{AccessScope, EntityApi, HookPhase, MountedHook, SubscriptionSpec, SyncHook, Topic};
pub use mutations::{MutationRequest, MutationRunner};

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("server returned {} error(s)", .0.len())]
    Graphql(Vec<GraphqlError>),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("could not decode `{operation}` response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// One displayable message per contained server error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Graphql(errors) if !errors.is_empty() => {
                errors.iter().map(|error| error.message.clone()).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

/// Subscription delivery: an entity payload, or the error callback's list.
pub type SubscriptionEvent = Result<Value, Vec<GraphqlError>>;

pub trait GraphqlClient: Clone + Send + Sync + 'static {
    fn query(&self, operation: &'static str, variables: Value)
    -> BoxFuture<'static, Result<Value, ApiError>>;

    fn mutate(
        &self,
        operation: &'static str,
        variables: Value,
    ) -> BoxFuture<'static, Result<Value, ApiError>>;

    fn subscribe(&self, operation: &'static str, variables: Value)
    -> BoxStream<'static, SubscriptionEvent>;
}

/// One page of a paged list query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<E> {
    #[serde(default = "Vec::new")]
    pub items: Vec<E>,
    #[serde(default)]
    pub next_token: Option<String>,
}

impl<E> Page<E> {
    /// Continuation token, treating an empty string as "no more pages".
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|token| !token.is_empty())
    }
}
