//! Scripted GraphQL client for hook and mutation tests.

use super::{ApiError, GraphqlClient, SubscriptionEvent};
use futures::channel::{mpsc, oneshot};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{BoxStream, StreamExt};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type Reply = Result<Value, ApiError>;

enum Scripted {
    Ready(Reply),
    Pending(oneshot::Receiver<Reply>),
}

struct OpenSubscription {
    operation: &'static str,
    variables: Value,
    sender: mpsc::UnboundedSender<SubscriptionEvent>,
}

#[derive(Default)]
struct MockState {
    replies: HashMap<&'static str, VecDeque<Scripted>>,
    queries: Vec<(&'static str, Value)>,
    mutations: Vec<(&'static str, Value)>,
    subscriptions: Vec<OpenSubscription>,
}

#[derive(Clone, Default)]
pub(crate) struct MockClient {
    state: Arc<Mutex<MockState>>,
}

pub(crate) fn spawn_on_tokio(future: BoxFuture<'static, ()>) {
    tokio::spawn(future);
}

/// Yield to spawned tasks until `condition` holds; panics after five seconds.
pub(crate) async fn eventually(what: &str, mut condition: impl FnMut() -> bool) {
    let reached = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(reached.is_ok(), "timed out waiting for {what}");
}

impl MockClient {
    /// Queue the reply for the next call of `operation`; unscripted queries
    /// answer with an empty last page, unscripted mutations with `null`.
    pub fn push_page(&self, operation: &'static str, reply: Reply) {
        self.script(operation, Scripted::Ready(reply));
    }

    pub fn push_mutation(&self, operation: &'static str, reply: Reply) {
        self.script(operation, Scripted::Ready(reply));
    }

    /// Queue a reply that resolves only when the returned sender fires.
    pub fn push_pending_page(&self, operation: &'static str) -> oneshot::Sender<Reply> {
        let (sender, receiver) = oneshot::channel();
        self.script(operation, Scripted::Pending(receiver));
        sender
    }

    fn script(&self, operation: &'static str, scripted: Scripted) {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(operation)
            .or_default()
            .push_back(scripted);
    }

    fn next_reply(&self, operation: &'static str, fallback: Value) -> BoxFuture<'static, Reply> {
        let scripted = self
            .state
            .lock()
            .unwrap()
            .replies
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        async move {
            match scripted {
                Some(Scripted::Ready(reply)) => reply,
                Some(Scripted::Pending(receiver)) => receiver
                    .await
                    .unwrap_or_else(|_| Err(ApiError::Transport("reply dropped".to_string()))),
                None => Ok(fallback),
            }
        }
        .boxed()
    }

    pub fn queries(&self) -> Vec<(&'static str, Value)> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn mutations(&self) -> Vec<(&'static str, Value)> {
        self.state.lock().unwrap().mutations.clone()
    }

    /// Deliver `event` to every open subscription of `operation`.
    pub fn emit(&self, operation: &'static str, event: SubscriptionEvent) {
        let state = self.state.lock().unwrap();
        for subscription in state
            .subscriptions
            .iter()
            .filter(|subscription| subscription.operation == operation)
        {
            let _ = subscription.sender.unbounded_send(event.clone());
        }
    }

    pub fn open_subscriptions(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .subscriptions
            .iter()
            .filter(|subscription| !subscription.sender.is_closed())
            .count()
    }

    pub fn subscription_variables(&self) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .subscriptions
            .iter()
            .map(|subscription| subscription.variables.clone())
            .collect()
    }
}

impl GraphqlClient for MockClient {
    fn query(&self, operation: &'static str, variables: Value) -> BoxFuture<'static, Reply> {
        self.state
            .lock()
            .unwrap()
            .queries
            .push((operation, variables));
        self.next_reply(operation, json!({ "items": [] }))
    }

    fn mutate(&self, operation: &'static str, variables: Value) -> BoxFuture<'static, Reply> {
        self.state
            .lock()
            .unwrap()
            .mutations
            .push((operation, variables));
        self.next_reply(operation, Value::Null)
    }

    fn subscribe(
        &self,
        operation: &'static str,
        variables: Value,
    ) -> BoxStream<'static, SubscriptionEvent> {
        let (sender, receiver) = mpsc::unbounded();
        self.state
            .lock()
            .unwrap()
            .subscriptions
            .push(OpenSubscription {
                operation,
                variables,
                sender,
            });
        receiver.boxed()
    }
}
