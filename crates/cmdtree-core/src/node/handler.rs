//! Handler callables attached to command nodes

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::errors::CommandResult;
use crate::invocation::Invocation;

/// Handler run on the dispatching thread
pub type SyncHandlerFn = dyn Fn(&mut Invocation) -> CommandResult + Send + Sync;

/// Handler whose body runs inside a [`HandlerScope`](crate::scope::HandlerScope)
pub type AsyncHandlerFn = dyn Fn(Invocation) -> BoxFuture<'static, CommandResult> + Send + Sync;

/// A node's handler
#[derive(Clone)]
pub enum Handler {
    Sync(Arc<SyncHandlerFn>),
    Async(Arc<AsyncHandlerFn>),
}

impl Handler {
    /// Wrap a synchronous closure
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&mut Invocation) -> CommandResult + Send + Sync + 'static,
    {
        Handler::Sync(Arc::new(f))
    }

    /// Wrap an async closure; the invocation is moved into the future
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        Handler::Async(Arc::new(move |inv| f(inv).boxed()))
    }

    /// Whether the body runs in a handler scope
    pub fn is_async(&self) -> bool {
        matches!(self, Handler::Async(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Sync(_) => f.write_str("Handler::Sync"),
            Handler::Async(_) => f.write_str("Handler::Async"),
        }
    }
}
