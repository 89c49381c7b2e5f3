//! The dispatch primitive: invoke a host operation by name with positional
//! JSON arguments.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Failure reported by the far side of a dispatch. Opaque: the
/// index layer passes it along without looking inside.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct DispatchError(Box<dyn std::error::Error + Send + Sync>);

impl DispatchError {
    pub fn new(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(cause.into())
    }

    /// The cause exactly as the transport reported it.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.0
    }
}

/// A remote-call bridge. Transport adapters implement this; nothing in this
/// crate knows how the call travels.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Run `operation` with `args` and resolve to whatever the far side
    /// returns.
    async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Value, DispatchError>;
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Value, DispatchError> {
        (**self).invoke(operation, args).await
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("bridge closed")]
    struct BridgeClosed;

    struct Echo;

    #[async_trait]
    impl Dispatcher for Echo {
        async fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Value, DispatchError> {
            Ok(serde_json::json!({ "op": operation, "args": args }))
        }
    }

    #[test]
    fn dispatch_error_is_transparent() {
        let err = DispatchError::new(BridgeClosed);
        assert_eq!(err.to_string(), "bridge closed");

        let inner = err.into_inner();
        assert!(inner.downcast_ref::<BridgeClosed>().is_some());
        assert!(inner.source().is_none());
    }

    #[test]
    fn dispatch_error_from_message() {
        let err = DispatchError::new("timed out waiting for host");
        assert_eq!(err.to_string(), "timed out waiting for host");
    }

    #[tokio::test]
    async fn arc_dispatcher_forwards() {
        let shared: Arc<dyn Dispatcher> = Arc::new(Echo);
        let handle = Arc::new(Arc::clone(&shared));
        let result = handle
            .invoke("index.get", vec![serde_json::json!("page")])
            .await
            .expect("invoke");
        assert_eq!(result["op"], "index.get");
        assert_eq!(result["args"][0], "page");
    }
}
