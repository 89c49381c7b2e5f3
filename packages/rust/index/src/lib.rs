//! Typed client for the page index.
//!
//! The index itself lives on the far side of a generic remote-call bridge.
//! [`Dispatcher`] is that bridge; [`IndexProxy`] turns each index operation
//! into exactly one [`Dispatcher::invoke`] call and decodes the answer.

pub mod dispatch;
pub mod proxy;

pub use dispatch::{DispatchError, Dispatcher};
pub use proxy::{IndexOp, IndexProxy};
