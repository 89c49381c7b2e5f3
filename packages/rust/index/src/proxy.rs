//! Typed wrappers over the `index.*` host operations.

use std::sync::Arc;

use inkpage_shared::{IndexScanResult, InkpageError, KeyValueEntry, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::dispatch::Dispatcher;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Host operations exposed by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexOp {
    Set,
    BatchSet,
    Get,
    Delete,
    ScanPrefixForPage,
    ScanPrefixGlobal,
    ClearPageIndexForPage,
    DeletePrefixForPage,
    ClearPageIndex,
}

impl IndexOp {
    pub const ALL: [IndexOp; 9] = [
        Self::Set,
        Self::BatchSet,
        Self::Get,
        Self::Delete,
        Self::ScanPrefixForPage,
        Self::ScanPrefixGlobal,
        Self::ClearPageIndexForPage,
        Self::DeletePrefixForPage,
        Self::ClearPageIndex,
    ];

    /// Operation name as the dispatch primitive knows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "index.set",
            Self::BatchSet => "index.batchSet",
            Self::Get => "index.get",
            Self::Delete => "index.delete",
            Self::ScanPrefixForPage => "index.scanPrefixForPage",
            Self::ScanPrefixGlobal => "index.scanPrefixGlobal",
            Self::ClearPageIndexForPage => "index.clearPageIndexForPage",
            Self::DeletePrefixForPage => "index.deletePrefixForPage",
            Self::ClearPageIndex => "index.clearPageIndex",
        }
    }
}

impl std::fmt::Display for IndexOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IndexOp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown index operation '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

/// Client-side proxy for the page index.
///
/// Every method is a single dispatch: no validation, retries, caching or
/// batching happens here, and failures come back with the transport's
/// cause untouched (see [`InkpageError::Dispatch`]).
#[derive(Clone)]
pub struct IndexProxy {
    dispatcher: Arc<dyn Dispatcher>,
}

impl std::fmt::Debug for IndexProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexProxy").finish_non_exhaustive()
    }
}

impl IndexProxy {
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Store `value` under `key` for `page`.
    #[instrument(skip(self, value))]
    pub async fn set<V>(&self, page: &str, key: &str, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        let op = IndexOp::Set;
        let value = encode(op, value)?;
        self.mutate(op, vec![page.into(), key.into(), value]).await
    }

    /// Store all of `kvs` for `page` in one call. Atomicity is up to the host.
    #[instrument(skip(self, kvs), fields(count = kvs.len()))]
    pub async fn batch_set<V: Serialize>(
        &self,
        page: &str,
        kvs: &[KeyValueEntry<V>],
    ) -> Result<()> {
        let op = IndexOp::BatchSet;
        let kvs = encode(op, kvs)?;
        self.mutate(op, vec![page.into(), kvs]).await
    }

    /// Look up `key` on `page`. An absent key resolves to `None`.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, page: &str, key: &str) -> Result<Option<T>> {
        let op = IndexOp::Get;
        let value = self.call(op, vec![page.into(), key.into()]).await?;
        decode(op, value)
    }

    /// Remove `key` from `page`.
    #[instrument(skip(self))]
    pub async fn del(&self, page: &str, key: &str) -> Result<()> {
        self.mutate(IndexOp::Delete, vec![page.into(), key.into()]).await
    }

    /// Records on `page` whose key starts with `prefix`, in host order.
    #[instrument(skip(self))]
    pub async fn scan_prefix_for_page<T: DeserializeOwned>(
        &self,
        page: &str,
        prefix: &str,
    ) -> Result<Vec<IndexScanResult<T>>> {
        let op = IndexOp::ScanPrefixForPage;
        let value = self.call(op, vec![page.into(), prefix.into()]).await?;
        decode(op, value)
    }

    /// Records on any page whose key starts with `prefix`, in host order.
    #[instrument(skip(self))]
    pub async fn scan_prefix_global<T: DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<Vec<IndexScanResult<T>>> {
        let op = IndexOp::ScanPrefixGlobal;
        let value = self.call(op, vec![prefix.into()]).await?;
        decode(op, value)
    }

    /// Drop everything indexed for `page`.
    #[instrument(skip(self))]
    pub async fn clear_page_index_for_page(&self, page: &str) -> Result<()> {
        self.mutate(IndexOp::ClearPageIndexForPage, vec![page.into()]).await
    }

    #[instrument(skip(self))]
    pub async fn delete_prefix_for_page(&self, page: &str, prefix: &str) -> Result<()> {
        self.mutate(
            IndexOp::DeletePrefixForPage,
            vec![page.into(), prefix.into()],
        )
        .await
    }

    /// Drop the whole index.
    #[instrument(skip(self))]
    pub async fn clear_page_index(&self) -> Result<()> {
        self.mutate(IndexOp::ClearPageIndex, Vec::new()).await
    }

    async fn call(&self, op: IndexOp, args: Vec<Value>) -> Result<Value> {
        debug!(operation = op.as_str(), argc = args.len(), "dispatching index operation");

        self.dispatcher
            .invoke(op.as_str(), args)
            .await
            .map_err(|e| InkpageError::Dispatch {
                operation: op.as_str(),
                source: e.into_inner(),
            })
    }

    async fn mutate(&self, op: IndexOp, args: Vec<Value>) -> Result<()> {
        let value = self.call(op, args).await?;
        if !value.is_null() {
            trace!(operation = op.as_str(), %value, "ignoring payload of mutation");
        }
        Ok(())
    }
}

fn encode<V: Serialize + ?Sized>(op: IndexOp, value: &V) -> Result<Value> {
    serde_json::to_value(value).map_err(|source| InkpageError::Encode {
        operation: op.as_str(),
        source,
    })
}

fn decode<T: DeserializeOwned>(op: IndexOp, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| InkpageError::Decode {
        operation: op.as_str(),
        source,
    })
}
