//! Transport trait consumed by the directory client.

use crate::{decode_body, RequestContext, ScimRequest};
use async_trait::async_trait;
use reqwest::Method;
use scim_core::DirectoryResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Performs authenticated SCIM calls.
///
/// Implementations own authentication, (de)serialization and error
/// classification. A successful call returns the response body, or `None`
/// when the response carried none.
#[async_trait]
pub trait ScimTransport: Send + Sync {
    /// Executes one request under `ctx`.
    async fn execute(&self, ctx: &RequestContext, request: ScimRequest) -> DirectoryResult<Option<Value>>;
}

/// Typed helpers available on every [`ScimTransport`].
#[async_trait]
pub trait ScimTransportExt: ScimTransport {
    /// Sends `request` (as query for `GET`/`DELETE`, as body otherwise) and
    /// decodes the response into `Resp`.
    async fn scim<Req, Resp>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        request: Option<&Req>,
    ) -> DirectoryResult<Resp>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned + Send,
    {
        let request = ScimRequest::encode(method, path, request)?;
        let body = self.execute(ctx, request).await?;
        decode_body(body)
    }

    /// Like [`ScimTransportExt::scim`], but ignores any response body.
    async fn scim_void<Req>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        request: Option<&Req>,
    ) -> DirectoryResult<()>
    where
        Req: Serialize + Sync + ?Sized,
    {
        let request = ScimRequest::encode(method, path, request)?;
        self.execute(ctx, request).await?;
        Ok(())
    }
}

impl<T: ScimTransport + ?Sized> ScimTransportExt for T {}
