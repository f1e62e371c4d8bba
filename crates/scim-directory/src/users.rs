//! Directory user lifecycle operations.

use crate::model::{PatchRequest, ScimUser, UserEntity, UserList};
use async_trait::async_trait;
use scim_core::DirectoryResult;
use scim_transport::{Method, RequestContext, ScimTransport, ScimTransportExt};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Root of the SCIM API on the remote host.
pub const SCIM_API_PREFIX: &str = "/preview/scim/v2";

const USERS_PATH: &str = "/preview/scim/v2/Users";
const ME_PATH: &str = "/preview/scim/v2/Me";

/// Directory user operations, expressed in domain terms.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Creates a user and returns the directory's representation of it.
    async fn create(&self, entity: &UserEntity) -> DirectoryResult<ScimUser>;

    /// Lists users matching a SCIM filter expression; an empty filter lists all.
    async fn filter(&self, filter: &str) -> DirectoryResult<Vec<ScimUser>>;

    /// Reads a user by directory id.
    async fn read(&self, user_id: &str) -> DirectoryResult<UserEntity>;

    /// Reads the authenticated caller in wire form.
    async fn me(&self) -> DirectoryResult<ScimUser>;

    /// Reads the authenticated caller in domain form.
    async fn read_caller(&self) -> DirectoryResult<UserEntity>;

    /// Replaces a user, keeping its current groups and roles.
    async fn update(&self, user_id: &str, entity: &UserEntity) -> DirectoryResult<()>;

    /// Applies a partial update as-is.
    async fn patch(&self, user_id: &str, request: &PatchRequest) -> DirectoryResult<()>;

    /// Deletes a user.
    async fn delete(&self, user_id: &str) -> DirectoryResult<()>;
}

/// SCIM users API client.
///
/// Holds the transport and the context given at construction; the context is
/// handed to every call and never changed. Errors from the transport are
/// returned untouched.
#[derive(Clone)]
pub struct UsersApi {
    client: Arc<dyn ScimTransport>,
    context: RequestContext,
}

#[derive(Serialize)]
struct FilterQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
}

impl UsersApi {
    /// Creates a users API over `client`, scoped to `context`.
    pub fn new(client: Arc<dyn ScimTransport>, context: RequestContext) -> Self {
        Self { client, context }
    }

    /// The context applied to every call.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    async fn read_scim(&self, user_id: &str) -> DirectoryResult<ScimUser> {
        self.read_by_path(&user_path(user_id)).await
    }

    async fn read_by_path(&self, path: &str) -> DirectoryResult<ScimUser> {
        self.client
            .scim::<(), _>(&self.context, Method::GET, path, None)
            .await
    }
}

#[async_trait]
impl UserDirectory for UsersApi {
    async fn create(&self, entity: &UserEntity) -> DirectoryResult<ScimUser> {
        debug!("Creating directory user: {}", entity.user_name);

        let request = entity.to_request();
        let user: ScimUser = self
            .client
            .scim(&self.context, Method::POST, USERS_PATH, Some(&request))
            .await?;

        info!("Directory user created: {} ({})", user.user_name, user.id);
        Ok(user)
    }

    async fn filter(&self, filter: &str) -> DirectoryResult<Vec<ScimUser>> {
        debug!("Listing directory users, filter: {:?}", filter);

        let query = FilterQuery {
            filter: Some(filter).filter(|f| !f.is_empty()),
        };
        let users: UserList = self
            .client
            .scim(&self.context, Method::GET, USERS_PATH, Some(&query))
            .await?;

        Ok(users.resources)
    }

    async fn read(&self, user_id: &str) -> DirectoryResult<UserEntity> {
        debug!("Reading directory user: {}", user_id);

        let user = self.read_scim(user_id).await?;
        Ok(UserEntity::from(user))
    }

    async fn me(&self) -> DirectoryResult<ScimUser> {
        debug!("Reading calling user");
        self.read_by_path(ME_PATH).await
    }

    async fn read_caller(&self) -> DirectoryResult<UserEntity> {
        let user = self.me().await?;
        Ok(UserEntity::from(user))
    }

    // Two requests, not atomic: a concurrent writer between the read and the
    // replace loses its changes.
    async fn update(&self, user_id: &str, entity: &UserEntity) -> DirectoryResult<()> {
        debug!("Updating directory user: {}", user_id);

        let current = self.read_scim(user_id).await?;

        let mut request = entity.to_request();
        request.groups = current.groups;
        request.roles = current.roles;

        self.client
            .scim_void(&self.context, Method::PUT, &user_path(user_id), Some(&request))
            .await?;

        info!("Directory user updated: {}", user_id);
        Ok(())
    }

    async fn patch(&self, user_id: &str, request: &PatchRequest) -> DirectoryResult<()> {
        debug!("Patching directory user: {}", user_id);

        self.client
            .scim_void(&self.context, Method::PATCH, &user_path(user_id), Some(request))
            .await
    }

    async fn delete(&self, user_id: &str) -> DirectoryResult<()> {
        debug!("Deleting directory user: {}", user_id);

        self.client
            .scim_void::<()>(&self.context, Method::DELETE, &user_path(user_id), None)
            .await?;

        info!("Directory user deleted: {}", user_id);
        Ok(())
    }
}

impl fmt::Debug for UsersApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsersApi").field("context", &self.context).finish_non_exhaustive()
    }
}

/// Creates a shareable user directory over `client`.
pub fn create_user_directory(client: Arc<dyn ScimTransport>, context: RequestContext) -> Arc<dyn UserDirectory> {
    Arc::new(UsersApi::new(client, context))
}

fn user_path(user_id: &str) -> String {
    format!("{}/{}", USERS_PATH, user_id)
}
