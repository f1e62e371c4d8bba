//! Mapping between [`UserEntity`] and [`ScimUser`].
//!
//! The two directions are not symmetric. Writing emits an entitlement for each
//! of the three capability flags, but reading recognises only cluster-create
//! and instance-pool-create; `sql-analytics-access` is dropped on the way
//! back. Existing resource state depends on this, so keep it as is.

use crate::model::{Entitlement, EntitlementItem, ScimUser, UserEntity, USER_SCHEMA};

impl UserEntity {
    /// Entitlements granted by this entity's flags, in a fixed order.
    ///
    /// A false flag produces no entry; absence means "not granted".
    #[must_use]
    pub fn entitlements(&self) -> Vec<EntitlementItem> {
        let mut entitlements = Vec::new();
        if self.allow_cluster_create {
            entitlements.push(Entitlement::AllowClusterCreate.into());
        }
        if self.allow_sql_analytics_access {
            entitlements.push(Entitlement::SqlAnalyticsAccess.into());
        }
        if self.allow_instance_pool_create {
            entitlements.push(Entitlement::AllowInstancePoolCreate.into());
        }
        entitlements
    }

    /// Builds the wire payload for a create or full replace.
    ///
    /// Groups and roles are left empty; callers replacing an existing user
    /// must copy them over from the current server state.
    #[must_use]
    pub fn to_request(&self) -> ScimUser {
        ScimUser {
            id: String::new(),
            schemas: vec![USER_SCHEMA.to_string()],
            user_name: self.user_name.clone(),
            active: self.active,
            display_name: self.display_name.clone(),
            entitlements: self.entitlements(),
            groups: Vec::new(),
            roles: Vec::new(),
        }
    }
}

impl From<&UserEntity> for ScimUser {
    fn from(entity: &UserEntity) -> Self {
        entity.to_request()
    }
}

impl From<&ScimUser> for UserEntity {
    fn from(user: &ScimUser) -> Self {
        let mut entity = Self {
            user_name: user.user_name.clone(),
            display_name: user.display_name.clone(),
            active: user.active,
            ..Self::default()
        };
        for item in &user.entitlements {
            match item.value {
                Entitlement::AllowClusterCreate => entity.allow_cluster_create = true,
                Entitlement::AllowInstancePoolCreate => entity.allow_instance_pool_create = true,
                _ => {}
            }
        }
        entity
    }
}

impl From<ScimUser> for UserEntity {
    fn from(user: ScimUser) -> Self {
        Self::from(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComplexValue;
    use serde_json::json;

    fn entity(cluster: bool, sql: bool, pool: bool) -> UserEntity {
        UserEntity {
            user_name: "a@example.com".to_string(),
            display_name: "A".to_string(),
            active: true,
            allow_cluster_create: cluster,
            allow_sql_analytics_access: sql,
            allow_instance_pool_create: pool,
        }
    }

    #[test]
    fn test_only_cluster_create_yields_single_entitlement() {
        let request = entity(true, false, false).to_request();
        assert_eq!(request.entitlements, vec![EntitlementItem::from(Entitlement::AllowClusterCreate)]);
    }

    #[test]
    fn test_no_flags_yield_empty_entitlements() {
        let request = entity(false, false, false).to_request();
        assert!(request.entitlements.is_empty());
        assert_eq!(serde_json::to_value(&request).unwrap()["entitlements"], json!([]));
    }

    #[test]
    fn test_all_flags_in_fixed_order() {
        let values: Vec<Entitlement> = entity(true, true, true)
            .entitlements()
            .into_iter()
            .map(|item| item.value)
            .collect();
        assert_eq!(
            values,
            vec![
                Entitlement::AllowClusterCreate,
                Entitlement::SqlAnalyticsAccess,
                Entitlement::AllowInstancePoolCreate,
            ]
        );
    }

    #[test]
    fn test_request_fields() {
        let request = ScimUser::from(&entity(false, false, false));
        assert_eq!(request.schemas, vec![USER_SCHEMA.to_string()]);
        assert_eq!(request.user_name, "a@example.com");
        assert_eq!(request.display_name, "A");
        assert!(request.active);
        assert!(request.id.is_empty());
        assert!(request.groups.is_empty());
        assert!(request.roles.is_empty());
    }

    #[test]
    fn test_reverse_mapping_drops_sql_analytics_access() {
        let user = entity(false, true, false).to_request();
        let back = UserEntity::from(&user);
        assert!(!back.allow_sql_analytics_access);
        assert!(!back.allow_cluster_create);
        assert!(!back.allow_instance_pool_create);
    }

    #[test]
    fn test_reverse_mapping_restores_cluster_and_pool() {
        let back = UserEntity::from(entity(true, false, true).to_request());
        assert!(back.allow_cluster_create);
        assert!(back.allow_instance_pool_create);
        assert_eq!(back, entity(true, false, true));
    }

    #[test]
    fn test_reverse_mapping_ignores_unknown_and_server_fields() {
        let user = ScimUser {
            id: "42".to_string(),
            user_name: "b@example.com".to_string(),
            active: false,
            entitlements: vec![Entitlement::Other("workspace-access".to_string()).into()],
            groups: vec![ComplexValue::default()],
            ..ScimUser::default()
        };

        let back = UserEntity::from(&user);
        assert_eq!(back.user_name, "b@example.com");
        assert!(!back.active);
        assert!(!back.allow_cluster_create && !back.allow_sql_analytics_access && !back.allow_instance_pool_create);
    }
}
