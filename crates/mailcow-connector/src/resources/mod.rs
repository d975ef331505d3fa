//! Per-kind resource definitions
//!
//! One table per manageable kind: the field schema, endpoint bindings,
//! id derivation contract and mapping quirks. Everything here is thin
//! data consumed generically by the lifecycle driver.

mod alias;
mod dkim_key;
mod domain;
mod domain_admin;
mod domain_alias;
mod identity_provider;
mod mailbox;
mod oauth2_client;
mod relay_host;
mod sync_job;

use crate::definition::ResourceDefinition;
use crate::types::ResourceKind;

/// Build the definition for a resource kind.
#[must_use]
pub fn definition(kind: ResourceKind) -> ResourceDefinition {
    match kind {
        ResourceKind::Domain => domain::definition(),
        ResourceKind::Mailbox => mailbox::definition(),
        ResourceKind::Alias => alias::definition(),
        ResourceKind::DomainAlias => domain_alias::definition(),
        ResourceKind::DomainAdmin => domain_admin::definition(),
        ResourceKind::DkimKey => dkim_key::definition(),
        ResourceKind::SyncJob => sync_job::definition(),
        ResourceKind::OAuth2Client => oauth2_client::definition(),
        ResourceKind::RelayHost => relay_host::definition(),
        ResourceKind::IdentityProvider => identity_provider::definition(),
    }
}
