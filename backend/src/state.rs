use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    repositories::{ComplaintStore, IdentityStore, PgComplaintStore, PgIdentityStore},
    services::credentials::CredentialService,
};

#[derive(Clone)]
pub struct AppState {
    pub identities: Arc<dyn IdentityStore>,
    pub complaints: Arc<dyn ComplaintStore>,
    pub credentials: CredentialService,
    pub config: Config,
}

impl AppState {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        complaints: Arc<dyn ComplaintStore>,
        config: Config,
    ) -> Self {
        let credentials = CredentialService::new(&config.jwt_secret, config.session_ttl_hours);
        Self {
            identities,
            complaints,
            credentials,
            config,
        }
    }

    /// Wires the Postgres-backed stores onto one pool.
    pub fn from_pool(pool: DbPool, config: Config) -> Self {
        Self::new(
            Arc::new(PgIdentityStore::new(pool.clone())),
            Arc::new(PgComplaintStore::new(pool)),
            config,
        )
    }
}
