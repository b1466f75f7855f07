pub mod common;
pub mod complaint;
pub mod identity;

pub use complaint::{ComplaintStore, PgComplaintStore};
pub use identity::{IdentityStore, PgIdentityStore};

#[cfg(test)]
pub use complaint::MockComplaintStore;
#[cfg(test)]
pub use identity::MockIdentityStore;
