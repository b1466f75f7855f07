pub mod accounts;
pub mod complaints;
pub mod credentials;
