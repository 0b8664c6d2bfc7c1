pub mod broker;
pub mod credentials;

pub use broker::CredentialBroker;
pub use credentials::ConnectionCredentials;
