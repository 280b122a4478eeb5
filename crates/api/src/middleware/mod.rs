/// Mapping of domain errors to HTTP responses
pub mod error_handling;
/// Caller identity forwarded by the identity provider
pub mod identity;
