//! Authentication module
//!
//! Expo authenticates every GraphQL and REST call with a personal or robot
//! access token sent as a bearer header. `Credentials` also carries the
//! default account name that account-scoped operations fall back to.

mod credentials;

pub use credentials::Credentials;
