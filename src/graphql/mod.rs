//! GraphQL module
//!
//! Request/response envelopes for the Expo GraphQL API and the query and
//! mutation documents the resources send.
//!
//! Documents are plain strings; variables travel as a JSON object next to
//! them. Connection queries all accept `$first` and `$after` so the
//! pagination module can drive them.

pub mod mutations;
pub mod queries;
mod response;

pub use response::{
    GraphqlError, GraphqlErrorException, GraphqlErrorExtensions, GraphqlRequest, GraphqlResponse,
};
