//! HTTP handlers, one module per resource.
//!
//! Every write/read handler follows the same order: resolve the target
//! entity (404), evaluate access (403), validate the request body (400),
//! persist, map to the response shape. Search handlers resolve and check
//! the scoping parent, normalize page and pattern, query, bounds-check the
//! requested page, and wrap the result in the paged envelope.

pub mod auth;
pub mod comments;
pub mod features;
pub mod projects;
pub mod runs;
pub mod todos;
pub mod users;
