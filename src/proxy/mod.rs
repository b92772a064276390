//! Backend half: a pass-through route to the Jira search API.
//!
//! - `GET /jira-issues/test` answers a fixed health-check payload
//! - `GET /jira-issues/issues/:project_key` forwards one bearer-authenticated
//!   search for the project's open issues and relays the answer

mod error;
mod routes;
mod server;

pub use server::serve;
