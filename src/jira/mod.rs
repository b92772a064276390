pub mod api_types;
pub mod client;
pub mod jql;
pub mod types;
