pub mod config;
pub mod error;
pub mod model;
pub mod rpc;
pub mod schema;
