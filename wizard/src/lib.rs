//! deploywiz library
//!
//! A step-wise service deployment wizard: schema model, step validation,
//! wizard controller and submission to document-store backends, served over
//! a small session API.

pub mod app;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod schema;
pub mod server;
pub mod sessions;
pub mod steps;
pub mod storage;
pub mod submit;
pub mod utils;
pub mod wizard;
pub mod workers;
