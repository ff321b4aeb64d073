//! Document store wire models

pub mod models;
