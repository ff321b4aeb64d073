//! Session API models

pub mod models;
