//! Document store API models

pub mod firestore;
