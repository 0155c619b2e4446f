//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the object storage adapter used by the photo features.

pub mod storage;
