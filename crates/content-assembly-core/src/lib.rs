//! # Content Assembly Core
//!
//! Pure logic for turning the staged files of one digital object into an
//! ordered structural graph: grouping, resource classification, mimetype
//! policy, access resolution, and the two graph builders.
//!
//! This crate performs no filesystem I/O. Checksum lookups go through the
//! [`checksum::ChecksumSource`] trait; the application crate supplies the
//! sidecar-file implementation.

pub mod access;
pub mod builder;
pub mod checksum;
pub mod classify;
pub mod error;
pub mod grouping;
pub mod models;
pub mod policy;
