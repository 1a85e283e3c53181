//! MiniDB - a minimal single-user relational store
//!
//! This crate provides:
//! - A flat-file table engine: one schema file and one record file per
//!   table, with tombstoned deletes and whole-file rewrites
//! - A small command language (CREATE, DROP, INSERT, SELECT, UPDATE,
//!   DELETE, EXPORT) driving that engine
//! - TOML configuration for the storage root and rewrite strategy

pub mod config;
pub mod error;
pub mod sql;
pub mod storage;
