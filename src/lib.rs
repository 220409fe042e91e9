//! Core library for the `dfsbench` CLI.
//!
//! This crate provides the internal building blocks used by the binary:
//! CLI argument types, config parsing, the timing harness, the HTTP
//! benchmark operations, and sample statistics. The primary user-facing
//! interface is the `dfsbench` command-line application; library APIs may
//! evolve as the CLI grows.
pub mod args;
pub mod bench;
pub mod config;
pub mod error;
pub mod http;
pub mod stats;
