//! Integration tests for blockmerge
//!
//! These tests use wiremock to create mock HTTP servers and tempfile
//! directories to run complete merges end-to-end.

mod fetcher_tests;
mod merge_tests;
mod support;
