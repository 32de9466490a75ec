// Test Helper Modules
//
// Shared fixtures for unit and integration tests. Integration tests run
// against a local wiremock server standing in for the PayU API.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]


pub use payu_mock::*;
pub use test_data::*;
