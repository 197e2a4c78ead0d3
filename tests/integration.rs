//! Integration test runner
//!
//! To run these tests against a real database:
//! 1. Start PostgreSQL (any recent version) and create the test database
//! 2. Run tests: cargo test --test integration
//!
//! Tests skip themselves when the database is unreachable.
//!
//! Environment variables (with defaults):
//! - TEST_DB_HOST: localhost
//! - TEST_DB_PORT: 5433
//! - TEST_DB_NAME: test_db
//! - TEST_DB_USER: test_user
//! - TEST_DB_PASSWORD: test_password

#[path = "integration/postgres_tests.rs"]
mod postgres_tests;
