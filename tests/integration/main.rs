//! End-to-end HTTP tests over the in-memory credential store.

mod auth_test;
mod helpers;
