//! Integration tests driving the services against the in-memory stores.

mod helpers;

mod access_test;
mod audit_test;
mod notification_test;
mod sweep_test;
