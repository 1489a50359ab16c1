//! Tests for the alert query facade.

mod helpers;
