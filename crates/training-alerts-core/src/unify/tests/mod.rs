//! Tests for alert unification.

mod helpers;
