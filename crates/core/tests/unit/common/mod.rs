//! Tests for shared constants and error types.
