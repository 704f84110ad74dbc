//! Mock collaborators used across the unit tests.
