//! Unit tests for geoedit.

mod geometry_tests;
