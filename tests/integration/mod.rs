//! Integration tests for the shear pruning engine

mod support;
