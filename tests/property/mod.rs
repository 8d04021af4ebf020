//! Property-based tests for pruning invariants

mod pruning;
