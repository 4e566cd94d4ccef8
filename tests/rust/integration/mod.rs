//! Integration tests - full builder-to-text compilations through the public API
//!
//! These tests verify that the catalog, registry, accumulator and printer work
//! together to produce exact query text, parameters and bindings.

mod builder_examples_tests;
mod catalog_config_tests;
mod fixtures;
