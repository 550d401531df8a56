//! Integration test modules

mod config_integration;
mod generation;
mod scenarios;
