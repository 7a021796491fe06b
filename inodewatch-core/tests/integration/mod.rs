//! Integration test modules

mod monitor_tests;
