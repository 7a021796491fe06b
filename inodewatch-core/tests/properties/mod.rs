//! Property test modules

mod health_state_tests;
mod parser_tests;
mod platform_tests;
mod threshold_tests;
