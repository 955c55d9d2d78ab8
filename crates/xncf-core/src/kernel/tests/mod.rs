pub mod bootstrap_tests;
pub mod error_tests;
