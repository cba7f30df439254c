/*!
 * Main test entry point for the anytrans test suite
 */

// Import common test utilities
pub mod common;

// Import unit tests
mod unit {
    // Session scheduling tests
    pub mod scheduler_tests;
}

// Import integration tests
mod integration {
    // End-to-end subtitle and text file workflows
    pub mod pipeline_tests;
}
