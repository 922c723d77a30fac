// Auth and store tests live next to their modules; the cross-cutting
// suites are included here.

// Include client tests
#[path = "client_test.rs"]
mod client_tests;

// Include integration tests
#[path = "integration_tests.rs"]
mod integration_tests;
