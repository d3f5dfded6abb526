mod stubs;

mod client_tests;
mod group_tests;
