mod common;
mod pipeline_tests;
mod transport_tests;
