//! Report desk tests
//!
//! - `api_tests`: HTTP client request shapes and error mapping
//! - `controller_tests`: search, selection and report lifecycle end to end
//! - `app_tests`: key routing and rendering of the terminal front end

mod api_tests;
mod app_tests;
