pub mod logging;
pub mod model;

// Backend binding
pub mod api;

// Building blocks of the desk
pub mod debounce;
pub mod selection;
pub mod validation;
pub mod disposition;
pub mod download;
pub mod status;

// Orchestration of search + report lifecycles
pub mod controller;
