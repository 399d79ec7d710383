mod api_server;

pub use api_server::{api_routes, serve_api};
