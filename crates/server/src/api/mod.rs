pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod stremio;

pub use routes::create_router;
