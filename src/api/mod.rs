pub mod doc;
pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;
