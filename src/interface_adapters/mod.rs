pub mod handlers;
pub mod protocol;
pub mod roster;
pub mod routes;
pub mod session;
pub mod state;
pub mod stores;
