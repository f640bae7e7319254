pub mod auth;
pub mod notifications;
pub mod tickets;
pub mod users;
