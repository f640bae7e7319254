pub mod db;
pub mod notificationdb;
pub mod ticketdb;
pub mod userdb;
