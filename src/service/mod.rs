pub mod background_jobs;
pub mod error;
pub mod lifecycle;
pub mod notification_service;
pub mod policy;
pub mod ticket_service;
