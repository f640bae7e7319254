pub mod notificationmodel;
pub mod ticketmodel;
pub mod usermodel;
