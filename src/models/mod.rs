pub mod appointment;
pub mod document;
pub mod health;
pub mod notification;
pub mod records;
pub mod response;
pub mod status;
