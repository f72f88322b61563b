pub mod common;
pub mod dashboard;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod suggestion;
pub mod user;
pub mod vote;
