pub mod event;
pub mod registration;
pub mod suggestion;
pub mod user;
pub mod vote;
