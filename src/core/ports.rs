pub mod guard;
pub mod repository;
pub mod tokener;
