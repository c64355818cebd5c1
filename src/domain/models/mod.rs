pub mod appointment;
pub mod customer;
pub mod draft;
pub mod service;
pub mod technician;
