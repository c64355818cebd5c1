pub mod appointment;
pub mod customer;
pub mod health;
pub mod service;
pub mod technician;
