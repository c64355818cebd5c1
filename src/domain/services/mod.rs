pub mod appointment_service;
pub mod availability;
pub mod pricing;
