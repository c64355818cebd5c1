pub mod sqlite_appointment_repo;
pub mod sqlite_customer_repo;
pub mod sqlite_service_repo;
pub mod sqlite_technician_repo;

pub mod postgres_appointment_repo;
pub mod postgres_customer_repo;
pub mod postgres_service_repo;
pub mod postgres_technician_repo;
