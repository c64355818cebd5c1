use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{AppointmentRepository, CustomerRepository, ServiceRepository, TechnicianRepository};
use crate::domain::services::appointment_service::AppointmentService;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_customer_repo::PostgresCustomerRepo,
    postgres_service_repo::PostgresServiceRepo, postgres_technician_repo::PostgresTechnicianRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_customer_repo::SqliteCustomerRepo,
    sqlite_service_repo::SqliteServiceRepo, sqlite_technician_repo::SqliteTechnicianRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            Arc::new(PostgresServiceRepo::new(pool.clone())),
            Arc::new(PostgresTechnicianRepo::new(pool.clone())),
            Arc::new(PostgresCustomerRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        sqlite_state(config, pool)
    }
}

/// Wires the SQLite repositories onto an already migrated pool.
pub fn sqlite_state(config: &Config, pool: SqlitePool) -> AppState {
    assemble_state(
        config,
        Arc::new(SqliteAppointmentRepo::new(pool.clone())),
        Arc::new(SqliteServiceRepo::new(pool.clone())),
        Arc::new(SqliteTechnicianRepo::new(pool.clone())),
        Arc::new(SqliteCustomerRepo::new(pool)),
    )
}

fn assemble_state(
    config: &Config,
    appointment_repo: Arc<dyn AppointmentRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    technician_repo: Arc<dyn TechnicianRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
) -> AppState {
    let appointment_service = Arc::new(AppointmentService::new(
        appointment_repo.clone(),
        service_repo.clone(),
        technician_repo.clone(),
        config.strict_slot_check,
    ));

    AppState {
        config: config.clone(),
        appointment_repo,
        service_repo,
        technician_repo,
        customer_repo,
        appointment_service,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
