use salon_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{
        appointment::{Appointment, AppointmentStatus, NewAppointmentParams},
        draft::EditDraft,
        service::{AddOn, Service},
        technician::{Technician, TechnicianStatus},
    },
    domain::ports::RecordStore,
    error::AppError,
    infra::factory::{run_sqlite_migrations, sqlite_state},
    infra::store::local_record_store::LocalRecordStore,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use async_trait::async_trait;
use axum::{body::Body, http::{header, Request}, response::Response, Router};
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    pub async fn strict() -> Self {
        Self::build(true).await
    }

    async fn build(strict_slot_check: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let config = Config {
            database_url: db_url,
            port: 0,
            log_dir: "./logs".to_string(),
            strict_slot_check,
        };

        let state = Arc::new(sqlite_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub fn local_store(&self) -> Arc<dyn RecordStore> {
        Arc::new(LocalRecordStore::new(self.state.clone()))
    }

    pub async fn seed_service(&self, id: &str, name: &str, base_price: i64, add_ons: &[(&str, i64)]) -> Service {
        let mut service = Service::new(
            name.to_string(),
            base_price,
            add_ons.iter().map(|(n, p)| AddOn { name: n.to_string(), price: *p }).collect(),
        );
        service.id = id.to_string();
        self.state.service_repo.create(&service).await.unwrap()
    }

    pub async fn seed_technician(&self, id: &str, first_name: &str, status: TechnicianStatus) -> Technician {
        let mut technician = Technician::new(first_name.to_string(), "Tran".to_string(), None);
        technician.id = id.to_string();
        technician.status = status;
        self.state.technician_repo.create(&technician).await.unwrap()
    }

    pub async fn seed_appointment(
        &self,
        id: &str,
        service_id: &str,
        technician_id: &str,
        date: &str,
        time: &str,
        status: AppointmentStatus,
    ) -> Appointment {
        let mut appointment = Appointment::new(NewAppointmentParams {
            customer_id: None,
            customer_name: "Linh Nguyen".to_string(),
            customer_phone: "555-0100".to_string(),
            customer_note: None,
            service_id: service_id.to_string(),
            add_ons: BTreeSet::new(),
            technician_id: technician_id.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            status,
            total_price: 0,
        });
        appointment.id = id.to_string();
        self.state.appointment_repo.create(&appointment).await.unwrap()
    }

    /// Catalog and appointments used by most scenarios: A1 for t1 at
    /// 2024-05-01 10:00 and a confirmed booking for t2 at 11:00.
    pub async fn seed_salon(&self) {
        self.seed_service("svc-haircut", "Haircut", 500, &[("scrub", 100), ("oil", 50)]).await;
        self.seed_service("svc-manicure", "Manicure", 300, &[("polish", 80)]).await;
        self.seed_technician("t1", "Anh", TechnicianStatus::Available).await;
        self.seed_technician("t2", "Binh", TechnicianStatus::Available).await;
        self.seed_technician("t3", "Chau", TechnicianStatus::OnLeave).await;
        self.seed_appointment("A1", "svc-haircut", "t1", "2024-05-01", "10:00", AppointmentStatus::Confirmed).await;
        self.seed_appointment("A2", "svc-manicure", "t2", "2024-05-01", "11:00", AppointmentStatus::Confirmed).await;
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Record store wrapper that can hold calls at a gate or make them fail.
#[allow(dead_code)]
pub struct ScriptedStore {
    inner: Arc<dyn RecordStore>,
    pub load_entered: Notify,
    pub load_gate: Notify,
    pub update_entered: Notify,
    pub update_gate: Notify,
    pub conflicts_entered: Notify,
    pub conflicts_gate: Notify,
    pub conflicts_returned: Notify,
    pub gate_loads: AtomicBool,
    pub gate_updates: AtomicBool,
    pub gate_conflicts: AtomicBool,
    pub fail_loads: AtomicBool,
    pub fail_updates: AtomicBool,
    pub fail_conflicts: AtomicBool,
    pub update_calls: AtomicUsize,
    pub conflict_checks_returned: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            load_entered: Notify::new(),
            load_gate: Notify::new(),
            update_entered: Notify::new(),
            update_gate: Notify::new(),
            conflicts_entered: Notify::new(),
            conflicts_gate: Notify::new(),
            conflicts_returned: Notify::new(),
            gate_loads: AtomicBool::new(false),
            gate_updates: AtomicBool::new(false),
            gate_conflicts: AtomicBool::new(false),
            fail_loads: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fail_conflicts: AtomicBool::new(false),
            update_calls: AtomicUsize::new(0),
            conflict_checks_returned: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        if self.gate_loads.load(Ordering::SeqCst) {
            self.load_entered.notify_one();
            self.load_gate.notified().await;
        }
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("connection refused".into()));
        }
        self.inner.get_appointment(id).await
    }

    async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        self.inner.list_services().await
    }

    async fn list_available_technicians(&self) -> Result<Vec<Technician>, AppError> {
        self.inner.list_available_technicians().await
    }

    async fn find_conflicting_technician_ids(&self, date: &str, time: &str, exclude_id: &str) -> Result<BTreeSet<String>, AppError> {
        if self.gate_conflicts.load(Ordering::SeqCst) {
            self.conflicts_entered.notify_one();
            self.conflicts_gate.notified().await;
        }
        let result = if self.fail_conflicts.load(Ordering::SeqCst) {
            Err(AppError::InternalWithMsg("query timed out".into()))
        } else {
            self.inner.find_conflicting_technician_ids(date, time, exclude_id).await
        };
        self.conflict_checks_returned.fetch_add(1, Ordering::SeqCst);
        self.conflicts_returned.notify_one();
        result
    }

    async fn update_appointment(&self, id: &str, draft: &EditDraft) -> Result<Appointment, AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.gate_updates.load(Ordering::SeqCst) {
            self.update_entered.notify_one();
            self.update_gate.notified().await;
        }
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("disk I/O error".into()));
        }
        self.inner.update_appointment(id, draft).await
    }
}
