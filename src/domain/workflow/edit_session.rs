use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{watch, Notify};
use tracing::{debug, info, warn};
use crate::domain::models::{
    appointment::Appointment,
    draft::{DraftEdit, EditDraft, Reaction},
    service::Service,
    technician::Technician,
};
use crate::domain::ports::RecordStore;
use crate::domain::services::pricing::total_price;
use crate::domain::workflow::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Loading,
    Ready,
    Submitting,
    Done,
    NotFound,
    LoadFailed,
}

/// Everything a bound UI reads. Published through a watch channel on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub draft: Option<EditDraft>,
    pub services: Vec<Service>,
    pub technicians: Vec<Technician>,
    pub total_price: i64,
    pub conflicts: BTreeSet<String>,
    pub availability_pending: bool,
    pub error: Option<String>,
    pub saved: Option<Appointment>,
}

impl WorkflowSnapshot {
    fn loading() -> Self {
        Self {
            state: WorkflowState::Loading,
            draft: None,
            services: Vec::new(),
            technicians: Vec::new(),
            total_price: 0,
            conflicts: BTreeSet::new(),
            availability_pending: false,
            error: None,
            saved: None,
        }
    }

    fn recompute_price(&mut self) {
        self.total_price = match &self.draft {
            Some(draft) => {
                let service = self.services.iter().find(|s| s.id == draft.service_id);
                total_price(service, &draft.add_ons)
            }
            None => 0,
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianChoice {
    pub technician: Technician,
    /// Already booked in the draft's slot. Selectable, but should be marked.
    pub conflicting: bool,
}

struct Shared {
    snapshot: watch::Sender<WorkflowSnapshot>,
    disposed: AtomicBool,
    /// Woken on dispose, since disposal itself publishes nothing.
    disposal: Notify,
    load_started: AtomicBool,
    availability_seq: AtomicU64,
}

impl Shared {
    /// Runs `f` against the snapshot unless the session is disposed. `f` returns
    /// whether it changed anything (subscribers are only woken if so) and a value.
    fn modify<T>(&self, f: impl FnOnce(&mut WorkflowSnapshot) -> (bool, T)) -> Result<T, WorkflowError> {
        let mut out = None;
        self.snapshot.send_if_modified(|snapshot| {
            if self.disposed.load(Ordering::Acquire) {
                return false;
            }
            let (changed, value) = f(snapshot);
            out = Some(value);
            changed
        });
        out.ok_or(WorkflowError::Disposed)
    }
}

/// One appointment edit session: load, edit with live price and conflict
/// feedback, submit. Mutators and `load` must run inside a Tokio runtime.
pub struct EditWorkflow {
    appointment_id: String,
    store: Arc<dyn RecordStore>,
    shared: Arc<Shared>,
}

impl EditWorkflow {
    pub fn new(store: Arc<dyn RecordStore>, appointment_id: impl Into<String>) -> Self {
        let (snapshot, _) = watch::channel(WorkflowSnapshot::loading());
        Self {
            appointment_id: appointment_id.into(),
            store,
            shared: Arc::new(Shared {
                snapshot,
                disposed: AtomicBool::new(false),
                disposal: Notify::new(),
                load_started: AtomicBool::new(false),
                availability_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    pub fn state(&self) -> WorkflowState {
        self.shared.snapshot.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.shared.snapshot.subscribe()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::Acquire)
    }

    /// Tears the session down. Results of anything still in flight are dropped.
    pub fn dispose(&self) {
        // Flip the flag under the channel's write lock so no publish can interleave.
        self.shared.snapshot.send_if_modified(|_| {
            self.shared.disposed.store(true, Ordering::Release);
            false
        });
        self.shared.disposal.notify_waiters();
    }

    /// Fetches the appointment, catalog and roster. Runs at most once per session.
    pub async fn load(&self) -> Result<(), WorkflowError> {
        self.shared.modify(|s| match s.state {
            WorkflowState::Loading if self.shared.load_started.swap(true, Ordering::AcqRel) => {
                (false, Err(WorkflowError::InvalidState(WorkflowState::Loading)))
            }
            WorkflowState::Loading => (false, Ok(())),
            other => (false, Err(WorkflowError::InvalidState(other))),
        })??;

        let result = tokio::try_join!(
            self.store.get_appointment(&self.appointment_id),
            self.store.list_services(),
            self.store.list_available_technicians(),
        );

        if self.is_disposed() {
            debug!("Discarding load result for disposed session {}", self.appointment_id);
            return Err(WorkflowError::Disposed);
        }

        match result {
            Err(e) => {
                let err = WorkflowError::load_failure(&e);
                self.shared.modify(|s| {
                    s.state = WorkflowState::LoadFailed;
                    s.error = Some(err.to_string());
                    (true, ())
                })?;
                Err(err)
            }
            Ok((None, _, _)) => {
                info!("Appointment {} not found, closing edit session", self.appointment_id);
                self.shared.modify(|s| {
                    s.state = WorkflowState::NotFound;
                    s.error = Some(WorkflowError::NotFound.to_string());
                    (true, ())
                })?;
                Err(WorkflowError::NotFound)
            }
            Ok((Some(appointment), services, technicians)) => {
                self.shared.modify(|s| {
                    s.draft = Some(EditDraft::from_appointment(&appointment));
                    s.services = services;
                    s.technicians = technicians;
                    s.state = WorkflowState::Ready;
                    s.error = None;
                    s.recompute_price();
                    (true, ())
                })?;
                self.refresh_availability();
                Ok(())
            }
        }
    }

    /// Applies one form mutation and triggers whatever it affects.
    pub fn edit(&self, edit: DraftEdit) -> Result<(), WorkflowError> {
        let reaction = self.shared.modify(|s| {
            if s.state != WorkflowState::Ready {
                return (false, Err(WorkflowError::InvalidState(s.state)));
            }
            let Some(draft) = s.draft.as_mut() else {
                return (false, Err(WorkflowError::InvalidState(s.state)));
            };
            let reaction = draft.apply(edit);
            if reaction == Reaction::RecomputePrice {
                s.recompute_price();
            }
            (true, Ok(reaction))
        })??;

        if reaction == Reaction::RecheckAvailability {
            self.refresh_availability();
        }
        Ok(())
    }

    pub fn set_customer_name(&self, value: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::CustomerName(value.into()))
    }

    pub fn set_customer_phone(&self, value: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::CustomerPhone(value.into()))
    }

    pub fn set_customer_note(&self, value: Option<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::CustomerNote(value))
    }

    pub fn set_service(&self, service_id: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::Service(service_id.into()))
    }

    pub fn toggle_add_on(&self, name: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::ToggleAddOn(name.into()))
    }

    pub fn set_technician(&self, technician_id: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::Technician(technician_id.into()))
    }

    pub fn set_date(&self, date: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::Date(date.into()))
    }

    pub fn set_time(&self, time: impl Into<String>) -> Result<(), WorkflowError> {
        self.edit(DraftEdit::Time(time.into()))
    }

    pub fn technician_choices(&self) -> Vec<TechnicianChoice> {
        let snapshot = self.shared.snapshot.borrow();
        snapshot
            .technicians
            .iter()
            .map(|t| TechnicianChoice {
                technician: t.clone(),
                conflicting: snapshot.conflicts.contains(&t.id),
            })
            .collect()
    }

    /// Waits until the most recent availability check has landed, or the
    /// session is disposed.
    pub async fn availability_settled(&self) -> Result<(), WorkflowError> {
        let disposed = self.shared.disposal.notified();
        tokio::pin!(disposed);
        disposed.as_mut().enable();
        if self.is_disposed() {
            return Err(WorkflowError::Disposed);
        }

        let mut rx = self.subscribe();
        tokio::select! {
            settled = rx.wait_for(|s| !s.availability_pending) => {
                settled.map(|_| ()).map_err(|_| WorkflowError::Disposed)
            }
            _ = &mut disposed => Err(WorkflowError::Disposed),
        }
    }

    /// Sends the draft to the update action. Only one submission may be in
    /// flight; on failure the draft is kept and the session is editable again.
    pub async fn submit(&self) -> Result<Appointment, WorkflowError> {
        let draft = self.shared.modify(|s| {
            match s.state {
                WorkflowState::Ready => {}
                WorkflowState::Submitting => return (false, Err(WorkflowError::SubmitInFlight)),
                other => return (false, Err(WorkflowError::InvalidState(other))),
            }
            let Some(draft) = s.draft.clone() else {
                return (false, Err(WorkflowError::InvalidState(s.state)));
            };
            if let Err(e) = draft.validate() {
                let err = WorkflowError::from_write(e);
                s.error = Some(err.to_string());
                return (true, Err(err));
            }
            s.state = WorkflowState::Submitting;
            s.error = None;
            (true, Ok(draft))
        })??;

        let result = self.store.update_appointment(&self.appointment_id, &draft).await;

        let outcome = self.shared.modify(|s| match result {
            Ok(appointment) => {
                s.state = WorkflowState::Done;
                s.draft = None;
                s.saved = Some(appointment.clone());
                (true, Ok(appointment))
            }
            Err(e) => {
                let err = WorkflowError::from_write(e);
                s.state = WorkflowState::Ready;
                s.error = Some(err.to_string());
                (true, Err(err))
            }
        });

        match outcome {
            Ok(Ok(appointment)) => {
                info!("Edit session for {} saved", appointment.id);
                Ok(appointment)
            }
            Ok(Err(err)) => Err(err),
            Err(disposed) => {
                debug!("Discarding submit result for disposed session {}", self.appointment_id);
                Err(disposed)
            }
        }
    }

    fn refresh_availability(&self) {
        let seq = self.shared.availability_seq.fetch_add(1, Ordering::AcqRel) + 1;

        let slot = self.shared.snapshot.borrow().draft.as_ref()
            .and_then(|d| d.slot().map(|(date, time)| (date.to_string(), time.to_string())));

        let Some((date, time)) = slot else {
            let _ = self.shared.modify(|s| {
                s.conflicts.clear();
                s.availability_pending = false;
                (true, ())
            });
            return;
        };

        if self.shared.modify(|s| {
            s.availability_pending = true;
            (true, ())
        }).is_err() {
            return;
        }

        let shared = self.shared.clone();
        let store = self.store.clone();
        let appointment_id = self.appointment_id.clone();

        tokio::spawn(async move {
            let conflicts = match store.find_conflicting_technician_ids(&date, &time, &appointment_id).await {
                Ok(conflicts) => conflicts,
                Err(e) => {
                    let err = WorkflowError::AvailabilityCheck(e.to_string());
                    warn!("{} ({} {}), assuming no conflicts", err, date, time);
                    BTreeSet::new()
                }
            };

            let _ = shared.modify(|s| {
                if shared.availability_seq.load(Ordering::Acquire) != seq {
                    return (false, ());
                }
                s.conflicts = conflicts;
                s.availability_pending = false;
                (true, ())
            });
        });
    }
}

impl Drop for EditWorkflow {
    fn drop(&mut self) {
        self.dispose();
    }
}
