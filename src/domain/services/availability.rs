use crate::domain::models::appointment::Appointment;
use std::collections::BTreeSet;

/// Technician ids already committed to the slot, ignoring the appointment
/// being edited and anything not holding the slot.
pub fn conflicting_technicians(slot_appointments: &[Appointment], exclude_id: &str) -> BTreeSet<String> {
    slot_appointments
        .iter()
        .filter(|a| a.id != exclude_id)
        .filter(|a| a.status.is_occupying())
        .map(|a| a.technician_id.clone())
        .collect()
}

/// Both parts of a slot must be present before a lookup is worth doing.
pub fn normalize_slot<'a>(date: &'a str, time: &'a str) -> Option<(&'a str, &'a str)> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() || time.is_empty() {
        None
    } else {
        Some((date, time))
    }
}
