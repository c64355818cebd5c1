pub mod edit_session;
pub mod error;

pub use edit_session::{EditWorkflow, TechnicianChoice, WorkflowSnapshot, WorkflowState};
pub use error::WorkflowError;
