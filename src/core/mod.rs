pub mod engine;
pub mod events;
pub mod runner;

pub use crate::domain::model::{
    Assignment, AssignmentRow, DrawInput, DrawResult, Participant, PriorAssignments,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
