//! Job-shop domain models.
//!
//! Provides the data types for representing a job-shop instance and its
//! solutions.
//!
//! # Domain Mappings
//!
//! | u-jobshop | Manufacturing | Healthcare | Logistics |
//! |-----------|--------------|------------|-----------|
//! | Job | Order | Patient Case | Shipment |
//! | Operation | Routing Step | Procedure | Transport Leg |
//! | Machine | Work Center | Room | Dock |
//! | Schedule | Production Plan | OR Schedule | Route Plan |

mod job;
mod operation;
mod problem;
mod schedule;

pub use job::{Job, JobSpec};
pub use operation::Operation;
pub use problem::ProblemModel;
pub use schedule::{Assignment, Schedule, Violation, ViolationType};
