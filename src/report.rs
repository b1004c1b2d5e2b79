//! Result adapter: tabular views and quality metrics of a schedule.
//!
//! Turns a solver's [`Schedule`] into the listings a rendering layer needs
//! (operation table, job summary, per-machine timelines) plus KPIs. All
//! views are plain serializable data; formatting and export are left to
//! the caller.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Machine utilization | Busy time / makespan, per machine |
//! | Avg utilization | Mean of the per-machine utilizations |
//! | Total idle | Sum over machines of makespan - busy time |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::Serialize;

use crate::models::{Assignment, ProblemModel, Schedule};

/// One row of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationRow {
    pub job_id: usize,
    pub operation_index: usize,
    pub machine_id: usize,
    pub start: i64,
    pub end: i64,
    pub duration: i64,
}

impl From<&Assignment> for OperationRow {
    fn from(a: &Assignment) -> Self {
        Self {
            job_id: a.job_id,
            operation_index: a.operation_index,
            machine_id: a.machine_id,
            start: a.start,
            end: a.end,
            duration: a.duration(),
        }
    }
}

/// Per-job summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub job_id: usize,
    /// Scheduled operations of this job.
    pub operation_count: usize,
    /// Start of the job's first operation.
    pub start: i64,
    /// End of the job's last operation.
    pub end: i64,
    /// Sum of the job's operation durations.
    pub total_processing: i64,
    /// `end - start`, including waiting time between operations.
    pub span: i64,
}

/// Operations of one machine in start order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineTimeline {
    pub machine_id: usize,
    pub operations: Vec<OperationRow>,
    /// Total processing time on this machine.
    pub busy: i64,
}

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: i64,
    /// Busy fraction per machine, indexed by machine ID (0.0..1.0).
    pub utilization_by_machine: Vec<f64>,
    /// Mean machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Idle time summed over all machines, up to the makespan.
    pub total_idle: i64,
}

impl ScheduleKpi {
    /// Computes KPIs for `schedule` on `machine_count` machines.
    pub fn calculate(schedule: &Schedule, machine_count: usize) -> Self {
        let makespan = schedule.makespan();
        let utilization_by_machine: Vec<f64> = (0..machine_count)
            .map(|m| schedule.machine_utilization(m, makespan).unwrap_or(0.0))
            .collect();
        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.iter().sum::<f64>() / utilization_by_machine.len() as f64
        };
        let busy: i64 = schedule.assignments.iter().map(Assignment::duration).sum();
        let total_idle = (makespan * machine_count as i64 - busy).max(0);

        Self {
            makespan,
            utilization_by_machine,
            avg_utilization,
            total_idle,
        }
    }

    /// Whether average utilization reaches `min_utilization`.
    pub fn meets_utilization(&self, min_utilization: f64) -> bool {
        self.avg_utilization >= min_utilization
    }
}

/// Everything a rendering layer needs to present a schedule.
///
/// # Example
/// ```
/// use u_jobshop::models::{JobSpec, ProblemModel};
/// use u_jobshop::report::ScheduleReport;
/// use u_jobshop::simulation::simulate;
///
/// let problem = ProblemModel::new(
///     2,
///     vec![
///         JobSpec::new().with_operation(0, 3).with_operation(1, 2),
///         JobSpec::new().with_operation(1, 4).with_operation(0, 1),
///     ],
/// )
/// .unwrap();
/// let schedule = simulate(&problem, &[0, 1, 0, 1]).unwrap();
/// let report = ScheduleReport::new(&problem, &schedule);
/// assert_eq!(report.kpi.makespan, 6);
/// assert_eq!(report.jobs.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    /// Operation table sorted by (job, operation).
    pub operations: Vec<OperationRow>,
    /// One row per scheduled job, by job ID.
    pub jobs: Vec<JobSummary>,
    /// One timeline per machine, by machine ID.
    pub machines: Vec<MachineTimeline>,
    pub kpi: ScheduleKpi,
}

impl ScheduleReport {
    /// Builds every view of `schedule`.
    pub fn new(problem: &ProblemModel, schedule: &Schedule) -> Self {
        let mut operations: Vec<OperationRow> =
            schedule.assignments.iter().map(OperationRow::from).collect();
        operations.sort_by_key(|row| (row.job_id, row.operation_index));

        let jobs = (0..problem.job_count())
            .filter_map(|job_id| summarize_job(schedule, job_id))
            .collect();

        let machines = (0..problem.machine_count())
            .map(|machine_id| {
                let operations: Vec<OperationRow> = schedule
                    .assignments_for_machine(machine_id)
                    .into_iter()
                    .map(OperationRow::from)
                    .collect();
                let busy = operations.iter().map(|row| row.duration).sum();
                MachineTimeline {
                    machine_id,
                    operations,
                    busy,
                }
            })
            .collect();

        Self {
            operations,
            jobs,
            machines,
            kpi: ScheduleKpi::calculate(schedule, problem.machine_count()),
        }
    }

    /// Summary row for `job_id`, if it was scheduled.
    pub fn job(&self, job_id: usize) -> Option<&JobSummary> {
        self.jobs.iter().find(|j| j.job_id == job_id)
    }
}

fn summarize_job(schedule: &Schedule, job_id: usize) -> Option<JobSummary> {
    let assignments = schedule.assignments_for_job(job_id);
    let start = assignments.iter().map(|a| a.start).min()?;
    let end = assignments.iter().map(|a| a.end).max()?;
    Some(JobSummary {
        job_id,
        operation_count: assignments.len(),
        start,
        end,
        total_processing: assignments.iter().map(|a| a.duration()).sum(),
        span: end - start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobSpec;
    use crate::simulation::{simulate, simulate_partial};

    fn two_by_two() -> ProblemModel {
        ProblemModel::new(
            2,
            vec![
                JobSpec::new().with_operation(0, 3).with_operation(1, 2),
                JobSpec::new().with_operation(1, 4).with_operation(0, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_operation_rows_sorted() {
        let p = two_by_two();
        let s = simulate(&p, &[1, 0, 1, 0]).unwrap();
        let report = ScheduleReport::new(&p, &s);
        let keys: Vec<(usize, usize)> = report
            .operations
            .iter()
            .map(|r| (r.job_id, r.operation_index))
            .collect();
        assert_eq!(keys, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(report.operations.iter().all(|r| r.end - r.start == r.duration));
    }

    #[test]
    fn test_job_summaries() {
        let p = two_by_two();
        let s = simulate(&p, &[0, 1, 0, 1]).unwrap();
        let report = ScheduleReport::new(&p, &s);

        // J0: [0,3) on M0, [4,6) on M1
        let j0 = report.job(0).unwrap();
        assert_eq!(j0.operation_count, 2);
        assert_eq!((j0.start, j0.end), (0, 6));
        assert_eq!(j0.total_processing, 5);
        assert_eq!(j0.span, 6);

        // J1: [0,4) on M1, [4,5) on M0
        let j1 = report.job(1).unwrap();
        assert_eq!((j1.start, j1.end), (0, 5));
        assert_eq!(j1.total_processing, 5);
    }

    #[test]
    fn test_machine_timelines() {
        let p = two_by_two();
        let s = simulate(&p, &[0, 1, 0, 1]).unwrap();
        let report = ScheduleReport::new(&p, &s);
        assert_eq!(report.machines.len(), 2);

        let m1 = &report.machines[1];
        assert_eq!(m1.machine_id, 1);
        assert_eq!(m1.busy, 6);
        let starts: Vec<i64> = m1.operations.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0, 4]);
    }

    #[test]
    fn test_kpi() {
        let p = two_by_two();
        let s = simulate(&p, &[0, 1, 0, 1]).unwrap();
        let kpi = ScheduleKpi::calculate(&s, p.machine_count());
        assert_eq!(kpi.makespan, 6);
        // M0 busy 4/6, M1 busy 6/6
        assert!((kpi.utilization_by_machine[0] - 4.0 / 6.0).abs() < 1e-10);
        assert!((kpi.utilization_by_machine[1] - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 10.0 / 12.0).abs() < 1e-10);
        assert_eq!(kpi.total_idle, 2);
        assert!(kpi.meets_utilization(0.8));
        assert!(!kpi.meets_utilization(0.9));
    }

    #[test]
    fn test_empty_schedule() {
        let p = two_by_two();
        let report = ScheduleReport::new(&p, &Schedule::new());
        assert!(report.operations.is_empty());
        assert!(report.jobs.is_empty());
        assert_eq!(report.kpi.makespan, 0);
        assert_eq!(report.kpi.utilization_by_machine, vec![0.0, 0.0]);
        assert_eq!(report.kpi.total_idle, 0);
    }

    #[test]
    fn test_partial_schedule_skips_unscheduled_jobs() {
        let p = two_by_two();
        let s = simulate_partial(&p, &[1]).unwrap();
        let report = ScheduleReport::new(&p, &s);
        assert_eq!(report.jobs.len(), 1);
        assert!(report.job(0).is_none());
        assert_eq!(report.job(1).map(|j| j.end), Some(4));
    }

    #[test]
    fn test_report_serializes() {
        let p = two_by_two();
        let s = simulate(&p, &[0, 1, 0, 1]).unwrap();
        let json = serde_json::to_value(ScheduleReport::new(&p, &s)).unwrap();
        assert_eq!(json["kpi"]["makespan"], 6);
        assert_eq!(json["operations"][0]["duration"], 3);
        assert_eq!(json["machines"][1]["busy"], 6);
    }
}
