//! Configuration types for the payroll service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Assignment, AttendanceRecord};

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on (e.g. "0.0.0.0:8080").
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Default tracing filter, used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            log_level: default_log_level(),
        }
    }
}

/// Contents of `service.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// An assignment listed in `seed.yaml`. The id is generated when omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedAssignment {
    /// Fixed id for the assignment.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// The assigned employee.
    pub employee_id: String,
    /// The project.
    pub project_id: String,
    /// The employee's role on the project.
    #[serde(default)]
    pub role: String,
    /// Monthly salary.
    pub monthly_salary: Decimal,
    /// First day of the assignment.
    pub start_date: NaiveDate,
    /// Last day of the assignment, if any.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl From<SeedAssignment> for Assignment {
    fn from(seed: SeedAssignment) -> Self {
        Assignment {
            id: seed.id.unwrap_or_else(Uuid::new_v4),
            employee_id: seed.employee_id,
            project_id: seed.project_id,
            role: seed.role,
            monthly_salary: seed.monthly_salary,
            start_date: seed.start_date,
            end_date: seed.end_date,
        }
    }
}

/// A run of consecutive attendance days listed in `seed.yaml`.
///
/// The first status applies to `start_date`, the next to the following day,
/// and so on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedAttendance {
    /// The employee.
    pub employee_id: String,
    /// The project worked on.
    pub project_id: String,
    /// Day of the first status.
    pub start_date: NaiveDate,
    /// One status code per consecutive day.
    pub statuses: Vec<String>,
}

impl SeedAttendance {
    /// Expands the run into one attendance record per day.
    pub fn to_records(&self) -> Vec<AttendanceRecord> {
        self.statuses
            .iter()
            .enumerate()
            .filter_map(|(offset, status)| {
                let date = self.start_date.checked_add_days(Days::new(offset as u64))?;
                Some(AttendanceRecord {
                    id: Uuid::new_v4(),
                    employee_id: self.employee_id.clone(),
                    project_id: self.project_id.clone(),
                    date,
                    status: status.clone(),
                })
            })
            .collect()
    }
}

/// Contents of the optional `seed.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SeedData {
    /// Assignments to register at start-up.
    #[serde(default)]
    pub assignments: Vec<SeedAssignment>,
    /// Attendance to record at start-up.
    #[serde(default)]
    pub attendance: Vec<SeedAttendance>,
}

impl SeedData {
    /// Returns true if there is nothing to seed.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.attendance.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults_apply_to_empty_service_file() {
        let config: ServiceConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.server.log_level, "info");
    }

    #[test]
    fn test_seed_attendance_expands_consecutive_days() {
        let seed = SeedAttendance {
            employee_id: "emp_001".to_string(),
            project_id: "prj_001".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(),
            statuses: vec!["P".to_string(), "SL".to_string(), "W".to_string()],
        };

        let records = seed.to_records();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].status, "SL");
        assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn test_seed_assignment_generates_missing_id() {
        let yaml = r#"
employee_id: emp_001
project_id: prj_001
monthly_salary: "300000"
start_date: 2025-06-01
"#;
        let seed: SeedAssignment = serde_yaml::from_str(yaml).unwrap();
        let assignment: Assignment = seed.into();

        assert!(!assignment.id.is_nil());
        assert_eq!(assignment.monthly_salary, Decimal::new(300_000, 0));
        assert_eq!(assignment.end_date, None);
    }
}
