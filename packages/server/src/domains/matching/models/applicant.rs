//! Applicant snapshot - the immutable view of an applicant captured at
//! event-emission time.
//!
//! Snapshots are constructed per inbound event and never persisted here;
//! the applicant CRUD service owns the canonical record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employment arrangements an applicant is open to / a company hires for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
    Freelance,
}

/// Immutable applicant view evaluated against company search profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSnapshot {
    pub applicant_id: Uuid,
    pub display_name: String,
    /// Compared case-insensitively. May be empty, in which case the
    /// applicant matches no profile.
    #[serde(default)]
    pub country: String,
    /// Case-insensitive membership.
    #[serde(default)]
    pub skill_tags: Vec<String>,
    /// May be empty (no stated preference).
    #[serde(default)]
    pub employment_preferences: Vec<EmploymentType>,
    #[serde(default)]
    pub expected_salary_min: Option<Decimal>,
    #[serde(default)]
    pub expected_salary_max: Option<Decimal>,
    #[serde(default)]
    pub highest_education_degree: Option<String>,
}

impl ApplicantSnapshot {
    /// Whether the applicant stated any salary expectation at all.
    pub fn has_salary_expectation(&self) -> bool {
        self.expected_salary_min.is_some() || self.expected_salary_max.is_some()
    }
}
