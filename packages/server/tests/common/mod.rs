//! Shared fixtures for pipeline integration tests.

use matcher_core::domains::matching::events::ApplicantMatchedEvent;
use matcher_core::domains::matching::models::{
    ApplicantSnapshot, CompanySearchProfile, EmploymentType,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// An applicant snapshot that matches [`profile_for`] with the same country
/// and at least one shared skill.
pub fn applicant(country: &str, skills: &[&str]) -> ApplicantSnapshot {
    ApplicantSnapshot {
        applicant_id: Uuid::new_v4(),
        display_name: "Linh Tran".to_string(),
        country: country.to_string(),
        skill_tags: skills.iter().map(|s| s.to_string()).collect(),
        employment_preferences: vec![EmploymentType::FullTime],
        expected_salary_min: Some(Decimal::from(2000)),
        expected_salary_max: Some(Decimal::from(3000)),
        highest_education_degree: Some("Bachelor".to_string()),
    }
}

/// A wide-open profile for `country` wanting `skills`.
pub fn profile_for(country: &str, skills: &[&str]) -> CompanySearchProfile {
    CompanySearchProfile {
        company_id: Uuid::new_v4(),
        country: Some(country.to_string()),
        desired_skill_tags: skills.iter().map(|s| s.to_string()).collect(),
        desired_employment_types: vec![],
        desired_salary_min: None,
        desired_salary_max: None,
        desired_min_education_degree: None,
    }
}

pub fn created_payload(snapshot: &ApplicantSnapshot) -> Vec<u8> {
    serde_json::to_vec(snapshot).expect("snapshot serializes")
}

pub fn matched_payload(company_id: Uuid, applicant_id: Uuid, applicant_name: &str) -> Vec<u8> {
    serde_json::to_vec(&ApplicantMatchedEvent {
        company_id,
        applicant_id,
        applicant_name: applicant_name.to_string(),
    })
    .expect("event serializes")
}
