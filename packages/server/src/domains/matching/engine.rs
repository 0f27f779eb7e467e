//! Pure matching evaluator.
//!
//! No side effects, no I/O. Orchestration (fetching profiles, emitting match
//! events) lives in the consumer; this module only answers "does this
//! applicant satisfy this profile" so it can be tested exhaustively.
//!
//! Criteria are evaluated in a fixed short-circuit order: country, skill
//! overlap, employment-type overlap, salary overlap, education. All string
//! comparisons are case-insensitive.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::models::{ApplicantSnapshot, CompanySearchProfile};

/// Evaluate one applicant snapshot against one company search profile.
pub fn matches(applicant: &ApplicantSnapshot, profile: &CompanySearchProfile) -> bool {
    country_matches(applicant, profile)
        && skills_overlap(applicant, profile)
        && employment_matches(applicant, profile)
        && salary_overlaps(applicant, profile)
        && education_matches(applicant, profile)
}

/// Evaluate an applicant against every profile, projecting the qualifying
/// company ids. Output preserves the relative order of `profiles`, so a fixed
/// input always yields an identical, identically-ordered result.
pub fn find_matching_companies(
    applicant: &ApplicantSnapshot,
    profiles: &[CompanySearchProfile],
) -> Vec<Uuid> {
    profiles
        .iter()
        .filter(|profile| matches(applicant, profile))
        .map(|profile| profile.company_id)
        .collect()
}

/// Both countries must be present, non-empty, and equal ignoring case.
/// A profile without a country matches nobody (fail-closed).
fn country_matches(applicant: &ApplicantSnapshot, profile: &CompanySearchProfile) -> bool {
    match profile.country.as_deref() {
        Some(desired) if !desired.is_empty() => {
            !applicant.country.is_empty() && applicant.country.eq_ignore_ascii_case(desired)
        }
        _ => false,
    }
}

/// Both tag sets must be non-empty and share at least one tag ignoring case.
fn skills_overlap(applicant: &ApplicantSnapshot, profile: &CompanySearchProfile) -> bool {
    !applicant.skill_tags.is_empty()
        && !profile.desired_skill_tags.is_empty()
        && applicant.skill_tags.iter().any(|tag| {
            profile
                .desired_skill_tags
                .iter()
                .any(|desired| tag.eq_ignore_ascii_case(desired))
        })
}

/// An empty profile set is a wildcard. A non-empty set requires overlap, so
/// an applicant with no stated preference fails this branch.
fn employment_matches(applicant: &ApplicantSnapshot, profile: &CompanySearchProfile) -> bool {
    if profile.desired_employment_types.is_empty() {
        return true;
    }

    applicant
        .employment_preferences
        .iter()
        .any(|preference| profile.desired_employment_types.contains(preference))
}

/// An applicant with no stated salary expectation passes unconditionally.
/// Otherwise the intervals [applicant_min, applicant_max] and
/// [profile_min, profile_max] must overlap, with missing bounds treated as
/// unbounded in that direction (profile_min defaults to zero).
fn salary_overlaps(applicant: &ApplicantSnapshot, profile: &CompanySearchProfile) -> bool {
    if !applicant.has_salary_expectation() {
        return true;
    }

    let profile_min = profile.desired_salary_min.unwrap_or(Decimal::ZERO);

    if let Some(applicant_max) = applicant.expected_salary_max {
        if applicant_max < profile_min {
            return false;
        }
    }

    if let (Some(applicant_min), Some(profile_max)) =
        (applicant.expected_salary_min, profile.desired_salary_max)
    {
        if applicant_min > profile_max {
            return false;
        }
    }

    true
}

/// A profile without a degree requirement is a wildcard. With one, the
/// applicant's degree must be present and equal ignoring case - deliberately
/// an exact comparison, not an ordered "at least" relation.
fn education_matches(applicant: &ApplicantSnapshot, profile: &CompanySearchProfile) -> bool {
    match profile.desired_min_education_degree.as_deref() {
        None => true,
        Some(required) => applicant
            .highest_education_degree
            .as_deref()
            .is_some_and(|degree| degree.eq_ignore_ascii_case(required)),
    }
}
