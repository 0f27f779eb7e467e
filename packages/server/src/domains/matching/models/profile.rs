//! Company search profile - a company's standing statement of the applicant
//! criteria it wants to be notified about.
//!
//! Profiles are owned and mutated by the external directory service; the
//! matching core only ever reads them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::applicant::EmploymentType;

/// One search profile per company, upserted by company action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearchProfile {
    pub company_id: Uuid,
    /// Absent or empty means the profile cannot match anyone (fail-closed).
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub desired_skill_tags: Vec<String>,
    /// Empty set is a wildcard: any applicant preference matches.
    #[serde(default)]
    pub desired_employment_types: Vec<EmploymentType>,
    /// Absent means no salary floor.
    #[serde(default)]
    pub desired_salary_min: Option<Decimal>,
    /// Absent means unbounded.
    #[serde(default)]
    pub desired_salary_max: Option<Decimal>,
    /// Absent is a wildcard. Compared by case-insensitive equality, not an
    /// ordered "at least" relation.
    #[serde(default)]
    pub desired_min_education_degree: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sparse_profile() {
        let json = serde_json::json!({
            "companyId": "0191c6a0-0000-7000-8000-0000000000aa",
            "desiredSkillTags": ["kafka"]
        });

        let profile: CompanySearchProfile = serde_json::from_value(json).unwrap();
        assert!(profile.country.is_none());
        assert!(profile.desired_employment_types.is_empty());
        assert!(profile.desired_salary_min.is_none());
        assert!(profile.desired_min_education_degree.is_none());
    }
}
