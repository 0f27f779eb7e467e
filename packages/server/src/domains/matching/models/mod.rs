pub mod applicant;
pub mod notification;
pub mod profile;

pub use applicant::{ApplicantSnapshot, EmploymentType};
pub use notification::Notification;
pub use profile::CompanySearchProfile;
