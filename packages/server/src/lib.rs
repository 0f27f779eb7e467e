// Talent Match Notifier - Matching Core
//
// This crate implements the event-driven pipeline that notifies companies in
// near-real time when a newly registered applicant satisfies their search
// profile: applicant-created events in, one match event per qualifying
// company out, each match landing as a deduplicated notification with a
// best-effort real-time push.
//
// Applicant/company CRUD, auth, and billing are external collaborators; the
// core only consumes their events and the profile directory.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
