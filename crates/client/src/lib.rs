//! Controllers gluing the CleanCity collaborators together.
//!
//! Each controller exclusively owns its form state and publishes immutable
//! state snapshots over a watch channel; the UI layer subscribes and renders.
//! Last value wins, transitions arrive in order.

#[macro_use]
extern crate log;

#[macro_use]
extern crate cleancity_result;

pub mod auth;
pub mod feed;
pub mod submission;
pub mod validate;

pub use auth::AuthController;
pub use feed::FeedController;
pub use submission::SubmissionController;
