pub mod calendars;
pub mod client;
pub mod contacts;
pub mod events;
pub mod folders;
pub mod messages;
pub mod models;
pub mod validation;

pub use client::{Endpoint, GraphClient, GraphRequest, GraphResponse};
