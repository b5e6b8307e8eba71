pub mod auth;
pub mod lanes;
pub mod memories;
pub mod tags;
