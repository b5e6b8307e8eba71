pub mod auth;
pub mod images;
pub mod lanes;
pub mod memories;
pub mod tags;
