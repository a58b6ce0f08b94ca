pub mod tracking_dto;

pub use tracking_dto::*;
