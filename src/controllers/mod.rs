pub mod tracking_controller;

pub use tracking_controller::TrackingController;
