//! Tracking en tiempo real de rutas de recogida
//!
//! Gateway WebSocket, registro de topics, ingesta de posiciones con ETA,
//! máquina de estados de waypoints y dispatcher de broadcast.

pub mod api;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
