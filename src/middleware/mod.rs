//! Middleware del sistema
//!
//! La autenticación vive en el handshake del WebSocket; aquí solo queda CORS.

pub mod cors;

pub use cors::*;
