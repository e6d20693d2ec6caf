//! KYC Document Verification
//!
//! This library accepts identity document uploads and verifies them in the
//! background against an external document recognition service. It enforces
//! the user's declared document type and rejects near-duplicates of
//! previously submitted images by perceptual-hash distance.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
