//! Clinic Concierge - Conversational Appointment Booking
//!
//! This crate implements a state-machine-driven booking assistant for a
//! dental clinic: it extracts structured patient information from free-form
//! dialogue and hands completed bookings to external collaborators.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
