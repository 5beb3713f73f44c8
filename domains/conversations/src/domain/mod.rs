//! Domain layer: entities, completion orchestration, and the send-turn pipeline

pub mod entities;
pub mod orchestrator;
pub mod service;
