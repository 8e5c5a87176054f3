//! Per-event orchestration: session guards, menu flow, media ingestion,
//! and the translation round-trip.

pub mod engine;
pub mod menu;

pub use engine::{Orchestrator, MAX_VIDEO_BYTES};
