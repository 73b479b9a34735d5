pub mod config;
pub mod dataset;
pub mod engine;
pub mod intent;
pub mod map;
pub mod opentopo;
pub mod places;
pub mod risk;
pub mod rng;
pub mod session;
pub mod terrain;
pub mod web;

pub use config::Settings;
pub use engine::{Analysis, AnalysisEngine};
pub use session::Session;
