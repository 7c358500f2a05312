pub mod engine;
pub mod ledger;

pub use engine::PaperTradingEngine;
pub use ledger::{PositionLedger, SizingPolicy};
