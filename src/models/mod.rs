pub mod account;
pub mod candle;
pub mod signal;

pub use account::{AccountState, Position, Side};
pub use candle::Candle;
pub use signal::{ElderRaySnapshot, EvaluationReport, SignalDirection};
