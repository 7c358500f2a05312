pub mod classifier;

pub use classifier::{SignalClassifier, SignalPolicy, MIN_CANDLES};
