pub mod atr;
pub mod elder;
pub mod ema;

pub use atr::{calculate_atr, true_range};
pub use elder::{calculate_elder_ray, ElderRayParams};
pub use ema::calculate_ema;
