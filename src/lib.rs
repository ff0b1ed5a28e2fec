pub mod branch;
pub mod history;
pub mod predictor;
pub mod sim;
pub mod stats;
pub mod trace;

pub use branch::*;
pub use history::*;
pub use predictor::*;
pub use trace::*;
