pub mod outcome;

pub use outcome::{predict_outcome, MatchState, PredictionResult};
