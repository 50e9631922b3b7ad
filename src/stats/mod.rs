//! Statistics module - distribution summaries, fits and correlation

mod calculator;
mod regression;

pub use calculator::{
    BoxStats, Histogram, LetterValues, MeanEstimate, StatsCalculator, CONFIDENCE_LEVEL,
};
pub use regression::{complete_pairs, pearson, CorrelationMatrix, LinearFit};
