pub mod metrics;
pub mod risk;

pub use metrics::{
    calculate_prediction_accuracy, compare_with_black_scholes, evaluate_model_performance, ComparisonReport,
    MetricsReport, DEFAULT_TOLERANCE,
};
pub use risk::{calculate_expected_shortfall, calculate_value_at_risk, DEFAULT_CONFIDENCE};
