pub mod d400_usage_metrics;
