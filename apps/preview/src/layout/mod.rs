// Page layout: block model, measurement capability, and the pagination
// estimator that predicts where the print engine breaks pages.
// Layout is CPU-bound; async callers run it inside tokio::task::spawn_blocking.

pub mod block;
pub mod font_metrics;
pub mod html;
pub mod measure;
pub mod metric_measurer;
pub mod paginator;

// Re-export the API the CLI and preview driver consume.
pub use metric_measurer::MetricMeasurer;
pub use paginator::Paginator;
