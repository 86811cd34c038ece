pub mod config;
pub mod logging;

pub mod carbon;
pub mod error;
pub mod fetch;
pub mod html;
pub mod measure;
pub mod page_weight;
pub mod retry;
pub mod store;
pub mod url_model;

pub use carbon::{calculate, Metrics};
pub use error::{Error, FetchError, InvalidInput, StoreError};
pub use measure::{measure, measure_and_record, RecordedReport, Report};
pub use page_weight::{measure_page_weight, PageWeight};
pub use store::{Measurement, MetricsStore, StoreOptions};
pub use url_model::is_valid_url;
