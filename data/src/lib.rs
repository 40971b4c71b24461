pub mod dataset;
pub mod scale;
pub mod selection;
pub mod transition;
pub mod util;
pub mod view;

pub use dataset::{Dataset, LoadError, Record};
pub use selection::{Metric, Selection};
pub use view::{Domains, ViewModel, compute_view};
