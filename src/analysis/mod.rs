mod dataset;
pub mod literal;
pub mod loader;
pub mod normalize;
pub mod partition;
pub mod sample;

#[cfg(test)]
mod tests;

pub use dataset::{build_dataset, Dataset, DaySlice};
pub use loader::{load_records, read_records};
pub use normalize::{parse_datetime, InvalidDateTimePolicy, Normalizer};
pub use partition::{DayOrder, DayPartition};
pub use sample::{write_sample, SampleSpec};
