//! Species taxonomy: fetching, parsing and caching

mod cache;
mod entry;
mod fetcher;
mod parser;

pub use cache::{
    CacheState, DEFAULT_TTL, TaxonomyCache, TaxonomyCacheConfig, TaxonomyStats,
    spawn_refresh_task,
};
pub use entry::{LookupResult, TaxonomyEntry, TaxonomyTable};
pub use fetcher::TaxonomyFetcher;
pub use parser::{CsvParser, MIN_FIELDS, NaiveParser, ParserKind, TaxonomyParser};
