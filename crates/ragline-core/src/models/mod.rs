mod branch;
mod cache_entry;
mod degradation_event;
mod filter;
mod hit;
mod report;
mod request;
mod result;

pub use branch::{BranchOutcome, BranchReport, BranchSettlement, BranchStatus};
pub use cache_entry::{CacheEntry, CacheHitTier, CacheScope};
pub use degradation_event::DegradationEvent;
pub use filter::{IndustryConstraint, SearchFilter};
pub use hit::{HitMetadata, IndexHit};
pub use report::SearchReport;
pub use request::{Environment, Industry, IntensityMode, SearchRequest};
pub use result::{BranchKind, RankedCandidate, RelatedAsset, RetrievalResult};
