//! The video transformation pipeline: raw records in, ranked feed out.

pub mod hype;
pub mod numeric;
pub mod published_at;
pub mod ranking;
pub mod raw;
pub mod source;

pub use hype::calculate_hype;
pub use numeric::parse_count;
pub use published_at::format_published_at;
pub use ranking::{RankedVideo, VideoRankingPipeline};
pub use raw::{RawVideoRecord, VideoListDocument};
pub use source::VideoDataSource;
