pub mod fetcher;
pub mod search;
pub mod throttle;
pub mod volume;

pub use fetcher::{parse_blog_url, BlogFetcher};
pub use search::{match_in_page, SearchClient, SearchItem, SearchResponse, PAGE_SIZE, RANK_HORIZON};
pub use throttle::Throttle;
pub use volume::{sign, VolumeClient};
