pub mod daily_record;
pub mod distribution;
pub mod location;
pub mod metadata;
pub mod popular_location;
pub mod summary;
