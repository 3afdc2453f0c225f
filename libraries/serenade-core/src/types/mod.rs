mod ids;
mod media;
mod settings;

pub use ids::MediaId;
pub use media::{Image, MediaData, NewImage, NewTrack, Track};
pub use settings::{format_start_date, parse_start_date, SiteSettings, START_DATE_FORMAT};
