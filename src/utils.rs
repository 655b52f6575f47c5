pub mod string;
pub mod title;

pub use string::{main_title, normalize_name};
pub use title::{clean_channel_name, parse_video_title};
