mod download;
mod path;

pub use download::{DownloadContext, download_episode};
pub use path::{episode_filename, episode_path, slug};
