/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monotonic client-side instant in milliseconds (e.g. `performance.now()`).
pub type Millis = u64;

/// Fixed container extension of every participant video file.
pub const VIDEO_EXTENSION: &str = "mp4";

/// MIME type served for participant videos.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// File name of a participant video on disk or at the media origin.
pub fn video_file_name(file_id: &str) -> String {
    format!("{file_id}.{VIDEO_EXTENSION}")
}
