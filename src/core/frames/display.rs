//! UI 文案

use crate::api::models::frames::{FrameDescriptor, Session};

pub const WAITING_FOR_BACKEND: &str = "Waiting for backend";
pub const WAITING_FOR_UPLOAD: &str = "Waiting for upload.";
pub const CHOOSE_FILE: &str = "Choose video file";

pub fn pad_index(index: u64) -> String {
    format!("{:06}", index)
}

/// 列表项标题，例如 `Frame 000042`
pub fn frame_label(frame: &FrameDescriptor) -> String {
    format!("Frame {}", pad_index(frame.index))
}

/// 当前帧位置，例如 `Frame 3 / 150`
pub fn position_label(position: usize, total: u64) -> String {
    format!("Frame {} / {}", position + 1, total)
}

pub fn meta_label(session: &Session) -> String {
    format!(
        "Video ID: {} | Frames: {} | FPS: {}",
        session.video_id, session.total_frame_count, session.frames_per_second
    )
}

pub fn frame_count_label(total: u64) -> String {
    format!("{} frames", total)
}

pub fn file_label(file_name: Option<&str>) -> String {
    match file_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => CHOOSE_FILE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let frame = FrameDescriptor {
            index: 42,
            url: "/static/frames/v1/000042.jpg".to_string(),
            resolved_url: "http://localhost:8000/static/frames/v1/000042.jpg".to_string(),
        };
        assert_eq!(frame_label(&frame), "Frame 000042");
        assert_eq!(position_label(2, 150), "Frame 3 / 150");
        assert_eq!(frame_count_label(150), "150 frames");
        assert_eq!(pad_index(1234567), "1234567");
    }

    #[test]
    fn test_meta_label() {
        let session = Session {
            video_id: "abc".to_string(),
            total_frame_count: 150,
            frames_per_second: 30.0,
        };
        assert_eq!(meta_label(&session), "Video ID: abc | Frames: 150 | FPS: 30");

        let ntsc = Session {
            frames_per_second: 29.97,
            ..session
        };
        assert!(meta_label(&ntsc).ends_with("FPS: 29.97"));
    }

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Some("clip.mp4")), "clip.mp4");
        assert_eq!(file_label(Some("")), "Choose video file");
        assert_eq!(file_label(None), "Choose video file");
    }
}
