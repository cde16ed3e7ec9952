use serde::{Deserialize, Serialize};

/// 一次上传成功后的会话信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub video_id: String,
    pub total_frame_count: u64,
    pub frames_per_second: f64,
}

/// 单帧描述（获取后不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    /// 后端给出的帧序号
    pub index: u64,
    /// 后端返回的原始地址（可能是相对路径）
    pub url: String,
    /// 基于服务地址解析后的绝对地址
    pub resolved_url: String,
}

/// 上传接口的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub video_id: String,
    pub frame_count: u64,
    pub fps: f64,
    pub message: Option<String>,
}

/// 一页帧数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePage {
    pub page: u32,
    pub total_frames: u64,
    pub frames: Vec<FrameDescriptor>,
}

/// 导航按钮 / 加载更多 / 上传按钮的可用状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameControls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub load_more_visible: bool,
    pub load_more_enabled: bool,
    pub upload_enabled: bool,
}

/// 推送给 UI 层的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BrowserEvent {
    BackendStatus(String),
    UploadStatus(String),
    UploadProgress(u8),
    SessionStarted {
        session: Session,
        meta_label: String,
        count_label: String,
    },
    FramesAppended {
        /// 本批第一帧在列表中的位置
        first_position: usize,
        frames: Vec<FrameDescriptor>,
        total_frames: u64,
    },
    /// 视频没有抽出任何帧
    GalleryEmpty,
    SelectionChanged {
        position: usize,
        frame: FrameDescriptor,
        label: String,
    },
    ControlsChanged(FrameControls),
}

// Wire formats

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub video_id: String,
    pub frame_count: u64,
    pub fps: f64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FramePageResponse {
    pub page: u32,
    pub total_frames: u64,
    #[serde(default)]
    pub frames: Vec<FrameItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FrameItem {
    pub index: u64,
    pub url: String,
}
