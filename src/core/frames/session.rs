use log::info;

use super::error::BrowserError;
use super::pagination::LoadingFlag;
use super::selection::{frame_controls, Selection};
use super::store::FrameStore;
use crate::api::models::frames::{FrameControls, Session, UploadReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// 还没有上传过视频
    Idle,
    Uploading,
    /// 已有可浏览的帧索引
    Ready,
}

/// 单个会话的浏览状态，新会话开始时整体重建
#[derive(Debug, Default)]
pub struct Gallery {
    pub store: FrameStore,
    pub selection: Selection,
    pub loading: LoadingFlag,
}

impl Gallery {
    fn new() -> Self {
        let mut gallery = Self::default();
        gallery.store.reset();
        gallery.selection.clear();
        gallery
    }
}

#[derive(Debug)]
pub struct ActiveSession {
    pub session: Session,
    pub gallery: Gallery,
}

#[derive(Debug, Default)]
pub struct SessionState {
    active: Option<ActiveSession>,
    uploading: bool,
}

impl SessionState {
    pub fn phase(&self) -> LifecyclePhase {
        match (self.uploading, &self.active) {
            (true, _) => LifecyclePhase::Uploading,
            (false, Some(_)) => LifecyclePhase::Ready,
            (false, None) => LifecyclePhase::Idle,
        }
    }

    pub fn begin_upload(&mut self) -> Result<(), BrowserError> {
        if self.uploading {
            return Err(BrowserError::UploadInProgress);
        }
        self.uploading = true;
        Ok(())
    }

    /// 上传失败：保留之前的会话不动
    pub fn upload_failed(&mut self) {
        self.uploading = false;
    }

    /// 上传成功：整体替换会话，帧列表和选择重新开始
    pub fn upload_complete(&mut self, receipt: &UploadReceipt) -> &ActiveSession {
        self.uploading = false;
        let session = Session {
            video_id: receipt.video_id.clone(),
            total_frame_count: receipt.frame_count,
            frames_per_second: receipt.fps,
        };
        if let Some(previous) = &self.active {
            info!(
                "🔁 Replacing session {} with {}",
                previous.session.video_id, session.video_id
            );
        }
        self.active.insert(ActiveSession {
            session,
            gallery: Gallery::new(),
        })
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveSession> {
        self.active.as_mut()
    }

    /// 只有 video_id 匹配时才返回当前会话，用来丢弃过期的分页响应
    pub fn active_for(&mut self, video_id: &str) -> Option<&mut ActiveSession> {
        self.active
            .as_mut()
            .filter(|active| active.session.video_id == video_id)
    }

    pub fn controls(&self) -> FrameControls {
        match &self.active {
            Some(active) => frame_controls(
                Some(&active.gallery.selection),
                Some(&active.gallery.store),
                active.gallery.loading.is_loading(),
                self.uploading,
            ),
            None => frame_controls(None, None, false, self.uploading),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frames::store::make_page;

    fn receipt(video_id: &str, frame_count: u64) -> UploadReceipt {
        UploadReceipt {
            video_id: video_id.to_string(),
            frame_count,
            fps: 30.0,
            message: None,
        }
    }

    #[test]
    fn test_lifecycle_phases() {
        let mut state = SessionState::default();
        assert_eq!(state.phase(), LifecyclePhase::Idle);

        state.begin_upload().expect("首次上传应该允许");
        assert_eq!(state.phase(), LifecyclePhase::Uploading);
        assert!(matches!(
            state.begin_upload(),
            Err(BrowserError::UploadInProgress)
        ));
        assert!(!state.controls().upload_enabled);

        state.upload_complete(&receipt("v1", 150));
        assert_eq!(state.phase(), LifecyclePhase::Ready);
        assert!(state.controls().upload_enabled);
    }

    #[test]
    fn test_failed_upload_keeps_previous_session() {
        let mut state = SessionState::default();
        state.begin_upload().expect("上传应该允许");
        state.upload_complete(&receipt("v1", 150));

        state.begin_upload().expect("上传应该允许");
        state.upload_failed();

        assert_eq!(state.phase(), LifecyclePhase::Ready);
        let active = state.active().expect("应该保留会话");
        assert_eq!(active.session.video_id, "v1");
    }

    #[test]
    fn test_new_upload_rebuilds_gallery() {
        let mut state = SessionState::default();
        state.upload_complete(&receipt("v1", 150));
        {
            let active = state.active_for("v1").expect("会话应存在");
            active.gallery.store.merge(make_page(1, 0, 60, 150));
            active.gallery.selection.set(5, &active.gallery.store);
        }

        let active = state.upload_complete(&receipt("v2", 20));
        assert_eq!(active.session.video_id, "v2");
        assert_eq!(active.session.total_frame_count, 20);
        assert!(active.gallery.store.is_empty());
        assert_eq!(active.gallery.store.loaded_page(), 0);
        assert_eq!(active.gallery.selection.selected_index(), -1);
        assert!(!active.gallery.loading.is_loading());
    }

    #[test]
    fn test_active_for_filters_stale_video() {
        let mut state = SessionState::default();
        state.upload_complete(&receipt("v2", 20));
        assert!(state.active_for("v1").is_none());
        assert!(state.active_for("v2").is_some());
    }
}
