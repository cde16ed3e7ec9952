//! 帧浏览控制器：串起上传、分页、选择三条流程
//!
//! 状态全部放在一把锁里，锁只在状态转换时持有，网络请求期间不持锁。
//! 分页请求拆成 begin / complete 两步，中间由单飞锁保证同一时刻只有一个请求。

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};

use super::config::BrowserConfig;
use super::display;
use super::error::{BrowserError, TransportError};
use super::observer::BrowserObserver;
use super::pagination::{page_for_position, PageTicket, ScrollMetrics};
use super::selection::{navigation_key, NavigationKey, SelectStep, Selection};
use super::session::{LifecyclePhase, SessionState};
use super::store::FrameStore;
use super::transport::FrameTransport;
use crate::api::models::frames::{BrowserEvent, FrameControls, FrameDescriptor, FramePage, Session};

/// 一次“尝试加载下一页”的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Merged { page: u32, added: usize },
    /// 没有会话、正在加载或已无更多，静默忽略
    Skipped,
    /// 响应返回时会话已被替换，结果丢弃
    Stale,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(usize),
    Dropped,
}

pub struct FrameBrowser<T: FrameTransport, O: BrowserObserver + 'static> {
    transport: T,
    observer: Arc<O>,
    config: BrowserConfig,
    state: Mutex<SessionState>,
}

impl<T: FrameTransport, O: BrowserObserver + 'static> FrameBrowser<T, O> {
    pub fn new(transport: T, observer: Arc<O>, config: BrowserConfig) -> Self {
        Self {
            transport,
            observer,
            config,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// 推送初始状态文案
    pub fn announce(&self) {
        let controls = self.state().controls();
        self.emit_all(vec![
            BrowserEvent::BackendStatus(display::WAITING_FOR_BACKEND.to_string()),
            BrowserEvent::UploadStatus(display::WAITING_FOR_UPLOAD.to_string()),
            BrowserEvent::ControlsChanged(controls),
        ]);
    }

    /// 上传视频；成功后重建会话并拉取第一页
    pub fn upload(&self, path: Option<&Path>) -> Result<Session, BrowserError> {
        let Some(path) = path else {
            self.emit(BrowserEvent::UploadStatus(
                BrowserError::NoFileSelected.to_string(),
            ));
            return Err(BrowserError::NoFileSelected);
        };

        let controls = {
            let mut state = self.state();
            state.begin_upload()?;
            state.controls()
        };
        info!("🎬 Upload started: {:?}", path);
        self.emit_all(vec![
            BrowserEvent::BackendStatus("Uploading...".to_string()),
            BrowserEvent::UploadStatus("Uploading and extracting frames...".to_string()),
            BrowserEvent::UploadProgress(0),
            BrowserEvent::ControlsChanged(controls),
        ]);

        let observer = Arc::clone(&self.observer);
        let on_progress = Box::new(move |percent: u8| {
            observer.on_event(BrowserEvent::UploadProgress(percent));
            observer.on_event(BrowserEvent::UploadStatus(format!(
                "Uploading... {}%",
                percent
            )));
        });

        match self.transport.upload(path, on_progress) {
            Ok(receipt) => {
                let (session, controls) = {
                    let mut state = self.state();
                    let session = state.upload_complete(&receipt).session.clone();
                    (session, state.controls())
                };
                info!(
                    "✅ Extraction complete: video={} frames={} fps={}",
                    session.video_id, session.total_frame_count, session.frames_per_second
                );
                self.emit_all(vec![
                    BrowserEvent::BackendStatus("Extraction complete".to_string()),
                    BrowserEvent::UploadStatus(
                        receipt
                            .message
                            .clone()
                            .filter(|m| !m.is_empty())
                            .unwrap_or_else(|| "Upload complete.".to_string()),
                    ),
                    BrowserEvent::SessionStarted {
                        session: session.clone(),
                        meta_label: display::meta_label(&session),
                        count_label: display::frame_count_label(session.total_frame_count),
                    },
                    BrowserEvent::ControlsChanged(controls),
                ]);

                self.request_next_page();
                Ok(session)
            }
            Err(e) => {
                warn!("❌ Upload failed: {}", e);
                let controls = {
                    let mut state = self.state();
                    state.upload_failed();
                    state.controls()
                };
                let mut events = failure_events(format!("Upload failed: {}", upload_reason(&e)));
                events.push(BrowserEvent::ControlsChanged(controls));
                self.emit_all(events);
                Err(e.into())
            }
        }
    }

    /// 尝试加载下一页。“加载更多”按钮、滚动触底和越界选择都走这里。
    pub fn request_next_page(&self) -> PageOutcome {
        let (ticket, controls) = {
            let mut state = self.state();
            let page_size = self.config.effective_page_size();
            let Some(active) = state.active_mut() else {
                return PageOutcome::Skipped;
            };
            let video_id = active.session.video_id.clone();
            let gallery = &mut active.gallery;
            let Some(ticket) = gallery.loading.try_begin(&video_id, &gallery.store, page_size)
            else {
                debug!("page request skipped (loading or exhausted)");
                return PageOutcome::Skipped;
            };
            (ticket, state.controls())
        };

        info!(
            "📥 Loading frames: video={} page={}",
            ticket.video_id, ticket.page
        );
        self.emit_all(vec![
            BrowserEvent::UploadStatus(format!("Loading frames (page {})...", ticket.page)),
            BrowserEvent::ControlsChanged(controls),
        ]);

        let result = self
            .transport
            .fetch_page(&ticket.video_id, ticket.page, ticket.page_size);
        self.complete_page(ticket, result)
    }

    fn complete_page(
        &self,
        ticket: PageTicket,
        result: Result<FramePage, TransportError>,
    ) -> PageOutcome {
        let mut events = Vec::new();
        let outcome = {
            let mut state = self.state();
            let Some(active) = state.active_for(&ticket.video_id) else {
                info!(
                    "🗑️ Discarding stale page {} for video {}",
                    ticket.page, ticket.video_id
                );
                return PageOutcome::Stale;
            };
            let gallery = &mut active.gallery;
            gallery.loading.finish(&ticket);

            let result = result.and_then(|page| {
                if gallery.store.fits(&page) {
                    Ok(page)
                } else {
                    Err(TransportError::MalformedResponse(format!(
                        "page {} would exceed total of {} frames",
                        page.page, page.total_frames
                    )))
                }
            });
            let outcome = match result {
                Ok(page) => {
                    let frames = page.frames.clone();
                    let total_frames = page.total_frames;
                    let first_position = gallery.store.merge(page);
                    info!(
                        "✅ Page {} merged: +{} frames ({}/{})",
                        ticket.page,
                        frames.len(),
                        gallery.store.len(),
                        total_frames
                    );

                    let added = frames.len();
                    if frames.is_empty() {
                        if gallery.store.is_empty() {
                            events.push(BrowserEvent::GalleryEmpty);
                        }
                    } else {
                        events.push(BrowserEvent::FramesAppended {
                            first_position,
                            frames,
                            total_frames,
                        });
                    }

                    if gallery.selection.selected().is_none() && !gallery.store.is_empty() {
                        gallery.selection.set(0, &gallery.store);
                        events.push(selection_event(0, &gallery.store));
                    }
                    events.push(BrowserEvent::UploadStatus("Frames ready.".to_string()));
                    PageOutcome::Merged {
                        page: ticket.page,
                        added,
                    }
                }
                Err(e) => {
                    warn!("❌ Frame load failed: page={} {}", ticket.page, e);
                    events.extend(failure_events(format!("Frame load failed: {}", e)));
                    PageOutcome::Failed
                }
            };
            events.push(BrowserEvent::ControlsChanged(state.controls()));
            outcome
        };
        self.emit_all(events);
        outcome
    }

    /// 选择某一帧；目标还没加载时先拉页再重试，直到可选或没有更多
    pub fn select(&self, requested: i64) -> SelectOutcome {
        let mut target_video: Option<String> = None;
        loop {
            let (step, events) = {
                let mut state = self.state();
                let Some(active) = state.active_mut() else {
                    return SelectOutcome::Dropped;
                };
                let current = active.session.video_id.as_str();
                let target = target_video.get_or_insert_with(|| current.to_string());
                if target.as_str() != current {
                    debug!("selection target session replaced, dropping");
                    return SelectOutcome::Dropped;
                }

                let gallery = &mut active.gallery;
                let step = Selection::step(
                    requested,
                    &gallery.store,
                    gallery.loading.is_loading(),
                );
                let mut events = Vec::new();
                if let SelectStep::Select(position) = step {
                    gallery.selection.set(position, &gallery.store);
                    events.push(selection_event(position, &gallery.store));
                    events.push(BrowserEvent::ControlsChanged(state.controls()));
                } else if let (SelectStep::NeedsPage, Ok(position)) =
                    (step, usize::try_from(requested))
                {
                    debug!(
                        "frame {} not loaded yet, needs page {}",
                        requested,
                        page_for_position(position, self.config.effective_page_size())
                    );
                }
                (step, events)
            };

            match step {
                SelectStep::Select(position) => {
                    self.emit_all(events);
                    return SelectOutcome::Selected(position);
                }
                SelectStep::Ignore => return SelectOutcome::Dropped,
                SelectStep::NeedsPage => match self.request_next_page() {
                    PageOutcome::Merged { added, .. } if added > 0 => continue,
                    _ => return SelectOutcome::Dropped,
                },
            }
        }
    }

    pub fn next(&self) -> SelectOutcome {
        let target = {
            let state = self.state();
            state
                .active()
                .and_then(|a| a.gallery.selection.next_target(&a.gallery.store))
        };
        match target {
            Some(index) => self.select(index),
            None => SelectOutcome::Dropped,
        }
    }

    pub fn prev(&self) -> SelectOutcome {
        let target = {
            let state = self.state();
            state.active().and_then(|a| a.gallery.selection.prev_target())
        };
        match target {
            Some(index) => self.select(index),
            None => SelectOutcome::Dropped,
        }
    }

    pub fn handle_key(&self, key: &str, focused_tag: Option<&str>) -> SelectOutcome {
        match navigation_key(key, focused_tag) {
            Some(NavigationKey::Previous) => self.prev(),
            Some(NavigationKey::Next) => self.next(),
            None => SelectOutcome::Dropped,
        }
    }

    pub fn handle_scroll(&self, metrics: ScrollMetrics) -> PageOutcome {
        if !metrics.is_near_bottom(self.config.scroll_threshold_px) {
            return PageOutcome::Skipped;
        }
        self.request_next_page()
    }

    pub fn session(&self) -> Option<Session> {
        self.state().active().map(|a| a.session.clone())
    }

    pub fn frames(&self) -> Vec<FrameDescriptor> {
        self.state()
            .active()
            .map(|a| a.gallery.store.frames().to_vec())
            .unwrap_or_default()
    }

    pub fn selected_index(&self) -> i64 {
        self.state()
            .active()
            .map_or(-1, |a| a.gallery.selection.selected_index())
    }

    pub fn has_more(&self) -> bool {
        self.state()
            .active()
            .is_some_and(|a| a.gallery.store.has_more())
    }

    pub fn is_loading(&self) -> bool {
        self.state()
            .active()
            .is_some_and(|a| a.gallery.loading.is_loading())
    }

    pub fn loaded_page(&self) -> u32 {
        self.state()
            .active()
            .map_or(0, |a| a.gallery.store.loaded_page())
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.state().phase()
    }

    pub fn controls(&self) -> FrameControls {
        self.state().controls()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("⚠️ Browser state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn emit(&self, event: BrowserEvent) {
        self.observer.on_event(event);
    }

    fn emit_all(&self, events: Vec<BrowserEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

fn selection_event(position: usize, store: &FrameStore) -> BrowserEvent {
    let frame = store.frames()[position].clone();
    BrowserEvent::SelectionChanged {
        position,
        label: display::position_label(position, store.navigable_total()),
        frame,
    }
}

fn failure_events(message: String) -> Vec<BrowserEvent> {
    vec![
        BrowserEvent::BackendStatus("Error".to_string()),
        BrowserEvent::UploadStatus(message),
    ]
}

fn upload_reason(err: &TransportError) -> String {
    match err {
        TransportError::Network(_) => "network error.".to_string(),
        other => other.to_string(),
    }
}
