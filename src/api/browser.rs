//! 帧浏览器 - 供 Dart 侧调用

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

use crate::api::models::frames::{BrowserEvent, FrameControls, FrameDescriptor, Session};
use crate::core::frames::display;
use crate::core::frames::{
    BrowserConfig, BrowserError, ChannelObserver, FrameBrowser, HttpTransport, PageOutcome,
    ScrollMetrics, SelectOutcome,
};
use flutter_rust_bridge::frb;
use log::info;

/// 帧浏览器 - 上传视频、分页加载帧、选择预览
///
/// ```dart
/// final browser = FrameBrowserApi.create(apiBase: "http://localhost:8000");
/// await browser.uploadVideo(path: file.path);
/// final events = browser.takeEvents();
/// await browser.selectFrame(index: 130);
/// ```
#[frb(opaque)]
pub struct FrameBrowserApi {
    browser: FrameBrowser<HttpTransport, ChannelObserver>,
    events: Mutex<Receiver<BrowserEvent>>,
}

impl FrameBrowserApi {
    /// 创建浏览器，api_base / page_size 缺省时使用默认配置
    #[frb(sync)]
    pub fn create(api_base: Option<String>, page_size: Option<u32>) -> Result<Self, BrowserError> {
        crate::init_logging();

        let mut config = api_base
            .map(|base| BrowserConfig::for_api_base(base))
            .unwrap_or_default();
        if let Some(page_size) = page_size {
            config = config.with_page_size(page_size);
        }
        info!(
            "🎬 FrameBrowserApi: created (api_base={}, page_size={})",
            config.api_base,
            config.effective_page_size()
        );

        let transport = HttpTransport::new(&config)?;
        let (observer, events) = ChannelObserver::new();
        let browser = FrameBrowser::new(transport, Arc::new(observer), config);
        browser.announce();

        Ok(Self {
            browser,
            events: Mutex::new(events),
        })
    }

    /// 上传视频并抽帧，完成后自动加载第一页
    #[frb]
    pub fn upload_video(&self, path: Option<String>) -> Result<Session, BrowserError> {
        self.browser.upload(path.as_deref().map(Path::new))
    }

    /// “加载更多”，返回是否合并了新的一页
    #[frb]
    pub fn load_more(&self) -> bool {
        matches!(self.browser.request_next_page(), PageOutcome::Merged { .. })
    }

    /// 帧列表滚动
    #[frb]
    pub fn on_scroll(&self, scroll_top: f64, client_height: f64, scroll_height: f64) -> bool {
        let metrics = ScrollMetrics {
            scroll_top,
            client_height,
            scroll_height,
        };
        matches!(self.browser.handle_scroll(metrics), PageOutcome::Merged { .. })
    }

    /// 点击列表项 / 跳转到指定位置
    #[frb]
    pub fn select_frame(&self, index: i64) -> bool {
        matches!(self.browser.select(index), SelectOutcome::Selected(_))
    }

    #[frb]
    pub fn prev_frame(&self) -> bool {
        matches!(self.browser.prev(), SelectOutcome::Selected(_))
    }

    #[frb]
    pub fn next_frame(&self) -> bool {
        matches!(self.browser.next(), SelectOutcome::Selected(_))
    }

    /// 键盘导航，focused_tag 为当前焦点元素类型（INPUT / TEXTAREA 时忽略）
    #[frb]
    pub fn handle_key(&self, key: String, focused_tag: Option<String>) -> bool {
        matches!(
            self.browser.handle_key(&key, focused_tag.as_deref()),
            SelectOutcome::Selected(_)
        )
    }

    /// 取走目前积累的所有事件
    #[frb(sync)]
    pub fn take_events(&self) -> Vec<BrowserEvent> {
        match self.events.lock() {
            Ok(events) => events.try_iter().collect(),
            Err(_) => Vec::new(),
        }
    }

    #[frb(sync, getter)]
    pub fn frames(&self) -> Vec<FrameDescriptor> {
        self.browser.frames()
    }

    #[frb(sync, getter)]
    pub fn selected_index(&self) -> i64 {
        self.browser.selected_index()
    }

    #[frb(sync, getter)]
    pub fn session(&self) -> Option<Session> {
        self.browser.session()
    }

    #[frb(sync, getter)]
    pub fn controls(&self) -> FrameControls {
        self.browser.controls()
    }

    /// 文件选择框上显示的文字
    #[frb(sync)]
    pub fn file_label(file_name: Option<String>) -> String {
        display::file_label(file_name.as_deref())
    }

    #[frb(sync)]
    pub fn frame_label(frame: FrameDescriptor) -> String {
        display::frame_label(&frame)
    }
}

impl Drop for FrameBrowserApi {
    fn drop(&mut self) {
        info!("🗑️ FrameBrowserApi: released");
    }
}
