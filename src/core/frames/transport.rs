//! 与抽帧服务通信：上传视频、分页拉取帧

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::Url;

use super::config::BrowserConfig;
use super::error::TransportError;
use crate::api::models::frames::{
    FrameDescriptor, FramePage, FramePageResponse, UploadReceipt, UploadResponse,
};

/// 上传进度回调，参数为 0..=100 的百分比
pub type ProgressFn = Box<dyn FnMut(u8) + Send + 'static>;

/// 传输层抽象，只做网络 I/O，不碰任何浏览状态
pub trait FrameTransport: Send + Sync {
    fn upload(&self, path: &Path, on_progress: ProgressFn) -> Result<UploadReceipt, TransportError>;

    fn fetch_page(
        &self,
        video_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FramePage, TransportError>;
}

pub struct HttpTransport {
    client: Client,
    api_base: String,
    page_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &BrowserConfig) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &BrowserConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.clone(),
            page_timeout: config.page_timeout,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    fn read_body(res: Response) -> Result<String, TransportError> {
        let status = res.status();
        let body = res.text()?;
        if status.is_success() {
            Ok(body)
        } else {
            warn!("⚠️ Server rejected request: {} {}", status, body);
            Err(TransportError::rejected(
                status.as_u16(),
                body,
                status.canonical_reason(),
            ))
        }
    }
}

impl FrameTransport for HttpTransport {
    fn upload(&self, path: &Path, on_progress: ProgressFn) -> Result<UploadReceipt, TransportError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        info!("📤 Uploading {} ({} bytes)", file_name, len);

        let part = Part::reader_with_length(ProgressReader::new(file, len, on_progress), len)
            .file_name(file_name)
            .mime_str(mime_for_path(path))?;
        let form = Form::new().part("file", part);

        let res = self
            .client
            .post(self.endpoint("/api/videos"))
            .multipart(form)
            .send()?;
        let body = Self::read_body(res)?;
        parse_upload(&body)
    }

    fn fetch_page(
        &self,
        video_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FramePage, TransportError> {
        debug!("🌐 GET frames video={} page={} size={}", video_id, page, page_size);
        let res = self
            .client
            .get(self.endpoint(&format!("/api/videos/{}/frames", video_id)))
            .query(&[("page", page), ("page_size", page_size)])
            .timeout(self.page_timeout)
            .send()?;
        let body = Self::read_body(res)?;
        parse_page(&body, page, page_size, &self.api_base)
    }
}

pub(crate) fn parse_upload(body: &str) -> Result<UploadReceipt, TransportError> {
    let payload: UploadResponse = serde_json::from_str(body)
        .map_err(|e| TransportError::MalformedResponse(format!("upload response: {}", e)))?;
    Ok(UploadReceipt {
        video_id: payload.video_id,
        frame_count: payload.frame_count,
        fps: payload.fps,
        message: payload.message,
    })
}

pub(crate) fn parse_page(
    body: &str,
    requested_page: u32,
    page_size: u32,
    api_base: &str,
) -> Result<FramePage, TransportError> {
    let payload: FramePageResponse = serde_json::from_str(body)
        .map_err(|e| TransportError::MalformedResponse(format!("frame page: {}", e)))?;

    if payload.page != requested_page {
        return Err(TransportError::MalformedResponse(format!(
            "requested page {} but server answered page {}",
            requested_page, payload.page
        )));
    }
    if payload.frames.len() as u64 > page_size as u64 {
        return Err(TransportError::MalformedResponse(format!(
            "page {} has {} frames, more than page size {}",
            payload.page,
            payload.frames.len(),
            page_size
        )));
    }

    let frames = payload
        .frames
        .into_iter()
        .map(|item| FrameDescriptor {
            resolved_url: resolve_frame_url(api_base, &item.url),
            index: item.index,
            url: item.url,
        })
        .collect();

    Ok(FramePage {
        page: payload.page,
        total_frames: payload.total_frames,
        frames,
    })
}

/// 帧地址可能是相对路径，按服务地址解析；解析失败时原样返回
pub fn resolve_frame_url(api_base: &str, url: &str) -> String {
    Url::parse(api_base)
        .and_then(|base| base.join(url))
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|_| url.to_string())
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// 包装上传文件，按已读字节数回报进度（只在百分比上升时回调）
struct ProgressReader<R> {
    inner: R,
    total: u64,
    sent: u64,
    last_percent: Option<u8>,
    on_progress: ProgressFn,
}

impl<R: Read> ProgressReader<R> {
    fn new(inner: R, total: u64, on_progress: ProgressFn) -> Self {
        Self {
            inner,
            total,
            sent: 0,
            last_percent: None,
            on_progress,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if self.total == 0 {
            return Ok(n);
        }
        self.sent = (self.sent + n as u64).min(self.total);
        let percent = ((self.sent as f64 / self.total as f64) * 100.0).round() as u8;
        if self.last_percent.map_or(true, |last| percent > last) {
            self.last_percent = Some(percent);
            (self.on_progress)(percent);
        }
        Ok(n)
    }
}
