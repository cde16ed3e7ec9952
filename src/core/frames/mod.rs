//! 增量帧浏览 - 分页懒加载 + 选择导航
//!
//! 核心流程：
//! 1. 上传完成 - 重建会话，拉取第一页
//! 2. 分页加载 - 单飞锁保证同一时刻只有一个请求，页码严格递增
//! 3. 选择导航 - 目标未加载时先拉页再选中

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod observer;
pub mod pagination;
pub mod selection;
pub mod session;
pub mod store;
pub mod transport;

pub use config::BrowserConfig;
pub use controller::{FrameBrowser, PageOutcome, SelectOutcome};
pub use error::{BrowserError, TransportError};
pub use observer::{BrowserObserver, ChannelObserver};
pub use pagination::{LoadingFlag, PageTicket, ScrollMetrics};
pub use selection::{NavigationKey, Selection};
pub use session::{LifecyclePhase, SessionState};
pub use store::FrameStore;
pub use transport::{FrameTransport, HttpTransport, ProgressFn};
