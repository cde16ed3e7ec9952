use super::store::FrameStore;

/// 一次已发起的分页请求，记录目标视频，用来识别过期响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub video_id: String,
    pub page: u32,
    pub page_size: u32,
}

/// 单飞锁：同一时刻最多一个分页请求在途
///
/// “加载更多”、滚动触底、选择越界三条路径都从这里发起请求。
#[derive(Debug, Default)]
pub struct LoadingFlag {
    in_flight: Option<u32>,
}

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 尝试发起下一页请求；正在加载或没有更多时返回 None（静默忽略）
    pub fn try_begin(
        &mut self,
        video_id: &str,
        store: &FrameStore,
        page_size: u32,
    ) -> Option<PageTicket> {
        if self.is_loading() || !store.has_more() {
            return None;
        }
        let page = store.loaded_page() + 1;
        self.in_flight = Some(page);
        Some(PageTicket {
            video_id: video_id.to_string(),
            page,
            page_size,
        })
    }

    pub fn finish(&mut self, ticket: &PageTicket) {
        debug_assert_eq!(self.in_flight, Some(ticket.page));
        self.in_flight = None;
    }
}

/// 帧列表的滚动位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self, threshold_px: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - threshold_px
    }
}

/// 第 position 帧（从 0 开始）所在的页码
pub fn page_for_position(position: usize, page_size: u32) -> u32 {
    (position as u64 / page_size.max(1) as u64) as u32 + 1
}
