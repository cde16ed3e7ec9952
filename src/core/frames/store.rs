use crate::api::models::frames::{FrameDescriptor, FramePage};

/// 已加载帧的只追加序列
///
/// 页面严格按 1, 2, 3... 顺序合并，因此序列始终是全部帧的无空洞前缀。
#[derive(Debug, Default)]
pub struct FrameStore {
    frames: Vec<FrameDescriptor>,
    loaded_page: u32,
    known_total: u64,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.frames.clear();
        self.loaded_page = 0;
        self.known_total = 0;
    }

    /// 合并下一页。页码必须正好是 `loaded_page + 1`，否则说明调用方绕过了
    /// 单飞锁，属于程序错误。
    ///
    /// 返回本页第一帧在序列中的位置。
    pub fn merge(&mut self, page: FramePage) -> usize {
        assert_eq!(
            page.page,
            self.loaded_page + 1,
            "out-of-order page merge: got page {} after page {}",
            page.page,
            self.loaded_page
        );

        let first_position = self.frames.len();
        self.frames.extend(page.frames);
        self.known_total = page.total_frames;
        self.loaded_page = page.page;
        first_position
    }

    /// 合并后序列长度是否仍不超过该页声明的总帧数
    pub fn fits(&self, page: &FramePage) -> bool {
        self.frames.len() as u64 + page.frames.len() as u64 <= page.total_frames
    }

    /// 首页返回前总数未知，按“还有更多”处理
    pub fn has_more(&self) -> bool {
        if self.loaded_page == 0 {
            return true;
        }
        (self.frames.len() as u64) < self.known_total
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FrameDescriptor> {
        self.frames.get(position)
    }

    pub fn frames(&self) -> &[FrameDescriptor] {
        &self.frames
    }

    pub fn loaded_page(&self) -> u32 {
        self.loaded_page
    }

    pub fn known_total(&self) -> u64 {
        self.known_total
    }

    /// 导航边界用的总数：总数未知时退回到已加载数量
    pub fn navigable_total(&self) -> u64 {
        if self.known_total > 0 {
            self.known_total
        } else {
            self.frames.len() as u64
        }
    }
}

#[cfg(test)]
pub(crate) fn make_page(page: u32, start: u64, count: u64, total: u64) -> FramePage {
    let frames = (start..start + count)
        .map(|i| {
            let url = format!("/static/frames/v1/{:06}.jpg", i + 1);
            FrameDescriptor {
                index: i + 1,
                resolved_url: format!("http://localhost:8000{}", url),
                url,
            }
        })
        .collect();
    FramePage {
        page,
        total_frames: total,
        frames,
    }
}
