use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// 服务地址，同时用于解析相对帧地址
    pub api_base: String,
    /// 每页请求的帧数
    pub page_size: u32,
    /// 距列表底部多少像素内触发加载下一页
    pub scroll_threshold_px: f64,
    /// 单页请求超时（上传不设超时，后端抽帧完成才返回）
    pub page_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: 60,
            scroll_threshold_px: 40.0,
            page_timeout: Duration::from_secs(30),
        }
    }
}

impl BrowserConfig {
    pub fn for_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.page_size, 60);
        assert_eq!(config.scroll_threshold_px, 40.0);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let config = BrowserConfig::default().with_page_size(0);
        assert_eq!(config.effective_page_size(), 1);
    }

    #[test]
    fn test_for_api_base_keeps_other_defaults() {
        let config = BrowserConfig::for_api_base("http://frames.local:9000");
        assert_eq!(config.api_base, "http://frames.local:9000");
        assert_eq!(config.page_size, 60);
    }
}
