use super::store::FrameStore;
use crate::api::models::frames::FrameControls;

/// 当前选中的帧位置，None 表示未选中
#[derive(Debug, Default)]
pub struct Selection {
    selected: Option<usize>,
}

/// 一次选择请求的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectStep {
    /// 目标已在本地，直接选中
    Select(usize),
    /// 目标尚未加载，需要先拉下一页再重试
    NeedsPage,
    /// 越界或无法继续加载，静默丢弃
    Ignore,
}

impl Selection {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// 对外使用 -1 表示未选中
    pub fn selected_index(&self) -> i64 {
        self.selected.map_or(-1, |s| s as i64)
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub(crate) fn set(&mut self, position: usize, store: &FrameStore) {
        debug_assert!(position < store.len());
        self.selected = Some(position);
    }

    pub fn step(requested: i64, store: &FrameStore, loading: bool) -> SelectStep {
        // 负数或超出 usize 范围（32 位目标）都直接丢弃
        let Ok(position) = usize::try_from(requested) else {
            return SelectStep::Ignore;
        };
        if position < store.len() {
            SelectStep::Select(position)
        } else if store.has_more() && !loading {
            SelectStep::NeedsPage
        } else {
            SelectStep::Ignore
        }
    }

    pub fn prev_target(&self) -> Option<i64> {
        match self.selected {
            Some(s) if s > 0 => Some(s as i64 - 1),
            _ => None,
        }
    }

    pub fn next_target(&self, store: &FrameStore) -> Option<i64> {
        let s = self.selected?;
        let next = s as u64 + 1;
        (next < store.navigable_total()).then_some(next as i64)
    }
}

/// 计算当前按钮状态
pub fn frame_controls(
    selection: Option<&Selection>,
    store: Option<&FrameStore>,
    loading: bool,
    uploading: bool,
) -> FrameControls {
    let (prev_enabled, next_enabled, remaining) = match (selection, store) {
        (Some(selection), Some(store)) => (
            selection.prev_target().is_some(),
            selection.next_target(store).is_some(),
            store.loaded_page() > 0 && store.has_more(),
        ),
        _ => (false, false, false),
    };

    FrameControls {
        prev_enabled,
        next_enabled,
        load_more_visible: remaining,
        load_more_enabled: remaining && !loading,
        upload_enabled: !uploading,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    Previous,
    Next,
}

/// 方向键映射；焦点在输入框时不处理
pub fn navigation_key(key: &str, focused_tag: Option<&str>) -> Option<NavigationKey> {
    if let Some(tag) = focused_tag {
        if tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea") {
            return None;
        }
    }
    match key {
        "ArrowLeft" => Some(NavigationKey::Previous),
        "ArrowRight" => Some(NavigationKey::Next),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frames::store::make_page;

    fn store_with(page_sizes: &[u64], total: u64) -> FrameStore {
        let mut store = FrameStore::new();
        let mut start = 0;
        for (i, &count) in page_sizes.iter().enumerate() {
            store.merge(make_page(i as u32 + 1, start, count, total));
            start += count;
        }
        store
    }

    #[test]
    fn test_negative_index_ignored() {
        let store = store_with(&[10], 10);
        assert_eq!(Selection::step(-1, &store, false), SelectStep::Ignore);
    }

    #[test]
    fn test_index_beyond_usize_ignored() {
        let store = store_with(&[10], 20);
        if usize::BITS < 64 {
            assert_eq!(
                Selection::step((1i64 << 32) + 5, &store, false),
                SelectStep::Ignore
            );
        }
        assert_eq!(Selection::step(i64::MAX, &store, true), SelectStep::Ignore);
    }

    #[test]
    fn test_loaded_index_selects() {
        let store = store_with(&[10], 20);
        assert_eq!(Selection::step(9, &store, false), SelectStep::Select(9));
    }

    #[test]
    fn test_out_of_window_needs_page() {
        let store = store_with(&[10], 20);
        assert_eq!(Selection::step(15, &store, false), SelectStep::NeedsPage);
        assert_eq!(Selection::step(15, &store, true), SelectStep::Ignore);
    }

    #[test]
    fn test_beyond_total_when_exhausted_ignored() {
        let store = store_with(&[10], 10);
        assert_eq!(Selection::step(10, &store, false), SelectStep::Ignore);
    }

    #[test]
    fn test_prev_next_targets_at_boundaries() {
        let store = store_with(&[3], 3);
        let mut selection = Selection::default();
        assert_eq!(selection.selected_index(), -1);
        assert!(selection.prev_target().is_none());
        assert!(selection.next_target(&store).is_none());

        selection.set(0, &store);
        assert!(selection.prev_target().is_none());
        assert_eq!(selection.next_target(&store), Some(1));

        selection.set(2, &store);
        assert_eq!(selection.prev_target(), Some(1));
        assert!(selection.next_target(&store).is_none());
    }

    #[test]
    fn test_next_uses_known_total_beyond_window() {
        let store = store_with(&[2], 5);
        let mut selection = Selection::default();
        selection.set(1, &store);
        assert_eq!(selection.next_target(&store), Some(2));
    }

    #[test]
    fn test_controls() {
        let store = store_with(&[2], 5);
        let mut selection = Selection::default();
        selection.set(0, &store);

        let controls = frame_controls(Some(&selection), Some(&store), false, false);
        assert!(!controls.prev_enabled);
        assert!(controls.next_enabled);
        assert!(controls.load_more_visible);
        assert!(controls.load_more_enabled);
        assert!(controls.upload_enabled);

        let loading = frame_controls(Some(&selection), Some(&store), true, false);
        assert!(loading.load_more_visible);
        assert!(!loading.load_more_enabled);

        let idle = frame_controls(None, None, false, true);
        assert_eq!(
            idle,
            FrameControls {
                upload_enabled: false,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_navigation_key() {
        assert_eq!(navigation_key("ArrowLeft", None), Some(NavigationKey::Previous));
        assert_eq!(navigation_key("ArrowRight", Some("DIV")), Some(NavigationKey::Next));
        assert_eq!(navigation_key("ArrowRight", Some("INPUT")), None);
        assert_eq!(navigation_key("ArrowLeft", Some("textarea")), None);
        assert_eq!(navigation_key("Enter", None), None);
    }
}
