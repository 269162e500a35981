//! Loop view state machine
//!
//! Decides which page of an infinitely looping image carousel is shown.
//! Looping is faked with a wrap buffer: for `n > 1` images the first two
//! entries are appended to the end, so the backing list is
//! `[A, B, C, A, B]` for `[A, B, C]`. Whenever the scroll container settles on
//! the first or last backing page, the view jumps without animation to the
//! identical page deep inside the list.
//!
//! Rendering and gesture handling live in `crate::ui::components::loop_view`.
//! This module only consumes events (timer ticks, settles, drags, taps) and
//! answers with [`Scroll`] commands.

pub mod layout;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

pub use layout::{CaptionLayer, CaptionPosition, IndicatorLayer, IndicatorPosition, LayoutSpec};

/// Auto-advance interval used when the caller has no preference
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Maps a real page index to a host message
pub type OnSelect<M> = Arc<dyn Fn(usize) -> M + Send + Sync>;

/// Command for the scroll container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    /// Scroll to the backing index with animation
    Animated(usize),
    /// Move to the backing index immediately
    Jump(usize),
}

/// A running auto-advance timer
///
/// The generation changes every time the timer is (re)started, so a
/// subscription keyed on it restarts its tick phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timer {
    pub interval: Duration,
    pub generation: u64,
}

pub struct LoopView<M> {
    /// Backing list, extended with the wrap buffer when `page_count > 1`
    urls: Vec<String>,
    /// Captions, extended identically to `urls`
    tips: Option<Vec<String>>,
    /// Number of real pages
    page_count: usize,
    /// Backing index of the last settled page
    visible_index: usize,
    interval: Duration,
    timer: Option<Timer>,
    generation: u64,
    reload_pending: bool,
    on_select: Option<OnSelect<M>>,
    caption_position: CaptionPosition,
    indicator_position: IndicatorPosition,
    layout: LayoutSpec,
}

impl<M> std::fmt::Debug for LoopView<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopView")
            .field("len", &self.urls.len())
            .field("page_count", &self.page_count)
            .field("visible_index", &self.visible_index)
            .field("timer", &self.timer)
            .field("caption_position", &self.caption_position)
            .field("indicator_position", &self.indicator_position)
            .finish_non_exhaustive()
    }
}

impl<M> Default for LoopView<M> {
    fn default() -> Self {
        Self::new(CaptionPosition::default(), IndicatorPosition::default())
    }
}

impl<M> LoopView<M> {
    pub fn new(caption_position: CaptionPosition, indicator_position: IndicatorPosition) -> Self {
        Self {
            urls: Vec::new(),
            tips: None,
            page_count: 0,
            visible_index: 0,
            interval: DEFAULT_INTERVAL,
            timer: None,
            generation: 0,
            reload_pending: false,
            on_select: None,
            caption_position,
            indicator_position,
            layout: LayoutSpec::new(caption_position, indicator_position),
        }
    }

    /// Replace the displayed images
    ///
    /// `tips` must be absent or as long as `urls`. A mismatch panics in debug
    /// builds and drops the captions otherwise. With more than one image the
    /// lists are extended with the wrap buffer, a reload is scheduled (see
    /// [`LoopView::reload`]) and the timer starts.
    pub fn show_images(
        &mut self,
        urls: Vec<String>,
        tips: Option<Vec<String>>,
        interval: Duration,
        on_select: Option<OnSelect<M>>,
    ) {
        debug_assert!(
            tips.as_ref().is_none_or(|tips| tips.len() == urls.len()),
            "caption count must match image count"
        );
        let tips = match tips {
            Some(tips) if tips.len() != urls.len() => {
                warn!(
                    "Ignoring {} captions for {} images",
                    tips.len(),
                    urls.len()
                );
                None
            }
            tips => tips,
        };

        self.stop_timer();

        self.page_count = urls.len();
        self.urls = urls;
        self.tips = tips;
        self.visible_index = 0;
        self.reload_pending = false;
        self.on_select = on_select;
        self.interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };

        if self.page_count <= 1 {
            debug!("Loop view showing {} image(s), looping disabled", self.page_count);
            return;
        }

        extend_wrap(&mut self.urls);
        if let Some(tips) = self.tips.as_mut() {
            extend_wrap(tips);
        }

        debug!(
            "Loop view showing {} images ({} backing pages)",
            self.page_count,
            self.urls.len()
        );

        self.reload_pending = true;
        self.start_timer();
    }

    /// Finish a deferred reload
    ///
    /// Jumps to the second-to-last backing page so scrolling backwards wraps
    /// as well. Returns `None` when no reload is pending.
    pub fn reload(&mut self) -> Option<Scroll> {
        if !std::mem::take(&mut self.reload_pending) || self.page_count <= 1 {
            return None;
        }
        self.visible_index = self.urls.len() - 2;
        Some(Scroll::Jump(self.visible_index))
    }

    pub fn start_timer(&mut self) {
        if self.timer.is_some() || self.page_count <= 1 {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.timer = Some(Timer {
            interval: self.interval,
            generation: self.generation,
        });
        debug!(
            "Loop view timer started ({:?}, generation {})",
            self.interval, self.generation
        );
    }

    pub fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!("Loop view timer stopped (generation {})", timer.generation);
        }
    }

    /// Re-synchronize after a size change
    pub fn relayout(&mut self) -> Option<Scroll> {
        self.stop_timer();
        self.start_timer();
        (self.page_count > 1).then_some(Scroll::Jump(self.visible_index))
    }

    /// Auto-advance tick
    pub fn timer_fired(&mut self) -> Option<Scroll> {
        if self.timer.is_none() || self.page_count <= 1 {
            return None;
        }
        let next = self.visible_index + 1;
        // Past the wrap buffer: leave it to the settle that is about to jump back
        (next < self.urls.len()).then_some(Scroll::Animated(next))
    }

    /// The scroll container came to rest on `index`
    ///
    /// Returns the wrap jump when `index` is the first or last backing page.
    pub fn did_end_displaying(&mut self, index: usize) -> Option<Scroll> {
        if self.page_count <= 1 || index >= self.urls.len() {
            return None;
        }

        let last = self.urls.len() - 1;
        let target = if index == 0 {
            last - 1
        } else if index == last {
            1
        } else {
            index
        };
        self.visible_index = target;

        if target != index {
            debug!("Loop view wrapped from page {} to {}", index, target);
            Some(Scroll::Jump(target))
        } else {
            None
        }
    }

    pub fn drag_began(&mut self) {
        self.stop_timer();
    }

    pub fn drag_ended(&mut self, will_decelerate: bool) {
        if !will_decelerate {
            self.start_timer();
        }
    }

    /// A drag released with momentum came to rest
    pub fn deceleration_ended(&mut self) {
        self.start_timer();
    }

    /// Map a tap on backing page `index` to the host's selection message
    pub fn tap(&self, index: usize) -> Option<M> {
        let real = index % self.page_count.max(1);
        debug!("Loop view tapped page {} (real {})", index, real);
        self.on_select.as_ref().map(|on_select| on_select(real))
    }

    pub fn set_caption_position(&mut self, position: CaptionPosition) {
        self.caption_position = position;
        self.layout = LayoutSpec::new(self.caption_position, self.indicator_position);
    }

    pub fn set_indicator_position(&mut self, position: IndicatorPosition) {
        self.indicator_position = position;
        self.layout = LayoutSpec::new(self.caption_position, self.indicator_position);
    }

    pub fn caption_position(&self) -> CaptionPosition {
        self.caption_position
    }

    pub fn indicator_position(&self) -> IndicatorPosition {
        self.indicator_position
    }

    pub fn layout(&self) -> LayoutSpec {
        self.layout
    }

    /// Backing list, including the wrap buffer
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Number of real pages, the indicator's total
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn visible_index(&self) -> usize {
        self.visible_index
    }

    /// Real index of the visible page, the indicator's current value
    pub fn current_page(&self) -> usize {
        self.visible_index % self.page_count.max(1)
    }

    /// Caption list, extended like [`LoopView::urls`]
    pub fn tips(&self) -> Option<&[String]> {
        self.tips.as_deref()
    }

    /// Caption of the visible page
    pub fn caption(&self) -> Option<&str> {
        self.tips()
            .and_then(|tips| tips.get(self.current_page()))
            .map(String::as_str)
    }

    pub fn timer(&self) -> Option<Timer> {
        self.timer
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_reload_pending(&self) -> bool {
        self.reload_pending
    }
}

/// Append the first two entries to the end
fn extend_wrap<T: Clone>(items: &mut Vec<T>) {
    let head: Vec<T> = items.iter().take(2).cloned().collect();
    items.extend(head);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn shown(names: &[&str]) -> LoopView<usize> {
        let mut view = LoopView::default();
        view.show_images(
            urls(names),
            None,
            DEFAULT_INTERVAL,
            Some(Arc::new(|index| index)),
        );
        view
    }

    mod property_wrap_buffer {
        use super::*;

        #[test]
        fn extends_by_first_two_entries() {
            for n in 2..8 {
                let names: Vec<String> = (0..n).map(|i| format!("img{}", i)).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let view = shown(&refs);

                assert_eq!(view.len(), n + 2, "backing length for n={}", n);
                assert_eq!(view.urls()[n], names[0]);
                assert_eq!(view.urls()[n + 1], names[1]);
                assert_eq!(&view.urls()[..n], names.as_slice());
            }
        }

        #[test]
        fn captions_extend_like_urls() {
            let mut view: LoopView<usize> = LoopView::default();
            view.show_images(
                urls(&["A", "B", "C"]),
                Some(urls(&["a", "b", "c"])),
                DEFAULT_INTERVAL,
                None,
            );
            assert_eq!(
                view.tips(),
                Some(urls(&["a", "b", "c", "a", "b"]).as_slice())
            );

            view.reload();
            assert_eq!(view.caption(), Some("a"));

            view.did_end_displaying(2);
            assert_eq!(view.caption(), Some("c"));
        }

        #[test]
        fn single_image_is_not_extended() {
            let view = shown(&["A"]);
            assert_eq!(view.urls(), ["A"]);
            assert!(!view.is_timer_running());
            assert!(!view.is_reload_pending());
        }

        #[test]
        fn empty_list_stays_empty() {
            let mut view = shown(&[]);
            assert!(view.is_empty());
            assert_eq!(view.reload(), None);
            assert_eq!(view.timer_fired(), None);
            assert_eq!(view.current_page(), 0);
        }

        #[test]
        #[cfg(debug_assertions)]
        #[should_panic(expected = "caption count must match image count")]
        fn caption_mismatch_asserts_in_debug() {
            let mut view: LoopView<usize> = LoopView::default();
            view.show_images(urls(&["A", "B"]), Some(urls(&["a"])), DEFAULT_INTERVAL, None);
        }

        #[test]
        fn showing_again_replaces_lists() {
            let mut view = shown(&["A", "B", "C"]);
            view.show_images(urls(&["X", "Y"]), None, DEFAULT_INTERVAL, None);
            assert_eq!(view.urls(), ["X", "Y", "X", "Y"]);
            assert_eq!(view.page_count(), 2);
        }
    }

    mod property_settle {
        use super::*;

        #[test]
        fn settle_on_first_page_jumps_to_second_to_last() {
            let mut view = shown(&["A", "B", "C"]);
            assert_eq!(view.did_end_displaying(0), Some(Scroll::Jump(3)));
            assert_eq!(view.visible_index(), 3);
            assert_eq!(view.current_page(), 0);
        }

        #[test]
        fn settle_on_last_page_jumps_to_one() {
            let mut view = shown(&["A", "B", "C"]);
            assert_eq!(view.did_end_displaying(4), Some(Scroll::Jump(1)));
            assert_eq!(view.visible_index(), 1);
            assert_eq!(view.current_page(), 1);
        }

        #[test]
        fn settle_inside_the_list_does_not_jump() {
            let mut view = shown(&["A", "B", "C"]);
            assert_eq!(view.did_end_displaying(2), None);
            assert_eq!(view.current_page(), 2);
        }

        #[test]
        fn jump_targets_show_the_same_image() {
            let mut view = shown(&["A", "B", "C", "D"]);
            for index in [0, view.len() - 1] {
                let url = view.urls()[index].clone();
                if let Some(Scroll::Jump(target)) = view.did_end_displaying(index) {
                    assert_eq!(view.urls()[target], url);
                } else {
                    panic!("expected a wrap jump from {}", index);
                }
            }
        }

        #[test]
        fn out_of_range_settle_is_ignored() {
            let mut view = shown(&["A", "B"]);
            view.reload();
            assert_eq!(view.did_end_displaying(10), None);
            assert_eq!(view.visible_index(), 2);
        }
    }

    mod property_timer {
        use super::*;

        #[test]
        fn timer_never_starts_for_single_image() {
            let mut view = shown(&["A"]);
            view.start_timer();
            assert!(!view.is_timer_running());
            view.relayout();
            assert!(!view.is_timer_running());
        }

        #[test]
        fn repeated_stop_start_leaves_one_timer() {
            let mut view = shown(&["A", "B", "C"]);
            let first = view.timer().expect("timer starts with images");

            view.stop_timer();
            view.stop_timer();
            view.start_timer();
            view.start_timer();

            let timer = view.timer().expect("timer restarted");
            assert_eq!(timer.generation, first.generation + 1);
            assert_eq!(timer.interval, DEFAULT_INTERVAL);
        }

        #[test]
        fn zero_interval_falls_back_to_default() {
            let mut view: LoopView<usize> = LoopView::default();
            view.show_images(urls(&["A", "B"]), None, Duration::ZERO, None);
            assert_eq!(view.timer().map(|t| t.interval), Some(DEFAULT_INTERVAL));
        }

        #[test]
        fn tick_advances_one_page() {
            let mut view = shown(&["A", "B", "C"]);
            view.reload();
            assert_eq!(view.timer_fired(), Some(Scroll::Animated(4)));
        }

        #[test]
        fn tick_past_the_wrap_buffer_does_nothing() {
            let mut view = shown(&["A", "B", "C"]);
            // Force the visible page onto the last backing page without a settle
            view.visible_index = 4;
            assert_eq!(view.timer_fired(), None);
        }

        #[test]
        fn tick_without_timer_does_nothing() {
            let mut view = shown(&["A", "B", "C"]);
            view.stop_timer();
            assert_eq!(view.timer_fired(), None);
        }

        #[test]
        fn drag_pauses_and_resumes() {
            let mut view = shown(&["A", "B"]);
            view.drag_began();
            assert!(!view.is_timer_running());

            view.drag_ended(true);
            assert!(!view.is_timer_running());

            view.deceleration_ended();
            assert!(view.is_timer_running());

            view.drag_began();
            view.drag_ended(false);
            assert!(view.is_timer_running());
        }

        #[test]
        fn relayout_restarts_timer_and_resyncs() {
            let mut view = shown(&["A", "B", "C"]);
            view.reload();
            let before = view.timer().unwrap().generation;

            assert_eq!(view.relayout(), Some(Scroll::Jump(3)));
            assert_eq!(view.timer().unwrap().generation, before + 1);
        }
    }

    mod property_selection {
        use super::*;

        #[test]
        fn tap_reports_real_index() {
            let view = shown(&["A", "B", "C"]);
            for index in 0..view.len() {
                assert_eq!(view.tap(index), Some(index % 3));
            }
        }

        #[test]
        fn single_image_always_reports_zero() {
            let view = shown(&["A"]);
            assert_eq!(view.tap(0), Some(0));
            assert_eq!(view.tap(7), Some(0));
        }

        #[test]
        fn tap_without_mapper_reports_nothing() {
            let mut view: LoopView<usize> = LoopView::default();
            view.show_images(urls(&["A", "B"]), None, DEFAULT_INTERVAL, None);
            assert_eq!(view.tap(1), None);
        }
    }

    mod property_layout {
        use super::*;

        #[test]
        fn setters_recompute_layout() {
            let mut view: LoopView<usize> = LoopView::default();
            view.set_caption_position(CaptionPosition::None);
            view.set_indicator_position(IndicatorPosition::Right);
            assert_eq!(
                view.layout(),
                LayoutSpec::new(CaptionPosition::None, IndicatorPosition::Right)
            );
            assert_eq!(view.layout().caption, None);
        }
    }

    #[test]
    fn three_image_scenario() {
        let mut view = shown(&["A", "B", "C"]);
        assert_eq!(view.urls(), ["A", "B", "C", "A", "B"]);
        assert!(view.is_timer_running());

        assert_eq!(view.reload(), Some(Scroll::Jump(3)));
        assert_eq!(view.reload(), None, "reload runs once");
        assert_eq!(view.visible_index(), 3);
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.tap(3), Some(0));
    }
}
