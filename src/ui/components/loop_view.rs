//! Loop view component
//!
//! Auto-scrolling image carousel: pages drawn on a canvas, an optional
//! caption and an optional page indicator. The host owns a
//! [`LoopViewState`], forwards [`Event`]s to [`LoopViewState::update`] and
//! maps the returned selection into its own message.

pub mod scroll;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use iced::time::Instant;
use iced::widget::{Space, canvas, column, container, mouse_area, row, stack, text};
use iced::{
    Alignment, Element, Fill, Length, Padding, Point, Rectangle, Renderer, Subscription, Task,
    Theme, mouse,
};
use tracing::{debug, warn};

use self::scroll::{PagingScroll, Release};
use crate::features::image_loader::{ImageLoader, LoadedImage, LoaderError};
use crate::features::loop_view::{
    CaptionLayer, CaptionPosition, IndicatorLayer, IndicatorPosition, LoopView, OnSelect, Scroll,
    layout::CAPTION_HEIGHT,
};
use crate::ui::components::loop_view_cell::{LoopViewCell, PLACEHOLDER};
use crate::ui::theme;

const INDICATOR_SIZE: f32 = 8.0;
const INDICATOR_SPACING: f32 = 8.0;
/// Cursor travel before a press becomes a drag
const TAP_SLOP: f32 = 6.0;

/// Loop view events
#[derive(Debug, Clone)]
pub enum Event {
    /// Deferred reload after new images were shown
    Reload,
    /// Auto-advance tick
    TimerFired,
    /// Frame tick while a page transition runs
    AnimationTick,
    /// Image request finished
    ImageLoaded(String, Result<LoadedImage, LoaderError>),
    Pressed,
    Released,
    CursorMoved(Point),
    CursorExited,
}

/// Load state of one image location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Loading,
    Ready(LoadedImage),
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: Point,
    dragging: bool,
}

#[derive(Debug)]
pub struct LoopViewState<M> {
    core: LoopView<M>,
    scroll: PagingScroll,
    cells: Vec<LoopViewCell>,
    images: HashMap<String, ImageSlot>,
    loader: Arc<ImageLoader>,
    page_width: f32,
    height: f32,
    cursor: Option<Point>,
    press: Option<Press>,
}

impl<M> LoopViewState<M> {
    pub fn new(
        loader: Arc<ImageLoader>,
        caption_position: CaptionPosition,
        indicator_position: IndicatorPosition,
    ) -> Self {
        Self {
            core: LoopView::new(caption_position, indicator_position),
            scroll: PagingScroll::default(),
            cells: Vec::new(),
            images: HashMap::new(),
            loader,
            page_width: 800.0,
            height: 280.0,
            cursor: None,
            press: None,
        }
    }

    /// Fixed height of the pages
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Replace the displayed images
    ///
    /// Returns the image requests and the deferred reload.
    pub fn show_images(
        &mut self,
        urls: Vec<String>,
        tips: Option<Vec<String>>,
        interval: Duration,
        on_select: Option<OnSelect<M>>,
    ) -> Task<Event> {
        self.core.show_images(urls, tips, interval, on_select);
        self.press = None;
        self.scroll.reset(self.core.len());
        self.cells = self.core.urls().iter().map(LoopViewCell::new).collect();

        let wanted: HashSet<&str> = self.cells.iter().map(LoopViewCell::url).collect();
        self.images.retain(|url, _| wanted.contains(url.as_str()));

        let mut requested = HashSet::new();
        let mut tasks = Vec::new();
        for cell in &self.cells {
            if !requested.insert(cell.url()) {
                continue;
            }
            if matches!(self.images.get(cell.url()), Some(ImageSlot::Ready(_))) {
                continue;
            }
            self.images
                .insert(cell.url().to_string(), ImageSlot::Loading);
            tasks.push(cell.load(Arc::clone(&self.loader)));
        }
        debug!("Loop view requesting {} images", tasks.len());

        if self.core.is_reload_pending() {
            tasks.push(Task::done(Event::Reload));
        }
        Task::batch(tasks)
    }

    pub fn start_timer(&mut self) {
        self.core.start_timer();
    }

    pub fn stop_timer(&mut self) {
        self.core.stop_timer();
    }

    /// Re-synchronize after a size change
    ///
    /// Ignored mid-drag, the release restarts the timer.
    pub fn relayout(&mut self) {
        if self.press.is_some_and(|press| press.dragging) {
            return;
        }
        if let Some(scroll) = self.core.relayout() {
            self.apply(scroll, Instant::now());
        }
    }

    /// Width of one page, used to convert drags into page offsets
    pub fn set_page_width(&mut self, width: f32) {
        if width > 0.0 {
            self.page_width = width;
        }
    }

    pub fn set_caption_position(&mut self, position: CaptionPosition) {
        self.core.set_caption_position(position);
    }

    pub fn set_indicator_position(&mut self, position: IndicatorPosition) {
        self.core.set_indicator_position(position);
    }

    pub fn caption_position(&self) -> CaptionPosition {
        self.core.caption_position()
    }

    pub fn indicator_position(&self) -> IndicatorPosition {
        self.core.indicator_position()
    }

    pub fn is_timer_running(&self) -> bool {
        self.core.is_timer_running()
    }

    pub fn current_page(&self) -> usize {
        self.core.current_page()
    }

    pub fn page_count(&self) -> usize {
        self.core.page_count()
    }

    /// Drop every loaded image so the next `show_images` requests them again
    pub fn forget_images(&mut self) {
        self.images.clear();
    }

    /// Handle an event, returning follow-up work and the host's selection message
    pub fn update(&mut self, event: Event) -> (Task<Event>, Option<M>) {
        let now = Instant::now();
        let mut selected = None;

        match event {
            Event::Reload => {
                if let Some(scroll) = self.core.reload() {
                    self.apply(scroll, now);
                }
            }
            Event::TimerFired => {
                self.finish_transition(now);
                // Let a running transition or the user's hand finish first
                if self.press.is_none() && !self.scroll.is_animating(now) {
                    if let Some(scroll) = self.core.timer_fired() {
                        self.apply(scroll, now);
                    }
                }
            }
            Event::AnimationTick => self.finish_transition(now),
            Event::ImageLoaded(url, result) => {
                if let Some(slot) = self.images.get_mut(&url) {
                    *slot = match result {
                        Ok(image) => ImageSlot::Ready(image),
                        Err(e) => {
                            warn!("Loop view image {} unavailable: {}", url, e);
                            ImageSlot::Failed
                        }
                    };
                }
            }
            Event::Pressed => {
                self.press = self.cursor.map(|start| Press {
                    start,
                    dragging: false,
                });
            }
            Event::CursorMoved(position) => {
                self.cursor = Some(position);
                if let Some(press) = self.press.as_mut() {
                    if !press.dragging && (position.x - press.start.x).abs() > TAP_SLOP {
                        press.dragging = true;
                        let start_x = press.start.x;
                        self.finish_transition(now);
                        self.scroll.begin_drag(start_x, now);
                        self.core.drag_began();
                    }
                }
                if self.press.is_some_and(|press| press.dragging) {
                    self.scroll.drag_to(position.x, self.page_width);
                }
            }
            Event::Released => {
                if let Some(press) = self.press.take() {
                    if press.dragging {
                        self.end_drag(now);
                    } else if !self.core.is_empty() {
                        selected = self.core.tap(self.scroll.nearest_page(now));
                    }
                }
            }
            Event::CursorExited => {
                self.cursor = None;
                if self.press.take().is_some_and(|press| press.dragging) {
                    self.end_drag(now);
                }
            }
        }

        (Task::none(), selected)
    }

    /// Deliver the settle of a transition whose animation has run out
    fn finish_transition(&mut self, now: Instant) {
        if let Some(settled) = self.scroll.tick(now) {
            self.settle(settled.index, now);
            if settled.from_drag {
                self.core.deceleration_ended();
            }
        }
    }

    fn end_drag(&mut self, now: Instant) {
        match self.scroll.release() {
            Some(Release::Settled(index)) => {
                self.core.drag_ended(false);
                self.settle(index, now);
            }
            Some(Release::Decelerate(index)) => {
                self.core.drag_ended(true);
                self.scroll.animate_to(index, now, true);
            }
            None => self.core.drag_ended(false),
        }
    }

    fn settle(&mut self, index: usize, now: Instant) {
        if let Some(scroll) = self.core.did_end_displaying(index) {
            self.apply(scroll, now);
        }
    }

    fn apply(&mut self, scroll: Scroll, now: Instant) {
        match scroll {
            Scroll::Animated(index) => self.scroll.animate_to(index, now, false),
            Scroll::Jump(index) => self.scroll.jump_to(index),
        }
    }

    /// Timer ticks and animation frames
    pub fn subscription(&self) -> Subscription<Event> {
        let timer = match self.core.timer() {
            Some(timer) => iced::time::every(timer.interval)
                .with(timer.generation)
                .map(|_| Event::TimerFired),
            None => Subscription::none(),
        };

        let frames = if self.wants_frames() {
            iced::window::frames().map(|_| Event::AnimationTick)
        } else {
            Subscription::none()
        };

        Subscription::batch([timer, frames])
    }

    /// Pages plus a caption bar placed below them
    fn outer_height(&self) -> f32 {
        match self.core.layout().caption {
            Some(CaptionLayer::Below) => self.height + CAPTION_HEIGHT,
            _ => self.height,
        }
    }

    /// Frames are needed until the transition has been settled, not just animated
    fn wants_frames(&self) -> bool {
        self.scroll.is_settling()
    }

    pub fn view(&self) -> Element<'_, Event> {
        let layout = self.core.layout();

        let pages: Element<'_, Event> = mouse_area(
            canvas(PageStrip {
                cells: &self.cells,
                images: &self.images,
                offset: self.scroll.offset_at(Instant::now()),
            })
            .width(Fill)
            .height(self.height),
        )
        .on_press(Event::Pressed)
        .on_release(Event::Released)
        .on_move(Event::CursorMoved)
        .on_exit(Event::CursorExited)
        .interaction(mouse::Interaction::Pointer)
        .into();

        let caption = self.core.caption().unwrap_or_default();

        let mut layers = vec![pages];

        if let Some(CaptionLayer::Overlay { trailing_inset }) = layout.caption {
            layers.push(
                container(caption_bar(caption, trailing_inset).style(theme::caption_overlay))
                    .width(Fill)
                    .height(self.height)
                    .align_y(iced::alignment::Vertical::Bottom)
                    .into(),
            );
        }

        if let Some(indicator) = layout.indicator {
            let dots = self.indicator();
            let placed = match indicator {
                IndicatorLayer::Centered { bottom } => container(dots)
                    .width(Fill)
                    .height(self.height)
                    .padding(Padding::new(0.0).bottom(bottom))
                    .align_x(iced::alignment::Horizontal::Center)
                    .align_y(iced::alignment::Vertical::Bottom),
                IndicatorLayer::BottomRight { bottom, right } => container(dots)
                    .width(Fill)
                    .height(self.height)
                    .padding(Padding::new(0.0).bottom(bottom).right(right))
                    .align_x(iced::alignment::Horizontal::Right)
                    .align_y(iced::alignment::Vertical::Bottom),
            };
            layers.push(placed.into());
        }

        let stacked = stack(layers).width(Fill).height(self.height);

        let content: Element<'_, Event> = match layout.caption {
            Some(CaptionLayer::Below) => column![
                container(stacked).width(Fill).height(self.height).clip(true),
                caption_bar(caption, 0.0).style(theme::caption_split),
            ]
            .into(),
            _ => container(stacked)
                .width(Fill)
                .height(self.height)
                .clip(true)
                .into(),
        };

        container(content)
            .width(Fill)
            .height(self.outer_height())
            .style(theme::loop_view_frame)
            .into()
    }

    /// Page indicator dots, hidden for a single page
    fn indicator(&self) -> Element<'_, Event> {
        let count = self.core.page_count();
        if count <= 1 {
            return Space::new().width(0).height(0).into();
        }

        let current = self.core.current_page();
        row((0..count).map(|i| {
            let is_active = i == current;
            container(Space::new().width(INDICATOR_SIZE).height(INDICATOR_SIZE))
                .style(move |t: &Theme| container::Style {
                    background: Some(
                        if is_active {
                            theme::indicator_active(t)
                        } else {
                            theme::indicator_inactive(t)
                        }
                        .into(),
                    ),
                    border: iced::Border {
                        radius: (INDICATOR_SIZE / 2.0).into(),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .into()
        }))
        .spacing(INDICATOR_SPACING)
        .align_y(Alignment::Center)
        .into()
    }
}

fn caption_bar<'a>(caption: &'a str, trailing_inset: f32) -> container::Container<'a, Event> {
    container(text(caption).size(14).wrapping(text::Wrapping::None))
        .width(Fill)
        .height(Length::Fixed(CAPTION_HEIGHT))
        .padding(Padding::new(0.0).left(16.0).right(16.0 + trailing_inset))
        .align_y(iced::alignment::Vertical::Center)
}

/// Draws the pages visible at `offset`
struct PageStrip<'a> {
    cells: &'a [LoopViewCell],
    images: &'a HashMap<String, ImageSlot>,
    offset: f32,
}

impl<'a, Message> canvas::Program<Message> for PageStrip<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let size = bounds.size();

        if self.cells.is_empty() {
            frame.fill_rectangle(Point::ORIGIN, size, PLACEHOLDER);
            return vec![frame.into_geometry()];
        }

        let first = self.offset.floor().max(0.0);
        let fraction = self.offset - first;
        let first = first as usize;

        // At most two pages are on screen at any offset
        for (index, x) in [
            (first, -fraction * size.width),
            (first + 1, (1.0 - fraction) * size.width),
        ] {
            if x >= size.width {
                continue;
            }
            let Some(cell) = self.cells.get(index) else {
                continue;
            };
            let image = match self.images.get(cell.url()) {
                Some(ImageSlot::Ready(image)) => Some(image),
                _ => None,
            };
            cell.draw(&mut frame, image, size, x);
        }

        vec![frame.into_geometry()]
    }
}
