//! Paging scroll container model
//!
//! Tracks a fractional page offset, follows drags, and animates between
//! pages. Settles are reported from [`PagingScroll::tick`] and
//! [`PagingScroll::release`].

use iced::animation::Animation;
use iced::time::Instant;

/// Fraction of a page a drag must cover to turn the page
const PAGE_THRESHOLD: f32 = 1.0 / 3.0;

/// A finished transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub index: usize,
    /// The transition was the deceleration of a drag
    pub from_drag: bool,
}

/// Outcome of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Already resting on a page
    Settled(usize),
    /// Will animate to the page
    Decelerate(usize),
}

#[derive(Debug)]
struct Transition {
    from: f32,
    to: usize,
    animation: Animation<bool>,
    from_drag: bool,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    origin_offset: f32,
    start_x: f32,
}

#[derive(Debug, Default)]
pub struct PagingScroll {
    /// Resting offset in pages
    offset: f32,
    len: usize,
    transition: Option<Transition>,
    drag: Option<Drag>,
}

impl PagingScroll {
    /// Start over with `len` pages
    pub fn reset(&mut self, len: usize) {
        *self = Self {
            len,
            ..Self::default()
        };
    }

    /// Move to `index` without animation
    pub fn jump_to(&mut self, index: usize) {
        self.transition = None;
        self.offset = self.clamp(index as f32);
    }

    /// Animate from wherever the pages currently are to `index`
    pub fn animate_to(&mut self, index: usize, now: Instant, from_drag: bool) {
        let from = self.offset_at(now);
        let to = index.min(self.len.saturating_sub(1));

        let mut animation = Animation::new(false).slow();
        animation.go_mut(true, now);

        self.offset = from;
        self.transition = Some(Transition {
            from,
            to,
            animation,
            from_drag,
        });
    }

    /// Offset to draw at `now`
    pub fn offset_at(&self, now: Instant) -> f32 {
        match &self.transition {
            Some(transition) => {
                let progress = transition.animation.interpolate(0.0_f32, 1.0_f32, now);
                // Ease out cubic
                let eased = 1.0 - (1.0 - progress).powi(3);
                transition.from + (transition.to as f32 - transition.from) * eased
            }
            None => self.offset,
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|t| t.animation.is_animating(now))
    }

    /// A transition exists that [`PagingScroll::tick`] has not yet settled
    pub fn is_settling(&self) -> bool {
        self.transition.is_some()
    }

    /// Finish a completed transition
    pub fn tick(&mut self, now: Instant) -> Option<Settled> {
        if self.is_animating(now) {
            return None;
        }
        let transition = self.transition.take()?;
        self.offset = transition.to as f32;
        Some(Settled {
            index: transition.to,
            from_drag: transition.from_drag,
        })
    }

    /// Page closest to what is on screen at `now`
    pub fn nearest_page(&self, now: Instant) -> usize {
        self.offset_at(now).round().max(0.0) as usize
    }

    /// Grab the pages at cursor position `x`, freezing any running transition
    pub fn begin_drag(&mut self, x: f32, now: Instant) {
        self.offset = self.offset_at(now);
        self.transition = None;
        self.drag = Some(Drag {
            origin_offset: self.offset,
            start_x: x,
        });
    }

    /// Follow the cursor
    pub fn drag_to(&mut self, x: f32, page_width: f32) {
        let Some(drag) = self.drag else {
            return;
        };
        if page_width <= 0.0 {
            return;
        }
        let delta = (drag.start_x - x) / page_width;
        self.offset = self.clamp(drag.origin_offset + delta);
    }

    /// Let go of the pages and pick the page to rest on
    pub fn release(&mut self) -> Option<Release> {
        let drag = self.drag.take()?;
        let moved = self.offset - drag.origin_offset;

        let target = if moved > PAGE_THRESHOLD {
            self.offset.ceil()
        } else if moved < -PAGE_THRESHOLD {
            self.offset.floor()
        } else {
            drag.origin_offset.round()
        };
        let target = self.clamp(target) as usize;

        if (self.offset - target as f32).abs() < f32::EPSILON {
            self.offset = target as f32;
            Some(Release::Settled(target))
        } else {
            Some(Release::Decelerate(target))
        }
    }

    fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.len.saturating_sub(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const WIDTH: f32 = 300.0;

    fn scroll(len: usize, at: usize) -> PagingScroll {
        let mut scroll = PagingScroll::default();
        scroll.reset(len);
        scroll.jump_to(at);
        scroll
    }

    #[test]
    fn jump_is_clamped() {
        let mut scroll = scroll(5, 2);
        scroll.jump_to(9);
        assert_eq!(scroll.nearest_page(Instant::now()), 4);
    }

    #[test]
    fn animation_settles_on_target() {
        let now = Instant::now();
        let mut scroll = scroll(5, 2);
        scroll.animate_to(3, now, false);

        assert!(scroll.is_animating(now));
        assert_eq!(scroll.tick(now), None);
        assert_eq!(scroll.offset_at(now), 2.0);

        let later = now + Duration::from_secs(2);
        assert!(!scroll.is_animating(later));
        assert!(scroll.is_settling(), "finished but not yet ticked");
        assert_eq!(scroll.offset_at(later), 3.0);
        assert_eq!(
            scroll.tick(later),
            Some(Settled {
                index: 3,
                from_drag: false
            })
        );
        assert!(!scroll.is_settling());
        assert_eq!(scroll.tick(later), None, "settles once");
    }

    #[test]
    fn short_drag_snaps_back() {
        let now = Instant::now();
        let mut scroll = scroll(5, 2);
        scroll.begin_drag(200.0, now);
        scroll.drag_to(200.0 - WIDTH * 0.2, WIDTH);

        assert_eq!(scroll.release(), Some(Release::Decelerate(2)));
    }

    #[test]
    fn long_drag_turns_the_page() {
        let now = Instant::now();
        let mut scroll = scroll(5, 2);

        scroll.begin_drag(200.0, now);
        scroll.drag_to(200.0 - WIDTH * 0.5, WIDTH);
        assert_eq!(scroll.release(), Some(Release::Decelerate(3)));

        scroll.jump_to(2);
        scroll.begin_drag(100.0, now);
        scroll.drag_to(100.0 + WIDTH * 0.4, WIDTH);
        assert_eq!(scroll.release(), Some(Release::Decelerate(1)));
    }

    #[test]
    fn drag_onto_a_page_boundary_is_settled() {
        let now = Instant::now();
        let mut scroll = scroll(5, 2);
        scroll.begin_drag(400.0, now);
        scroll.drag_to(400.0 - WIDTH, WIDTH);

        assert_eq!(scroll.release(), Some(Release::Settled(3)));
        assert!(scroll.drag.is_none());
    }

    #[test]
    fn drag_is_clamped_at_the_ends() {
        let now = Instant::now();
        let mut scroll = scroll(3, 0);
        scroll.begin_drag(0.0, now);
        scroll.drag_to(WIDTH * 2.0, WIDTH);
        assert_eq!(scroll.offset_at(now), 0.0);
        assert_eq!(scroll.release(), Some(Release::Settled(0)));
    }

    #[test]
    fn drag_interrupts_animation() {
        let now = Instant::now();
        let mut scroll = scroll(5, 1);
        scroll.animate_to(2, now, false);
        scroll.begin_drag(0.0, now);

        assert!(!scroll.is_animating(now));
        assert_eq!(scroll.tick(now + Duration::from_secs(2)), None);
    }

    #[test]
    fn release_without_drag_is_none() {
        let mut scroll = scroll(3, 1);
        assert_eq!(scroll.release(), None);
    }
}
