//! A single page of the loop view

use std::sync::Arc;

use iced::widget::canvas;
use iced::{Color, Point, Rectangle, Size, Task};

use crate::features::image_loader::{ImageLoader, LoadOptions, LoadedImage};
use crate::ui::components::loop_view::Event;

/// Letterbox and placeholder fill
pub const PLACEHOLDER: Color = Color::from_rgb(0.15, 0.1, 0.2);

/// One page, identified by its image location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopViewCell {
    url: String,
}

impl LoopViewCell {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the loader for this page's image
    ///
    /// Caching and retries are entirely the loader's business.
    pub fn load(&self, loader: Arc<ImageLoader>) -> Task<Event> {
        let url = self.url.clone();
        Task::perform(
            async move {
                let result = loader.load(&url, LoadOptions::REFRESH_AND_RETRY).await;
                (url, result)
            },
            |(url, result)| Event::ImageLoaded(url, result),
        )
    }

    /// Draw the page with its left edge at `offset_x`
    pub fn draw(
        &self,
        frame: &mut canvas::Frame,
        image: Option<&LoadedImage>,
        size: Size,
        offset_x: f32,
    ) {
        let fit = image.and_then(|image| {
            contain_rect(image.width, image.height, size, offset_x).map(|rect| (image, rect))
        });

        let Some((image, rect)) = fit else {
            frame.fill_rectangle(Point::new(offset_x, 0.0), size, PLACEHOLDER);
            return;
        };

        if rect.width < size.width || rect.height < size.height {
            frame.fill_rectangle(Point::new(offset_x, 0.0), size, PLACEHOLDER);
        }

        frame.draw_image(rect, canvas::Image::new(&image.path));
    }
}

/// Largest rectangle with the image's aspect ratio that fits the page, centered
pub fn contain_rect(width: u32, height: u32, page: Size, offset_x: f32) -> Option<Rectangle> {
    if width == 0 || height == 0 || page.width <= 0.0 || page.height <= 0.0 {
        return None;
    }

    let img_w = width as f32;
    let img_h = height as f32;
    let scale = (page.width / img_w).min(page.height / img_h);

    let final_w = img_w * scale;
    let final_h = img_h * scale;

    Some(Rectangle::new(
        Point::new(
            offset_x + (page.width - final_w) / 2.0,
            (page.height - final_h) / 2.0,
        ),
        Size::new(final_w, final_h),
    ))
}
