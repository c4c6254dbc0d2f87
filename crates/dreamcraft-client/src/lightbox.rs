//! Modal image viewer state.

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::keyboard::{Key, KeyboardHub};

/// Zoom and pan of the image shown in the lightbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f32,
    offset: (f32, f32),
}

impl Zoom {
    pub const MIN_SCALE: f32 = 1.0;
    pub const MAX_SCALE: f32 = 4.0;
    pub const STEP: f32 = 0.5;

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn is_zoomed(&self) -> bool {
        self.scale > Self::MIN_SCALE
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + Self::STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - Self::STEP);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        if !self.is_zoomed() {
            self.offset = (0.0, 0.0);
        }
    }

    /// Move the image; ignored at 1× where there is nothing to pan.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.is_zoomed() {
            self.offset = (self.offset.0 + dx, self.offset.1 + dy);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            scale: Self::MIN_SCALE,
            offset: (0.0, 0.0),
        }
    }
}

/// An open lightbox over a filtered set of `len` entries.
///
/// Holds a keyboard listener for as long as it exists; closing the lightbox
/// (dropping it) unbinds the keys.
#[derive(Debug)]
pub struct Lightbox {
    index: usize,
    len: usize,
    zoom: Zoom,
    keys: broadcast::Receiver<Key>,
}

impl Lightbox {
    /// Open at `index`, or `None` when it is out of range.
    pub fn open(index: usize, len: usize, keys: &KeyboardHub) -> Option<Self> {
        (index < len).then(|| Self {
            index,
            len,
            zoom: Zoom::default(),
            keys: keys.subscribe(),
        })
    }

    /// Position within the filtered set.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Footer counter, e.g. `"2 of 5"`.
    pub fn position_label(&self) -> String {
        format!("{} of {}", self.index + 1, self.len)
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut Zoom {
        &mut self.zoom
    }

    pub fn next(&mut self) {
        self.show((self.index + 1) % self.len);
    }

    pub fn prev(&mut self) {
        self.show((self.index + self.len - 1) % self.len);
    }

    fn show(&mut self, index: usize) {
        self.index = index;
        self.zoom.reset();
    }

    /// Next pending key press, if any.
    pub(crate) fn take_key(&mut self) -> Option<Key> {
        loop {
            match self.keys.try_recv() {
                Ok(key) => return Some(key),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!("Dropped {} key presses", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_forward_and_backward() {
        let hub = KeyboardHub::new();
        let mut lightbox = Lightbox::open(2, 3, &hub).unwrap();

        lightbox.next();
        assert_eq!(lightbox.index(), 0);

        lightbox.prev();
        assert_eq!(lightbox.index(), 2);
    }

    #[test]
    fn single_entry_stays_put() {
        let hub = KeyboardHub::new();
        let mut lightbox = Lightbox::open(0, 1, &hub).unwrap();

        lightbox.next();
        lightbox.prev();

        assert_eq!(lightbox.index(), 0);
    }

    #[test]
    fn refuses_out_of_range_index() {
        let hub = KeyboardHub::new();
        assert!(Lightbox::open(3, 3, &hub).is_none());
        assert!(Lightbox::open(0, 0, &hub).is_none());
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn switching_images_resets_zoom() {
        let hub = KeyboardHub::new();
        let mut lightbox = Lightbox::open(0, 3, &hub).unwrap();
        lightbox.zoom_mut().zoom_in();
        lightbox.zoom_mut().pan(10.0, -5.0);
        assert!(lightbox.zoom().is_zoomed());

        lightbox.next();

        assert_eq!(*lightbox.zoom(), Zoom::default());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut zoom = Zoom::default();
        for _ in 0..20 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.scale(), Zoom::MAX_SCALE);

        zoom.pan(3.0, 4.0);
        for _ in 0..20 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.scale(), Zoom::MIN_SCALE);
        assert_eq!(zoom.offset(), (0.0, 0.0));
    }

    #[test]
    fn no_pan_at_default_scale() {
        let mut zoom = Zoom::default();
        zoom.pan(5.0, 5.0);
        assert_eq!(zoom.offset(), (0.0, 0.0));
    }

    #[test]
    fn holds_key_listener_while_open() {
        let hub = KeyboardHub::new();
        let lightbox = Lightbox::open(0, 2, &hub).unwrap();
        assert_eq!(hub.listener_count(), 1);

        drop(lightbox);

        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn formats_position() {
        let hub = KeyboardHub::new();
        let lightbox = Lightbox::open(1, 5, &hub).unwrap();
        assert_eq!(lightbox.position_label(), "2 of 5");
    }
}
