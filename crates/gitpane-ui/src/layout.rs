use crate::settings::ViewSettings;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Drag {
    start_x: f32,
    start_width: f32,
}

/// Two-pane layout with a draggable divider. Only the left pane width is tracked; the right
/// pane takes whatever is left.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPane {
    width: f32,
    min_width: f32,
    max_width: f32,
    drag: Option<Drag>,
}

impl SplitPane {
    /// Non-finite bounds are treated as unbounded on that side; `f32::clamp` rejects NaN.
    pub fn new(initial_width: f32, min_width: f32, max_width: f32) -> Self {
        let min_width = if min_width.is_finite() { min_width } else { 0.0 };
        let max_width = if max_width.is_finite() { max_width } else { f32::MAX };
        let (min_width, max_width) = if min_width <= max_width {
            (min_width, max_width)
        } else {
            (max_width, min_width)
        };
        let initial_width = if initial_width.is_nan() { min_width } else { initial_width };
        Self {
            width: initial_width.clamp(min_width, max_width),
            min_width,
            max_width,
            drag: None,
        }
    }

    pub fn from_settings(settings: &ViewSettings) -> Self {
        Self::new(
            settings.initial_width,
            settings.min_width,
            settings.max_width,
        )
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min_width, self.max_width)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pointer_down_on_divider(&mut self, x: f32) {
        self.drag = Some(Drag {
            start_x: x,
            start_width: self.width,
        });
    }

    /// Returns true when the width changed.
    pub fn pointer_move(&mut self, x: f32) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let next = (drag.start_width + (x - drag.start_x)).clamp(self.min_width, self.max_width);
        if next == self.width {
            return false;
        }
        self.width = next;
        true
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Leaving the tracked region ends the drag just like releasing the button.
    pub fn pointer_leave(&mut self) {
        self.drag = None;
    }

    /// Keeps the current width valid after the host shrinks or grows the allowed range.
    pub fn set_bounds(&mut self, min_width: f32, max_width: f32) {
        let width = self.width;
        let dragging = self.drag;
        *self = Self::new(width, min_width, max_width);
        self.drag = dragging;
    }
}
