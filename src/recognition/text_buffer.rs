use std::time::{Duration, Instant};

const DEFAULT_LINE_HEIGHT: f32 = 20.0;
const DEFAULT_VIEWPORT_HEIGHT: f32 = 160.0;

/// Recognized letters plus the user-editable text they are appended to.
///
/// `detected` only ever grows. `text` is what the user sees and may be
/// overwritten at any time; appends concatenate onto whatever it holds.
#[derive(Clone, Debug)]
pub struct TextBuffer {
    detected: String,
    text: String,
    scroll_top: f32,
    line_height: f32,
    viewport_height: f32,
    columns: usize,
    scroll_delay: Duration,
    pending_scroll: Option<Instant>,
    scrolls: u64,
}

impl TextBuffer {
    pub fn new(scroll_delay: Duration) -> Self {
        Self {
            detected: String::new(),
            text: String::new(),
            scroll_top: 0.0,
            line_height: DEFAULT_LINE_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            columns: 0,
            scroll_delay,
            pending_scroll: None,
            scrolls: 0,
        }
    }

    pub fn detected_letters(&self) -> &str {
        &self.detected
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    /// Appends `label` and a separator space, then schedules a scroll to the
    /// bottom once the delay has passed.
    pub fn apply_letter(&mut self, label: &str, now: Instant) {
        for target in [&mut self.detected, &mut self.text] {
            target.push_str(label);
            target.push(' ');
        }
        self.pending_scroll = Some(now + self.scroll_delay);
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Viewport geometry used to compute the scroll range. `columns == 0`
    /// disables soft wrapping.
    pub fn set_metrics(&mut self, viewport_height: f32, line_height: f32, columns: usize) {
        self.viewport_height = viewport_height.max(0.0);
        self.line_height = line_height.max(1.0);
        self.columns = columns;
    }

    pub fn set_scroll_top(&mut self, scroll_top: f32) {
        self.scroll_top = scroll_top.clamp(0.0, self.max_scroll());
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll.is_some()
    }

    /// Number of scroll-to-bottom requests applied so far. A view whose real
    /// layout differs from these metrics follows this counter.
    pub fn scroll_count(&self) -> u64 {
        self.scrolls
    }

    /// Applies a due scroll-to-bottom. Returns `true` when the scroll
    /// position was updated.
    pub fn poll_scroll(&mut self, now: Instant) -> bool {
        match self.pending_scroll {
            Some(deadline) if now >= deadline => {
                self.pending_scroll = None;
                self.scroll_top = self.max_scroll();
                self.scrolls += 1;
                true
            }
            _ => false,
        }
    }

    pub fn content_height(&self) -> f32 {
        self.line_count() as f32 * self.line_height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    fn line_count(&self) -> usize {
        let wrapped = |line: &str| {
            let chars = line.chars().count();
            if self.columns == 0 || chars == 0 {
                1
            } else {
                chars.div_ceil(self.columns)
            }
        };
        let mut count: usize = self.text.split('\n').map(wrapped).sum();
        if count == 0 {
            count = 1;
        }
        count
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}
