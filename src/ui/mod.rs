use std::{sync::Arc, time::Instant};

use gpui::{
    AnyElement, App, AppContext, Context, Entity, InteractiveElement, IntoElement, ObjectFit,
    ParentElement, Pixels, Render, RenderImage, ScrollHandle, SharedString, StatefulInteractiveElement,
    Styled, StyledImage, Subscription, TitlebarOptions, Window, WindowOptions, div, img, point, px,
};
use gpui_component::{
    ActiveTheme, Root, StyledExt,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    v_flex,
};

#[cfg(feature = "camera-nokhwa")]
use crate::pipeline::{CameraStream, start_camera_stream};
use crate::{
    config::SignaConfig,
    pipeline::{OrtHandDetector, VideoElement, VideoSource},
    recognition::{LoopStatus, RecognitionController, TextBuffer},
    types::CameraState,
};

mod main_view;
mod render_util;

const TEXT_LINE_HEIGHT: f32 = 20.0;
const TEXT_VIEWPORT_HEIGHT: f32 = 180.0;
const TEXT_PANEL_WIDTH: f32 = 640.0;
const TEXT_INPUT_PADDING_X: f32 = 24.0;
// Average advance of the small UI font; only used to estimate soft wraps.
const TEXT_CHAR_WIDTH: f32 = 8.0;
const PLACEHOLDER_SIZE: (u32, u32) = (640, 480);

pub fn launch_ui(app: &mut App, config: SignaConfig) -> gpui::Result<()> {
    let window_options = WindowOptions {
        titlebar: Some(TitlebarOptions {
            title: Some("Signa".into()),
            ..Default::default()
        }),
        ..Default::default()
    };

    app.open_window(window_options, move |window, app| {
        let view = app.new(|cx| AppView::new(config, window, cx));
        app.new(|cx| Root::new(view, window, cx))
    })?;

    Ok(())
}

pub(crate) struct AppView {
    controller: RecognitionController,
    video: VideoElement,
    camera_index: u32,
    #[cfg(feature = "camera-nokhwa")]
    camera_stream: Option<CameraStream>,
    camera_error: Option<String>,
    latest_image: Option<Arc<RenderImage>>,
    showing_placeholder: bool,
    last_sequence: u64,
    last_size: (u32, u32),
    text_input: Entity<InputState>,
    text_scroll: ScrollHandle,
    seen_scrolls: u64,
    follow_bottom: bool,
    last_max_offset: Pixels,
    shown_text: String,
    _subscriptions: Vec<Subscription>,
}

impl AppView {
    fn new(config: SignaConfig, window: &mut Window, cx: &mut Context<'_, Self>) -> Self {
        let video = VideoElement::new();
        let detector_config = config.detector.clone();
        let camera_index = config.camera_index;

        let mut controller = RecognitionController::new(
            config,
            Arc::new(video.clone()) as Arc<dyn VideoSource>,
            move || Ok(Box::new(OrtHandDetector::load(&detector_config)?) as _),
        );
        install_text_metrics(controller.text_mut());
        if let Err(err) = controller.start() {
            log::error!("failed to start recognition: {err:#}");
        }

        let text_input = cx.new(|cx| {
            InputState::new(window, cx)
                .auto_grow(1, 10_000)
                .placeholder("Recognized letters appear here")
        });
        let subscriptions = vec![cx.subscribe_in(&text_input, window, Self::on_text_input)];

        let mut view = Self {
            controller,
            video,
            camera_index,
            #[cfg(feature = "camera-nokhwa")]
            camera_stream: None,
            camera_error: None,
            latest_image: None,
            showing_placeholder: false,
            last_sequence: 0,
            last_size: PLACEHOLDER_SIZE,
            text_input,
            text_scroll: ScrollHandle::new(),
            seen_scrolls: 0,
            follow_bottom: false,
            last_max_offset: px(0.0),
            shown_text: String::new(),
            _subscriptions: subscriptions,
        };

        if view.controller.camera_state().is_on() {
            view.start_camera();
        }
        view
    }

    fn on_text_input(
        &mut self,
        state: &Entity<InputState>,
        event: &InputEvent,
        _window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) {
        if let InputEvent::Change { .. } = event {
            let value = state.read(cx).value().to_string();
            if value != self.shown_text {
                self.controller.edit_text(value.clone());
                self.shown_text = value;
            }
        }
    }

    fn toggle_camera(&mut self) {
        match self.controller.toggle_camera() {
            CameraState::On => self.start_camera(),
            CameraState::Off => self.stop_camera(),
        }
    }

    #[cfg(feature = "camera-nokhwa")]
    fn start_camera(&mut self) {
        self.stop_camera();
        match start_camera_stream(self.camera_index, self.video.clone()) {
            Ok(stream) => {
                self.camera_stream = Some(stream);
                self.camera_error = None;
            }
            Err(err) => {
                log::error!("failed to start camera {}: {err:?}", self.camera_index);
                self.camera_error = Some(format!("Camera unavailable: {err:#}"));
            }
        }
    }

    #[cfg(not(feature = "camera-nokhwa"))]
    fn start_camera(&mut self) {
        log::warn!("camera {} requested but camera support is disabled", self.camera_index);
        self.camera_error = Some("Built without camera support".to_string());
    }

    fn stop_camera(&mut self) {
        #[cfg(feature = "camera-nokhwa")]
        if let Some(stream) = self.camera_stream.take() {
            stream.stop();
        }
        self.video.unbind();
    }

    /// Pulls worker output into the view: text, scroll and the composited
    /// video image.
    fn sync_from_controller(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) {
        let now = Instant::now();
        let changed = self.controller.pump(now);

        if self.controller.text().text() != self.shown_text {
            let text = self.controller.text().text().to_string();
            self.shown_text = text.clone();
            self.text_input
                .update(cx, |input, cx| input.set_value(text, window, cx));
        }

        let scrolls = self.controller.text().scroll_count();
        if scrolls != self.seen_scrolls {
            self.seen_scrolls = scrolls;
            self.follow_bottom = true;
        }
        if self.follow_bottom {
            // The scroll range comes from the last layout, which can trail the
            // text by a frame. Keep pinning until it stops growing.
            let max_offset = self.text_scroll.max_offset().height;
            self.text_scroll.set_offset(point(px(0.0), -max_offset));
            self.follow_bottom = max_offset != self.last_max_offset;
            self.last_max_offset = max_offset;
        }

        if self.controller.camera_state().is_on() {
            let sequence = self.video.sequence();
            if sequence != self.last_sequence || (changed && !self.showing_placeholder) {
                self.last_sequence = sequence;
                if let Some(frame) = self.video.snapshot() {
                    self.last_size = (frame.width, frame.height);
                    if let Some(image) = render_util::frame_to_image(&frame, self.controller.overlay()) {
                        self.showing_placeholder = false;
                        self.replace_latest_image(image, window, cx);
                    }
                }
            }
        } else if !self.showing_placeholder {
            let (width, height) = self.last_size;
            if let Some(image) = render_util::placeholder_image(width, height) {
                self.showing_placeholder = true;
                self.replace_latest_image(image, window, cx);
            }
        }
    }

    fn replace_latest_image(
        &mut self,
        new_image: Arc<RenderImage>,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) {
        if let Some(old_image) = self.latest_image.replace(new_image) {
            // The sprite atlas keeps every uploaded frame until it is dropped.
            cx.drop_image(old_image, Some(window));
        }
    }

    fn status_text(&self) -> String {
        match (&self.camera_error, self.controller.status()) {
            (Some(err), _) => err.clone(),
            (None, LoopStatus::Running) if !self.controller.camera_state().is_on() => {
                "Camera off".to_string()
            }
            (None, status) => status.label().to_string(),
        }
    }
}

/// Viewport geometry of the text panel, with soft wraps estimated from the
/// panel width.
fn install_text_metrics(text: &mut TextBuffer) {
    text.set_metrics(TEXT_VIEWPORT_HEIGHT, TEXT_LINE_HEIGHT, text_columns());
}

fn text_columns() -> usize {
    ((TEXT_PANEL_WIDTH - TEXT_INPUT_PADDING_X) / TEXT_CHAR_WIDTH)
        .floor()
        .max(1.0) as usize
}

impl Render for AppView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        cx.defer_in(window, |_, _, cx| {
            cx.notify();
        });

        self.sync_from_controller(window, cx);
        self.render_main(cx)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn panel_metrics_wrap_a_single_line_of_letters() {
        let mut text = TextBuffer::new(Duration::from_millis(50));
        install_text_metrics(&mut text);

        let appended_at = Instant::now();
        for _ in 0..1000 {
            text.apply_letter("B", appended_at);
        }
        assert!(!text.text().contains('\n'));
        assert!(text.poll_scroll(appended_at + Duration::from_millis(50)));

        assert!(text.max_scroll() > 0.0);
        assert_eq!(text.scroll_top(), text.max_scroll());
        assert_eq!(text.scroll_count(), 1);
    }

    #[test]
    fn panel_fits_several_letters_per_line() {
        assert_eq!(text_columns(), 77);
    }
}
