use super::{
    ActiveTheme, AnyElement, AppView, Button, ButtonVariants, Context, Input, InteractiveElement,
    IntoElement, ObjectFit, ParentElement, SharedString, StatefulInteractiveElement, Styled,
    StyledExt, StyledImage, TEXT_PANEL_WIDTH, TEXT_VIEWPORT_HEIGHT, div, h_flex, img, px, v_flex,
};

const CAMERA_WIDTH: f32 = 640.0;
const DEFAULT_CAMERA_RATIO: f32 = 4.0 / 3.0;

impl AppView {
    pub(super) fn render_main(&mut self, cx: &mut Context<'_, Self>) -> AnyElement {
        let (width, height) = self.last_size;
        let ratio = if height > 0 {
            width as f32 / height as f32
        } else {
            DEFAULT_CAMERA_RATIO
        };
        let camera_height = CAMERA_WIDTH / ratio;

        let frame_view: AnyElement = match &self.latest_image {
            Some(image) => img(image.clone())
                .size_full()
                .object_fit(ObjectFit::Contain)
                .into_any_element(),
            None => div()
                .size_full()
                .flex()
                .items_center()
                .justify_center()
                .text_sm()
                .text_color(gpui::rgb(0x8b95a5))
                .child("Waiting for camera...")
                .into_any_element(),
        };

        let camera_shell = div()
            .w(px(CAMERA_WIDTH))
            .h(px(camera_height))
            .overflow_hidden()
            .rounded_lg()
            .bg(gpui::rgb(0x000000))
            .child(frame_view);

        let camera_state = self.controller.camera_state();
        let toggle_label = if camera_state.is_on() {
            "Turn camera off"
        } else {
            "Turn camera on"
        };

        let theme = cx.theme();
        let status_color = if self.camera_error.is_some() {
            theme.danger
        } else {
            theme.muted_foreground
        };

        let controls = h_flex()
            .w(px(CAMERA_WIDTH))
            .justify_between()
            .items_center()
            .child(
                div()
                    .text_xs()
                    .text_color(status_color)
                    .child(self.status_text()),
            )
            .child(
                Button::new(SharedString::from("camera-toggle"))
                    .outline()
                    .label(toggle_label)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.toggle_camera();
                        cx.notify();
                    })),
            );

        let text_panel = v_flex()
            .w(px(TEXT_PANEL_WIDTH))
            .gap_1()
            .child(
                div()
                    .text_sm()
                    .font_semibold()
                    .text_color(gpui::rgb(0xe2e8f0))
                    .child("Text"),
            )
            .child(
                div()
                    .id("text-scroll")
                    .h(px(TEXT_VIEWPORT_HEIGHT))
                    .overflow_y_scroll()
                    .track_scroll(&self.text_scroll)
                    .rounded_lg()
                    .bg(gpui::rgb(0x0f1419))
                    .child(Input::new(&self.text_input)),
            );

        v_flex()
            .size_full()
            .items_center()
            .gap_3()
            .p_4()
            .bg(gpui::rgb(0x1a2332))
            .child(camera_shell)
            .child(controls)
            .child(text_panel)
            .into_any_element()
    }
}
