use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::{Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, mouse};
use iced_core::renderer::Quad;

const HEIGHT: f32 = 24.0;
const RAIL_HEIGHT: f32 = 4.0;
const HANDLE_SIZE: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handle {
    Lower,
    Upper,
}

#[derive(Default)]
struct State {
    dragging: Option<Handle>,
}

/// Dual-handle slider over an inclusive integer interval, snapping to a
/// fixed step. Emits `(start, end)` on every drag tick; the handles
/// cannot cross, so emitted pairs are always ordered.
pub struct RangeSlider<'a, M> {
    bounds: (i64, i64),
    value: (i64, i64),
    step: i64,
    on_change: Box<dyn Fn(i64, i64) -> M + 'a>,
}

impl<'a, M> RangeSlider<'a, M> {
    pub fn new(
        bounds: (i64, i64),
        value: (i64, i64),
        step: i64,
        on_change: impl Fn(i64, i64) -> M + 'a,
    ) -> Self {
        Self {
            bounds,
            value: (
                value.0.clamp(bounds.0, bounds.1),
                value.1.clamp(bounds.0, bounds.1),
            ),
            step: step.max(1),
            on_change: Box::new(on_change),
        }
    }

    fn span(&self) -> f64 {
        ((self.bounds.1 - self.bounds.0) as f64).max(1.0)
    }

    fn value_to_x(&self, value: i64, width: f32) -> f32 {
        let t = (value - self.bounds.0) as f64 / self.span();
        t as f32 * width
    }

    fn x_to_value(&self, x: f32, width: f32) -> i64 {
        let t = (x / width.max(1.0)).clamp(0.0, 1.0) as f64;
        let raw = self.bounds.0 as f64 + t * self.span();
        let stepped =
            self.bounds.0 + ((raw - self.bounds.0 as f64) / self.step as f64).round() as i64 * self.step;
        stepped.clamp(self.bounds.0, self.bounds.1)
    }

    fn handle_positions(&self, bounds: Rectangle) -> (Point, Point) {
        let cy = bounds.y + bounds.height * 0.5;
        (
            Point::new(bounds.x + self.value_to_x(self.value.0, bounds.width), cy),
            Point::new(bounds.x + self.value_to_x(self.value.1, bounds.width), cy),
        )
    }

    fn nearest_handle(&self, bounds: Rectangle, cursor: Point) -> Handle {
        let (lower, upper) = self.handle_positions(bounds);
        let d_lower = (cursor.x - lower.x).abs();
        let d_upper = (cursor.x - upper.x).abs();

        // Right bias on overlap, so a fully collapsed pair can reopen.
        if d_upper <= d_lower {
            Handle::Upper
        } else {
            Handle::Lower
        }
    }

    fn dragged(&self, handle: Handle, bounds: Rectangle, cursor_x: f32) -> (i64, i64) {
        let picked = self.x_to_value(cursor_x - bounds.x, bounds.width);
        match handle {
            Handle::Lower => (picked.min(self.value.1), self.value.1),
            Handle::Upper => (self.value.0, picked.max(self.value.0)),
        }
    }
}

impl<'a, M> Widget<M, Theme, Renderer> for RangeSlider<'a, M> {
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fill,
            height: Length::Fixed(HEIGHT),
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::atomic(limits, Length::Fill, HEIGHT)
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        if shell.is_event_captured() {
            return;
        }

        let Event::Mouse(mouse_event) = event else {
            return;
        };

        let state = tree.state.downcast_mut::<State>();
        let bounds = layout.bounds();

        match mouse_event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let Some(cursor_pos) = cursor.position_over(bounds) else {
                    return;
                };

                let handle = self.nearest_handle(bounds, cursor_pos);
                state.dragging = Some(handle);

                let (start, end) = self.dragged(handle, bounds, cursor_pos.x);
                if (start, end) != self.value {
                    shell.publish((self.on_change)(start, end));
                }
                shell.capture_event();
            }
            mouse::Event::CursorMoved { .. } => {
                let Some(handle) = state.dragging else {
                    return;
                };
                let Some(cursor_pos) = cursor.position() else {
                    return;
                };

                let (start, end) = self.dragged(handle, bounds, cursor_pos.x);
                if (start, end) != self.value {
                    shell.publish((self.on_change)(start, end));
                }
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                state.dragging = None;
            }
            _ => {}
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use advanced::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let bounds = layout.bounds();
        let palette = theme.extended_palette();

        let (lower, upper) = self.handle_positions(bounds);
        let rail_y = bounds.y + (bounds.height - RAIL_HEIGHT) * 0.5;

        renderer.fill_quad(
            Quad {
                bounds: Rectangle {
                    x: bounds.x,
                    y: rail_y,
                    width: bounds.width,
                    height: RAIL_HEIGHT,
                },
                border: iced::border::rounded(RAIL_HEIGHT * 0.5),
                snap: true,
                ..Default::default()
            },
            palette.background.strong.color,
        );

        renderer.fill_quad(
            Quad {
                bounds: Rectangle {
                    x: lower.x,
                    y: rail_y,
                    width: (upper.x - lower.x).max(0.0),
                    height: RAIL_HEIGHT,
                },
                snap: true,
                ..Default::default()
            },
            palette.primary.base.color,
        );

        let hovered = cursor.position_over(bounds).is_some() || state.dragging.is_some();
        let handle_color = if hovered {
            palette.primary.strong.color
        } else {
            palette.primary.base.color
        };

        for center in [lower, upper] {
            renderer.fill_quad(
                Quad {
                    bounds: Rectangle {
                        x: center.x - HANDLE_SIZE * 0.5,
                        y: center.y - HANDLE_SIZE * 0.5,
                        width: HANDLE_SIZE,
                        height: HANDLE_SIZE,
                    },
                    border: iced::border::rounded(HANDLE_SIZE * 0.5),
                    snap: true,
                    ..Default::default()
                },
                handle_color,
            );
        }
    }

    fn mouse_interaction(
        &self,
        state: &Tree,
        layout: Layout<'_>,
        cursor: advanced::mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> advanced::mouse::Interaction {
        let state = state.state.downcast_ref::<State>();
        if state.dragging.is_some() {
            advanced::mouse::Interaction::Grabbing
        } else if cursor.position_over(layout.bounds()).is_some() {
            advanced::mouse::Interaction::Grab
        } else {
            advanced::mouse::Interaction::default()
        }
    }
}

impl<'a, M> From<RangeSlider<'a, M>> for Element<'a, M, Theme, Renderer>
where
    M: 'a,
{
    fn from(slider: RangeSlider<'a, M>) -> Self {
        Element::new(slider)
    }
}
