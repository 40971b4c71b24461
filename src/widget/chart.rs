use crate::style;

use data::scale::{TimeScale, ValueScale};
use data::util;
use data::view::{self, Domains, ViewModel};

use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::theme::palette::Extended;
use iced::widget::canvas;
use iced::{
    Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector, mouse, window,
};
use iced_core::renderer::Quad;

const Y_AXIS_GUTTER: f32 = 66.0; // px
const X_AXIS_HEIGHT: f32 = 24.0;

const TEXT_SIZE: f32 = 12.0;
const FOCUS_RADIUS: f32 = 7.5;
const FOCUS_LABEL_OFFSET: f32 = 15.0;

struct State {
    plot_cache: canvas::Cache,
    y_axis_cache: canvas::Cache,
    x_axis_cache: canvas::Cache,
    focus_cache: canvas::Cache,
    last_cache_rev: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            plot_cache: canvas::Cache::new(),
            y_axis_cache: canvas::Cache::new(),
            x_axis_cache: canvas::Cache::new(),
            focus_cache: canvas::Cache::new(),
            last_cache_rev: 0,
        }
    }
}

impl State {
    fn clear_all_caches(&mut self) {
        self.plot_cache.clear();
        self.y_axis_cache.clear();
        self.x_axis_cache.clear();
        self.focus_cache.clear();
    }
}

/// Single-series time/value line chart with a hover crosshair that snaps
/// to the nearest record by date.
///
/// Pure consumer of a [`ViewModel`]: the widget derives pixel scales from
/// the (possibly mid-transition) domains it is handed and keeps no data
/// state of its own beyond geometry caches.
pub struct LineChart<'a> {
    view: &'a ViewModel,
    domains: Domains,
    stroke_width: f32,
    version: u64,
}

impl<'a> LineChart<'a> {
    pub fn new(view: &'a ViewModel, domains: Domains) -> Self {
        Self {
            view,
            domains,
            stroke_width: 3.0,
            version: 0,
        }
    }

    /// Cache revision; bump to invalidate every geometry cache.
    pub fn version(mut self, rev: u64) -> Self {
        self.version = rev;
        self
    }

    fn scales(&self, plot: Rectangle) -> (TimeScale, ValueScale) {
        let x = TimeScale::new(self.domains.x, (0.0, plot.width));
        let y = ValueScale::new(self.domains.y_max, (plot.height, 0.0));
        (x, y)
    }

    fn focus_at(&self, regions: &Regions, cursor_local: Point) -> Option<Focus> {
        if !regions.is_in_plot(cursor_local) {
            return None;
        }

        let plot = regions.plot;
        let (x_scale, y_scale) = self.scales(plot);

        let target_ms = x_scale.invert(cursor_local.x - plot.x).round() as i64;
        let record = view::nearest_by_date(&self.view.visible, target_ms)?;
        let value = record.value(self.view.metric);

        Some(Focus {
            px: x_scale.map(record.date_ms as f64),
            py: y_scale.map(value),
            label: util::format_abbrev(value),
        })
    }
}

impl<'a, M> Widget<M, Theme, Renderer> for LineChart<'a> {
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fill,
            height: Length::Fill,
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        // Column: [ Row(y_axis, plot) , x_axis ]
        let gutter_w = Y_AXIS_GUTTER;
        let x_axis_h = X_AXIS_HEIGHT;

        let row_node = layout::next_to_each_other(
            &limits.shrink(Size::new(0.0, x_axis_h)),
            0.0,
            |l| layout::atomic(l, gutter_w, Length::Fill),
            |l| {
                layout::atomic(
                    &l.shrink(Size::new(gutter_w, 0.0)),
                    Length::Fill,
                    Length::Fill,
                )
            },
        );

        let x_axis_node = layout::atomic(limits, Length::Fill, x_axis_h);

        let row_node_height = row_node.size().height;
        let total_w = row_node.size().width;
        let total_h = row_node_height + x_axis_h;

        layout::Node::with_children(
            Size::new(total_w, total_h),
            vec![
                row_node.move_to(Point::new(0.0, 0.0)),
                x_axis_node.move_to(Point::new(0.0, row_node_height)),
            ],
        )
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        _layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        if shell.is_event_captured() {
            return;
        }

        match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let state = tree.state.downcast_mut::<State>();
                state.focus_cache.clear();
            }
            Event::Window(window::Event::RedrawRequested(_)) => {
                let state = tree.state.downcast_mut::<State>();
                if state.last_cache_rev != self.version {
                    state.clear_all_caches();
                    state.last_cache_rev = self.version;
                }
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
        let regions = Regions::from_layout(layout);
        let palette = theme.extended_palette();

        renderer.with_translation(Vector::new(bounds.x, bounds.y), |r| {
            let plot_rect = regions.plot;

            let plot_geom = state.plot_cache.draw(r, plot_rect.size(), |frame| {
                self.fill_line(frame, plot_rect, palette);
            });

            let splitter_color = palette.background.strong.color.scale_alpha(0.25);
            r.fill_quad(
                Quad {
                    bounds: Rectangle {
                        x: plot_rect.x,
                        y: plot_rect.y + plot_rect.height,
                        width: plot_rect.width,
                        height: 1.0,
                    },
                    snap: true,
                    ..Default::default()
                },
                splitter_color,
            );
            r.fill_quad(
                Quad {
                    bounds: Rectangle {
                        x: plot_rect.x - 1.0,
                        y: plot_rect.y,
                        width: 1.0,
                        height: plot_rect.height,
                    },
                    snap: true,
                    ..Default::default()
                },
                splitter_color,
            );

            let y_rect = regions.y_axis;
            let y_geom = state.y_axis_cache.draw(r, y_rect.size(), |frame| {
                self.fill_y_axis_labels(frame, plot_rect, palette);
            });

            let x_rect = regions.x_axis;
            let x_geom = state.x_axis_cache.draw(r, x_rect.size(), |frame| {
                self.fill_x_axis_labels(frame, &regions, palette);
            });

            let focus_geom = state.focus_cache.draw(r, bounds.size(), |frame| {
                if let Some(focus) = cursor
                    .position_in(bounds)
                    .and_then(|local| self.focus_at(&regions, local))
                {
                    self.fill_focus(frame, &regions, &focus, palette);
                }
            });

            r.with_translation(Vector::new(plot_rect.x, plot_rect.y), |r| {
                use iced::advanced::graphics::geometry::Renderer as _;
                r.draw_geometry(plot_geom);
            });
            r.with_translation(Vector::new(y_rect.x, y_rect.y), |r| {
                use iced::advanced::graphics::geometry::Renderer as _;
                r.draw_geometry(y_geom);
            });
            r.with_translation(Vector::new(x_rect.x, x_rect.y), |r| {
                use iced::advanced::graphics::geometry::Renderer as _;
                r.draw_geometry(x_geom);
            });

            r.with_layer(
                Rectangle {
                    x: 0.0,
                    y: 0.0,
                    width: bounds.width,
                    height: bounds.height,
                },
                |r| {
                    use iced::advanced::graphics::geometry::Renderer as _;
                    r.draw_geometry(focus_geom);
                },
            );
        });
    }

    fn mouse_interaction(
        &self,
        _state: &Tree,
        layout: Layout<'_>,
        cursor: advanced::mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> advanced::mouse::Interaction {
        let regions = Regions::from_layout(layout);
        if let Some(local) = cursor.position_in(layout.bounds())
            && regions.is_in_plot(local)
            && !self.view.visible.is_empty()
        {
            advanced::mouse::Interaction::Crosshair
        } else {
            advanced::mouse::Interaction::default()
        }
    }
}

impl<'a> LineChart<'a> {
    fn fill_line(&self, frame: &mut canvas::Frame, plot: Rectangle, palette: &Extended) {
        let Some(first) = self.view.visible.first() else {
            return;
        };

        let (x_scale, y_scale) = self.scales(plot);
        let metric = self.view.metric;

        let mut builder = canvas::path::Builder::new();
        builder.move_to(Point::new(
            x_scale.map(first.date_ms as f64),
            y_scale.map(first.value(metric)),
        ));
        for record in &self.view.visible[1..] {
            builder.line_to(Point::new(
                x_scale.map(record.date_ms as f64),
                y_scale.map(record.value(metric)),
            ));
        }

        frame.stroke(
            &builder.build(),
            canvas::Stroke::default()
                .with_color(palette.secondary.strong.color)
                .with_width(self.stroke_width),
        );
    }

    fn fill_y_axis_labels(&self, frame: &mut canvas::Frame, plot: Rectangle, palette: &Extended) {
        let (_, y_scale) = self.scales(plot);
        let right_x = Y_AXIS_GUTTER - 4.0;
        let half_txt = TEXT_SIZE * 0.5;

        for tick in &self.view.y_ticks {
            let y_local = y_scale
                .map(tick.value)
                .clamp(half_txt, plot.height - half_txt);

            frame.fill_text(canvas::Text {
                content: tick.label.clone(),
                position: Point::new(right_x, y_local),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::AXIS_FONT,
                align_x: iced::Alignment::End.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }
    }

    fn fill_x_axis_labels(&self, frame: &mut canvas::Frame, regions: &Regions, palette: &Extended) {
        let plot = regions.plot;
        let (x_scale, _) = self.scales(plot);
        let plot_left = plot.x - regions.x_axis.x;
        let y_center = 2.0 + TEXT_SIZE * 0.5 + 4.0;

        for tick in &self.view.x_ticks {
            let x_local = x_scale.map(*tick as f64);
            if x_local < 0.0 || x_local > plot.width {
                continue;
            }

            frame.fill_text(canvas::Text {
                content: util::format_year(*tick),
                position: Point::new(plot_left + x_local, y_center),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::AXIS_FONT,
                align_x: iced::Alignment::Center.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }
    }

    /// Crosshair lines run from the focused point down to the time axis
    /// and left to the value axis; the marker circles the exact vertex.
    fn fill_focus(
        &self,
        frame: &mut canvas::Frame,
        regions: &Regions,
        focus: &Focus,
        palette: &Extended,
    ) {
        let plot = regions.plot;
        let fx = plot.x + focus.px;
        let fy = plot.y + focus.py;

        let stroke = style::dashed_line_from_palette(palette);

        let mut b = canvas::path::Builder::new();
        b.move_to(Point::new(fx, fy));
        b.line_to(Point::new(fx, plot.y + plot.height));
        frame.stroke(&b.build(), stroke);

        let mut b = canvas::path::Builder::new();
        b.move_to(Point::new(fx, fy));
        b.line_to(Point::new(plot.x, fy));
        frame.stroke(&b.build(), stroke);

        frame.stroke(
            &canvas::Path::circle(Point::new(fx, fy), FOCUS_RADIUS),
            canvas::Stroke::default()
                .with_color(palette.primary.base.color)
                .with_width(2.0),
        );

        frame.fill_text(canvas::Text {
            content: focus.label.clone(),
            position: Point::new(fx + FOCUS_LABEL_OFFSET, fy),
            color: palette.background.base.text,
            size: (TEXT_SIZE + 2.0).into(),
            font: style::AXIS_FONT,
            align_x: iced::Alignment::Start.into(),
            align_y: iced::Alignment::Center.into(),
            ..Default::default()
        });
    }
}

struct Focus {
    px: f32,
    py: f32,
    label: String,
}

#[derive(Debug, Clone, Copy)]
struct Regions {
    plot: Rectangle,
    x_axis: Rectangle,
    y_axis: Rectangle,
}

impl Regions {
    fn from_layout(root: Layout<'_>) -> Self {
        let root_bounds = root.bounds();

        // root.children = [ row, x_axis ]
        let row = root.child(0);
        let x_abs = root.child(1).bounds();

        // row.children = [ y_axis, plot ]
        let y_abs = row.child(0).bounds();
        let plot_abs = row.child(1).bounds();

        let to_local = |r: Rectangle| Rectangle {
            x: r.x - root_bounds.x,
            y: r.y - root_bounds.y,
            width: r.width,
            height: r.height,
        };

        Regions {
            plot: to_local(plot_abs),
            y_axis: to_local(y_abs),
            x_axis: to_local(x_abs),
        }
    }

    fn is_in_plot(&self, p: Point) -> bool {
        p.x >= self.plot.x
            && p.x <= self.plot.x + self.plot.width
            && p.y >= self.plot.y
            && p.y <= self.plot.y + self.plot.height
    }
}

impl<'a, M> From<LineChart<'a>> for Element<'a, M, Theme, Renderer>
where
    M: 'a,
{
    fn from(chart: LineChart<'a>) -> Self {
        Element::new(chart)
    }
}
