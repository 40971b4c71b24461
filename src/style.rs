use iced::Font;
use iced::theme::palette::Extended;
use iced::widget::canvas;

/// Axis and tooltip labels render in the monospace UI font.
pub const AXIS_FONT: Font = Font::MONOSPACE;

pub fn dashed_line_from_palette(palette: &Extended) -> canvas::Stroke<'static> {
    canvas::Stroke {
        style: canvas::stroke::Style::Solid(palette.background.strong.color.scale_alpha(0.8)),
        width: 1.0,
        line_dash: canvas::LineDash {
            segments: &[4.0, 4.0],
            offset: 8,
        },
        ..canvas::Stroke::default()
    }
}
