//! Replays panel draw commands onto an egui painter.
//!
//! The panel core describes each frame as plain data; this module is
//! the only place that turns those commands into egui shapes, so the
//! core stays free of any rendering types.

use egui::{Align2, Color32, FontId, Pos2, Stroke, StrokeKind, Ui};

use super::widgets::{draw_placeholder_caption, draw_texture_aspect_fit};
use crate::panel::draw::{palette, Align, Color, DrawCmd};
use crate::panel::Rect;

/// Textures available for the backdrop this frame. `live` is the most
/// recent camera frame; `placeholder` is the static fallback bitmap.
pub struct Backdrop {
    pub live: Option<(egui::TextureId, f32)>,
    pub placeholder: Option<(egui::TextureId, f32)>,
}

pub fn paint_scene(ui: &Ui, origin: Pos2, commands: &[DrawCmd], backdrop: &Backdrop) {
    let painter = ui.painter();
    for command in commands {
        match command {
            DrawCmd::Backdrop { rect } => {
                let rect = to_egui_rect(origin, *rect);
                painter.rect_filled(rect, 0.0, to_color32(palette::BACKGROUND));
                match backdrop.live {
                    Some((texture_id, aspect)) => {
                        draw_texture_aspect_fit(ui, texture_id, rect, aspect);
                    }
                    None => {
                        if let Some((texture_id, aspect)) = backdrop.placeholder {
                            draw_texture_aspect_fit(ui, texture_id, rect, aspect);
                        }
                        draw_placeholder_caption(
                            ui,
                            rect,
                            "Webcam Unavailable",
                            "(Showing placeholder)",
                        );
                    }
                }
            }
            DrawCmd::Fill { rect, color } => {
                painter.rect_filled(to_egui_rect(origin, *rect), 0.0, to_color32(*color));
            }
            DrawCmd::Stroke { rect, color, width } => {
                painter.rect_stroke(
                    to_egui_rect(origin, *rect),
                    0.0,
                    Stroke::new(*width, to_color32(*color)),
                    StrokeKind::Middle,
                );
            }
            DrawCmd::Line {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_pos2(origin, *from), to_pos2(origin, *to)],
                    Stroke::new(*width, to_color32(*color)),
                );
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(to_pos2(origin, *center), *radius, to_color32(*color));
            }
            DrawCmd::Triangle { points, color } => {
                let points = points.iter().map(|p| to_pos2(origin, *p)).collect();
                painter.add(egui::Shape::convex_polygon(
                    points,
                    to_color32(*color),
                    Stroke::NONE,
                ));
            }
            DrawCmd::Text {
                pos,
                text,
                size,
                color,
                align,
            } => {
                painter.text(
                    to_pos2(origin, *pos),
                    to_anchor(*align),
                    text,
                    FontId::proportional(*size),
                    to_color32(*color),
                );
            }
        }
    }
}

fn to_egui_rect(origin: Pos2, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(origin.x + rect.x, origin.y + rect.y),
        egui::vec2(rect.w, rect.h),
    )
}

fn to_pos2(origin: Pos2, point: (f32, f32)) -> Pos2 {
    egui::pos2(origin.x + point.0, origin.y + point.1)
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn to_anchor(align: Align) -> Align2 {
    match align {
        Align::Left => Align2::LEFT_CENTER,
        Align::Center => Align2::CENTER_CENTER,
        Align::Right => Align2::RIGHT_CENTER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_translation() {
        let rect = to_egui_rect(egui::pos2(10.0, 20.0), Rect::new(5.0, 5.0, 100.0, 50.0));
        assert_eq!(rect.min, egui::pos2(15.0, 25.0));
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 50.0);
    }

    #[test]
    fn test_color_conversion_keeps_alpha() {
        let color = to_color32(Color::rgba(10, 20, 30, 48));
        assert_eq!(color.a(), 48);
    }

    #[test]
    fn test_anchor_mapping() {
        assert_eq!(to_anchor(Align::Left), Align2::LEFT_CENTER);
        assert_eq!(to_anchor(Align::Center), Align2::CENTER_CENTER);
        assert_eq!(to_anchor(Align::Right), Align2::RIGHT_CENTER);
    }
}
