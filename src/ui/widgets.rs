//! Texture painting helpers.

use egui::Ui;

/// Full UV rect (0,0) to (1,1) for rendering the entire texture.
pub const FULL_UV: egui::Rect = egui::Rect {
    min: egui::pos2(0.0, 0.0),
    max: egui::pos2(1.0, 1.0),
};

/// Draw a texture filling a rect with full UVs.
pub fn draw_texture(ui: &Ui, texture_id: egui::TextureId, rect: egui::Rect) {
    ui.painter()
        .image(texture_id, rect, FULL_UV, egui::Color32::WHITE);
}

/// Rect that fits `texture_aspect` inside `available`, centered, with
/// letterbox or pillarbox bars as needed.
pub fn aspect_fit_rect(available: egui::Rect, texture_aspect: f32) -> egui::Rect {
    let available_aspect = available.width() / available.height();

    if texture_aspect > available_aspect {
        // Texture is wider - fit width, center vertically
        let height = available.width() / texture_aspect;
        let y_offset = (available.height() - height) / 2.0;
        egui::Rect::from_min_size(
            egui::pos2(available.left(), available.top() + y_offset),
            egui::vec2(available.width(), height),
        )
    } else {
        let width = available.height() * texture_aspect;
        let x_offset = (available.width() - width) / 2.0;
        egui::Rect::from_min_size(
            egui::pos2(available.left() + x_offset, available.top()),
            egui::vec2(width, available.height()),
        )
    }
}

/// Draw a texture with aspect-ratio preservation (letterbox/pillarbox).
/// Returns the actual rect where the texture was drawn.
pub fn draw_texture_aspect_fit(
    ui: &Ui,
    texture_id: egui::TextureId,
    available: egui::Rect,
    texture_aspect: f32,
) -> egui::Rect {
    let image_rect = aspect_fit_rect(available, texture_aspect);
    draw_texture(ui, texture_id, image_rect);
    image_rect
}

/// Caption layered over the fallback backdrop when no camera frame is
/// available.
pub fn draw_placeholder_caption(ui: &Ui, rect: egui::Rect, message: &str, detail: &str) {
    let painter = ui.painter();
    painter.text(
        rect.center() - egui::vec2(0.0, 16.0),
        egui::Align2::CENTER_CENTER,
        message,
        egui::FontId::proportional(24.0),
        egui::Color32::WHITE,
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 16.0),
        egui::Align2::CENTER_CENTER,
        detail,
        egui::FontId::proportional(16.0),
        egui::Color32::from_gray(160),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(w, h))
    }

    #[test]
    fn test_wide_texture_letterboxes() {
        let fit = aspect_fit_rect(rect(400.0, 400.0), 2.0);
        assert_eq!(fit.width(), 400.0);
        assert_eq!(fit.height(), 200.0);
        assert_eq!(fit.top(), 100.0);
    }

    #[test]
    fn test_tall_texture_pillarboxes() {
        let fit = aspect_fit_rect(rect(400.0, 400.0), 0.5);
        assert_eq!(fit.height(), 400.0);
        assert_eq!(fit.width(), 200.0);
        assert_eq!(fit.left(), 100.0);
    }

    #[test]
    fn test_matching_aspect_fills() {
        let fit = aspect_fit_rect(rect(640.0, 360.0), 16.0 / 9.0);
        assert!((fit.width() - 640.0).abs() < 0.5);
        assert!((fit.height() - 360.0).abs() < 0.5);
    }
}
