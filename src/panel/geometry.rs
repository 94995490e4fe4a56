//! Per-frame widget geometry.
//!
//! `layout` rebuilds the whole widget map from the current state and
//! surface size every frame. The paint path and the input dispatcher
//! both consume the same `FrameGeometry` instance, so what is drawn and
//! what is hit-tested can never be out of phase.

use crate::panel::state::{Page, PanelState};

/// Smallest canvas dimension the layout rules will run against.
pub const MIN_CANVAS: f32 = 100.0;
/// Height of the chrome strip holding page buttons and the info readout.
pub const BOTTOM_BAR_H: f32 = 96.0;
/// Scrollbar thumb height.
pub const THUMB_H: f32 = 50.0;

const SCROLL_TOP_FRAC: f32 = 0.25;
const SCROLL_BOTTOM_FRAC: f32 = 0.90;
const SCROLL_INSET_X: f32 = 40.0;
const SCROLL_HIT_HALF_W: f32 = 20.0;

const BUTTON_W: f32 = 140.0;
const BUTTON_H: f32 = 50.0;
const CAMERA_BUTTON_FRAC: f32 = 0.88;

const SPINBOX_W: f32 = 320.0;
const SPINBOX_H: f32 = 180.0;
const SPINBOX_GAP: f32 = 100.0;
const SPINBOX_COLUMN_W: f32 = 60.0;
const ALARM_PANEL_TOP_FRAC: f32 = 0.25;
const ALARM_PANEL_HEIGHT_FRAC: f32 = 0.55;
const SPINBOX_DROP: f32 = 90.0;

const PAGE_BUTTON_W: f32 = 120.0;
const PAGE_BUTTON_H: f32 = 56.0;
const PAGE_BUTTON_GAP: f32 = 8.0;

/// Axis-aligned rectangle in surface pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive on every edge. Regions that share an edge are resolved
    /// by the map's priority order.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Every interactive region the panel can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetId {
    CameraButton,
    HourUp,
    HourDown,
    MinuteUp,
    MinuteDown,
    DoneButton,
    PageButton(Page),
    BrightnessBar,
    VolumeBar,
}

/// Vertical metrics of one scrollbar track. Thumb placement and drag
/// inversion both read these, keeping the two in agreement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Track centerline x.
    pub x: f32,
    pub top: f32,
    pub height: f32,
}

impl Track {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Top edge of the thumb: value 100 puts it at the track top,
    /// value 0 rests it on the track bottom.
    pub fn thumb_top(&self, value: i32) -> f32 {
        self.top + (self.height - THUMB_H) * (1.0 - value as f32 / 100.0)
    }
}

/// The widget map for one frame. Regions are ordered: page-specific
/// action buttons first, then page buttons, then the scrollbar bands,
/// and `hit` returns the first match, so buttons shadow the bars.
#[derive(Debug, Clone)]
pub struct FrameGeometry {
    regions: Vec<(WidgetId, Rect)>,
    /// The camera/overlay area above the bottom bar.
    pub content: Rect,
    pub bottom_bar: Rect,
    pub brightness_track: Track,
    pub volume_track: Track,
    /// Alarm-page spinbox display panels, present on that page only.
    pub hour_box: Option<Rect>,
    pub minute_box: Option<Rect>,
}

impl FrameGeometry {
    pub fn rect(&self, id: WidgetId) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(region, _)| *region == id)
            .map(|(_, rect)| *rect)
    }

    /// First region containing the point, in priority order.
    pub fn hit(&self, x: f32, y: f32) -> Option<WidgetId> {
        self.regions
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(WidgetId, Rect)> {
        self.regions.iter()
    }

    /// Track metrics for a scrollbar region, if `id` names one.
    pub fn track(&self, id: WidgetId) -> Option<&Track> {
        match id {
            WidgetId::BrightnessBar => Some(&self.brightness_track),
            WidgetId::VolumeBar => Some(&self.volume_track),
            _ => None,
        }
    }
}

/// Builds the widget map for the current page. Pure in its inputs: the
/// same state and surface size always produce the same regions.
pub fn layout(state: &PanelState, width: f32, height: f32) -> FrameGeometry {
    let cw = width.max(MIN_CANVAS);
    let ch = (height - BOTTOM_BAR_H).max(MIN_CANVAS);

    let content = Rect::new(0.0, 0.0, cw, ch);
    let bottom_bar = Rect::new(0.0, ch, cw, BOTTOM_BAR_H);

    let scroll_top = ch * SCROLL_TOP_FRAC;
    let scroll_bottom = ch * SCROLL_BOTTOM_FRAC;
    let brightness_track = Track {
        x: SCROLL_INSET_X,
        top: scroll_top,
        height: scroll_bottom - scroll_top,
    };
    let volume_track = Track {
        x: cw - SCROLL_INSET_X,
        top: scroll_top,
        height: scroll_bottom - scroll_top,
    };

    let mut regions = Vec::with_capacity(12);
    let mut hour_box = None;
    let mut minute_box = None;

    match state.current_page {
        Page::Camera => {
            regions.push((
                WidgetId::CameraButton,
                Rect::new(
                    cw / 2.0 - BUTTON_W / 2.0,
                    ch * CAMERA_BUTTON_FRAC,
                    BUTTON_W,
                    BUTTON_H,
                ),
            ));
        }
        Page::Alarm => {
            let panel_top = ch * ALARM_PANEL_TOP_FRAC;
            let panel_bottom = panel_top + ch * ALARM_PANEL_HEIGHT_FRAC;
            let box_top = panel_top + SPINBOX_DROP;

            let hours = Rect::new(
                cw / 2.0 - SPINBOX_W - SPINBOX_GAP / 2.0,
                box_top,
                SPINBOX_W,
                SPINBOX_H,
            );
            let minutes = Rect::new(cw / 2.0 + SPINBOX_GAP / 2.0, box_top, SPINBOX_W, SPINBOX_H);

            let (hour_up, hour_down) = spin_zones(hours);
            let (minute_up, minute_down) = spin_zones(minutes);
            regions.push((WidgetId::HourUp, hour_up));
            regions.push((WidgetId::HourDown, hour_down));
            regions.push((WidgetId::MinuteUp, minute_up));
            regions.push((WidgetId::MinuteDown, minute_down));

            // Kept on-canvas at short window heights.
            let done_y = (panel_bottom + 80.0).min(ch - BUTTON_H - 12.0);
            regions.push((
                WidgetId::DoneButton,
                Rect::new(cw - 200.0, done_y, BUTTON_W, BUTTON_H),
            ));

            hour_box = Some(hours);
            minute_box = Some(minutes);
        }
        Page::Video => {}
    }

    for (i, page) in Page::ALL.iter().enumerate() {
        let x = 20.0 + i as f32 * (PAGE_BUTTON_W + PAGE_BUTTON_GAP);
        let y = ch + (BOTTOM_BAR_H - PAGE_BUTTON_H) / 2.0;
        regions.push((
            WidgetId::PageButton(*page),
            Rect::new(x, y, PAGE_BUTTON_W, PAGE_BUTTON_H),
        ));
    }

    regions.push((WidgetId::BrightnessBar, band_rect(&brightness_track)));
    regions.push((WidgetId::VolumeBar, band_rect(&volume_track)));

    FrameGeometry {
        regions,
        content,
        bottom_bar,
        brightness_track,
        volume_track,
        hour_box,
        minute_box,
    }
}

/// Up/down zones: the right 60 px of a spinbox panel, split at its
/// vertical midpoint.
fn spin_zones(panel: Rect) -> (Rect, Rect) {
    let column_x = panel.right() - SPINBOX_COLUMN_W;
    let half = panel.h / 2.0;
    let up = Rect::new(column_x, panel.y, SPINBOX_COLUMN_W, half);
    let down = Rect::new(column_x, panel.y + half, SPINBOX_COLUMN_W, half);
    (up, down)
}

/// Pointer band for a track: full vertical span, ±20 px around the
/// centerline.
fn band_rect(track: &Track) -> Rect {
    Rect::new(
        track.x - SCROLL_HIT_HALF_W,
        track.top,
        SCROLL_HIT_HALF_W * 2.0,
        track.height,
    )
}
