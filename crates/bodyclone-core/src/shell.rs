//! Phone shell and selector dock layout
//!
//! Pure geometry in logical pixels; the UI layer only paints what these
//! functions compute.

use serde::Serialize;

/// Axis-aligned rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.width / 2.0, self.y + self.height / 2.0]
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Linear blend toward `other`
    pub fn lerp(&self, other: &Rect, f: f32) -> Rect {
        let mix = |a: f32, b: f32| a + (b - a) * f;
        Rect::new(
            mix(self.x, other.x),
            mix(self.y, other.y),
            mix(self.width, other.width),
            mix(self.height, other.height),
        )
    }

    /// Scale around the centre
    pub fn scaled(&self, factor: f32) -> Rect {
        let [cx, cy] = self.center();
        let (w, h) = (self.width * factor, self.height * factor);
        Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }
}

/// sRGB colour
pub type Rgb = [u8; 3];

/// Colours of the shell and dock
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub page_background: Rgb,
    pub shell_background: Rgb,
    pub notch: Rgb,
    pub text: Rgb,
    pub dock_background: Rgb,
    pub dock_ring: Rgb,
    pub accent: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            page_background: [0x02, 0x06, 0x17],
            shell_background: [0x0f, 0x17, 0x2a],
            notch: [0x1e, 0x29, 0x3b],
            text: [0xe5, 0xe7, 0xeb],
            dock_background: [0x0f, 0x17, 0x2a],
            dock_ring: [0x31, 0x2e, 0x81],
            accent: [0x7c, 0x3a, 0xed],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NotchConfig {
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            top: 12.0,
            width: 120.0,
            height: 6.0,
            corner_radius: 6.0,
        }
    }
}

/// Fixed-size device frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellConfig {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub rim_width: f32,
    pub header_height: f32,
    pub title: String,
    pub title_size: f32,
    pub notch: NotchConfig,
    pub palette: Palette,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 780.0,
            corner_radius: 36.0,
            rim_width: 10.0,
            header_height: 60.0,
            title: "Digital Health Twin".to_string(),
            title_size: 17.0,
            notch: NotchConfig::default(),
            palette: Palette::default(),
        }
    }
}

/// Selector dock geometry and animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DockConfig {
    pub right_inset: f32,
    pub item_size: f32,
    pub gap: f32,
    pub corner_radius: f32,
    pub glyph_size: f32,
    /// Peak upward drift of the idle float, in pixels
    pub float_amplitude: f32,
    /// Float period of the first item, in seconds
    pub float_period: f32,
    /// Period added per item so the icons drift out of phase
    pub float_period_step: f32,
    pub hover_lift: f32,
    pub hover_scale: f32,
    /// Seconds to ease between rest and hover
    pub hover_transition: f32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            right_inset: 12.0,
            item_size: 56.0,
            gap: 14.0,
            corner_radius: 14.0,
            glyph_size: 22.0,
            float_amplitude: 6.0,
            float_period: 3.0,
            float_period_step: 0.4,
            hover_lift: 6.0,
            hover_scale: 1.06,
            hover_transition: 0.25,
        }
    }
}

impl DockConfig {
    pub fn period(&self, index: usize) -> f32 {
        self.float_period + index as f32 * self.float_period_step
    }

    /// Vertical idle offset of an item at time `t` (negative is up)
    ///
    /// Eases from rest to `-float_amplitude` at half period and back.
    pub fn float_offset(&self, index: usize, t: f32) -> f32 {
        let period = self.period(index);
        if period <= 0.0 {
            return 0.0;
        }
        let phase = t.rem_euclid(period) / period;
        -self.float_amplitude * (1.0 - (phase * std::f32::consts::TAU).cos()) / 2.0
    }

    /// Rectangle of an item after hover and idle animation
    ///
    /// `hover` is the eased hover progress: 0 floats freely, 1 is fully
    /// lifted and scaled. Values in between blend the two rects.
    pub fn animated_rect(&self, base: &Rect, index: usize, t: f32, hover: f32) -> Rect {
        let hover = hover.clamp(0.0, 1.0);
        let floating = base.translated(0.0, self.float_offset(index, t));
        let lifted = base
            .translated(0.0, -self.hover_lift)
            .scaled(self.hover_scale);
        floating.lerp(&lifted, hover)
    }
}

/// Computed shell geometry for a window size
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShellLayout {
    pub window: Rect,
    pub frame: Rect,
    pub notch: Rect,
    pub header: Rect,
    /// Area the 3D viewport renders into
    pub viewport: Rect,
    /// Resting dock item rectangles, top to bottom
    pub dock_items: Vec<Rect>,
}

impl ShellLayout {
    pub fn compute(
        shell: &ShellConfig,
        dock: &DockConfig,
        item_count: usize,
        window_width: f32,
        window_height: f32,
    ) -> Self {
        let window = Rect::new(0.0, 0.0, window_width.max(0.0), window_height.max(0.0));

        // Centre the frame; pin to the top-left when the window is too small
        let frame = Rect::new(
            ((window.width - shell.width) / 2.0).max(0.0).floor(),
            ((window.height - shell.height) / 2.0).max(0.0).floor(),
            shell.width,
            shell.height,
        );

        let notch = Rect::new(
            frame.x + (frame.width - shell.notch.width) / 2.0,
            frame.y + shell.notch.top,
            shell.notch.width,
            shell.notch.height,
        );

        let header = Rect::new(frame.x, frame.y, frame.width, shell.header_height);
        let viewport = Rect::new(
            frame.x,
            header.bottom(),
            frame.width,
            (frame.height - shell.header_height).max(0.0),
        );

        let column_height = if item_count == 0 {
            0.0
        } else {
            item_count as f32 * dock.item_size + (item_count - 1) as f32 * dock.gap
        };
        let column_top = frame.y + (frame.height - column_height) / 2.0;
        let column_x = frame.right() - dock.right_inset - dock.item_size;
        let dock_items = (0..item_count)
            .map(|i| {
                Rect::new(
                    column_x,
                    column_top + i as f32 * (dock.item_size + dock.gap),
                    dock.item_size,
                    dock.item_size,
                )
            })
            .collect();

        Self {
            window,
            frame,
            notch,
            header,
            viewport,
            dock_items,
        }
    }

    /// Index of the dock item under a point
    pub fn dock_item_at(&self, px: f32, py: f32) -> Option<usize> {
        self.dock_items.iter().position(|r| r.contains(px, py))
    }

    /// Whether pointer input at this point belongs to the 3D viewport
    pub fn accepts_pointer(&self, px: f32, py: f32) -> bool {
        self.viewport.contains(px, py) && self.dock_item_at(px, py).is_none()
    }

    /// Viewport in physical pixels, clipped to the window
    pub fn physical_viewport(&self, scale_factor: f32) -> Option<([u32; 2], [u32; 2])> {
        let x0 = self.viewport.x.max(0.0);
        let y0 = self.viewport.y.max(0.0);
        let x1 = self.viewport.right().min(self.window.right());
        let y1 = self.viewport.bottom().min(self.window.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let position = [(x0 * scale_factor).round() as u32, (y0 * scale_factor).round() as u32];
        let size = [
            ((x1 - x0) * scale_factor).round().max(1.0) as u32,
            ((y1 - y0) * scale_factor).round().max(1.0) as u32,
        ];
        Some((position, size))
    }
}
