use crate::canvas::{Brush, Canvas, FillOp, Point};
use crate::color::{BlobState, Rgba};
use crate::config::{BlobConfig, Presentation};

/// [`Canvas`] drawing into an egui painter.
///
/// Paths are flattened and fanned out from their centroid, which suits the
/// star-shaped blob and eye outlines. Radial gradients are approximated by
/// splitting the fan into concentric bands with per-vertex colors.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    pub cubic_steps: usize,
    pub gradient_bands: usize,
}

impl<'a> EguiCanvas<'a> {
    /// Blob coordinates are relative to `origin` (usually the top-left of the
    /// area the blob is drawn in).
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self {
            painter,
            origin,
            cubic_steps: 16,
            gradient_bands: 12,
        }
    }
}

impl Canvas for EguiCanvas<'_> {
    fn fill(&mut self, op: FillOp) {
        let mesh = fill_mesh(&op, self.origin, self.cubic_steps, self.gradient_bands);
        if !mesh.is_empty() {
            self.painter.add(egui::Shape::mesh(mesh));
        }
    }
}

fn to_color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Triangulate one fill into an egui mesh.
pub fn fill_mesh(op: &FillOp, origin: egui::Pos2, cubic_steps: usize, bands: usize) -> egui::Mesh {
    let mut mesh = egui::Mesh::default();
    let outline = op.path.flatten(cubic_steps);
    let n = outline.len();
    if n < 3 {
        return mesh;
    }

    let (sx, sy) = outline.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let hub = Point::new(sx / n as f32, sy / n as f32);
    let bands = match op.brush {
        Brush::Solid(_) => 1,
        Brush::Radial(_) => bands.max(1),
    };
    let color_at = |p: Point| match &op.brush {
        Brush::Solid(c) => to_color32(*c),
        Brush::Radial(g) => to_color32(g.color_at(p)),
    };
    let pos = |p: Point| egui::pos2(origin.x + p.x, origin.y + p.y);

    mesh.colored_vertex(pos(hub), color_at(hub));
    for band in 1..=bands {
        let t = band as f32 / bands as f32;
        for p in &outline {
            let q = hub.lerp(*p, t);
            mesh.colored_vertex(pos(q), color_at(q));
        }
    }

    let idx = |band: usize, i: usize| (1 + (band - 1) * n + i % n) as u32;
    for i in 0..n {
        mesh.add_triangle(0, idx(1, i), idx(1, i + 1));
        for band in 2..=bands {
            let (a, b) = (idx(band - 1, i), idx(band - 1, i + 1));
            let (c, d) = (idx(band, i), idx(band, i + 1));
            mesh.add_triangle(a, c, d);
            mesh.add_triangle(a, d, b);
        }
    }
    mesh
}

/// What the user did in the control panel this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelResponse {
    pub requested_state: Option<BlobState>,
    /// The config was edited; rebuild the renderer from it.
    pub config_changed: bool,
}

pub fn blob_control_panel(
    ctx: &egui::Context,
    config: &mut BlobConfig,
    presentation: Presentation,
    current: BlobState,
) -> PanelResponse {
    let mut response = PanelResponse::default();

    egui::SidePanel::right("blob_controls")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Blob Controls");
            ui.separator();

            ui.horizontal_wrapped(|ui| {
                for state in BlobState::ALL {
                    if ui.selectable_label(current == state, state.name()).clicked() {
                        response.requested_state = Some(state);
                    }
                }
            });

            ui.separator();

            let mut changed = false;
            egui::CollapsingHeader::new("Shape")
                .default_open(false)
                .show(ui, |ui| {
                    let c = &mut config.contour;
                    changed |= slider(ui, &mut c.deformation_intensity, 0.0..=100.0, "Deformation");
                    changed |= slider(ui, &mut c.chaos_amplitude, 0.0..=30.0, "Chaos");
                    changed |= slider(ui, &mut c.lean_strength, 0.0..=80.0, "Lean Strength");
                });

            egui::CollapsingHeader::new("Eyes")
                .default_open(false)
                .show(ui, |ui| {
                    let e = &mut config.eyes;
                    changed |= slider(ui, &mut e.rotation_deg, 0.0..=90.0, "Tilt");
                    changed |= slider(ui, &mut e.spacing_ratio, 0.05..=0.4, "Spacing");
                    let breathing = &mut e.breathing_amplitude_ratio;
                    changed |= slider(ui, breathing, 0.0..=0.03, "Breathing");
                    ui.horizontal(|ui| {
                        ui.label("Color");
                        changed |= color_edit_rgba(ui, &mut e.color);
                    });
                });

            ui.separator();

            if ui.button("Reset").clicked() {
                reset_config(config, presentation);
                changed = true;
            }

            response.config_changed = changed;
        });

    response
}

/// Back to the preset for `presentation`, keeping the noise seed so the blob
/// keeps its shape.
pub fn reset_config(config: &mut BlobConfig, presentation: Presentation) {
    let seed = config.noise_seed;
    *config = BlobConfig::for_presentation(presentation);
    config.noise_seed = seed;
}

fn slider(
    ui: &mut egui::Ui,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    label: &str,
) -> bool {
    ui.add(egui::Slider::new(value, range).text(label)).changed()
}

fn color_edit_rgba(ui: &mut egui::Ui, color: &mut Rgba) -> bool {
    let mut rgba = to_color32(*color);
    if ui.color_edit_button_srgba(&mut rgba).changed() {
        let [r, g, b, a] = rgba.to_srgba_unmultiplied();
        *color = Rgba::new(r, g, b, a);
        return true;
    }
    false
}
