use crate::config::{ElasticConfig, SpringConfig};
use crate::error::ElasticError;
use crate::path::{ElasticPath, DEFAULT_TOLERANCE};
use crate::view::Rgba;

const DEFAULT_FILL: Rgba = [0.95, 0.95, 0.97, 1.0];

/// Inspector for the elastic view's settings. Returns true when anything
/// changed this frame.
pub fn elastic_control_panel(
    ctx: &egui::Context,
    config: &mut ElasticConfig,
    preview: Option<&ElasticPath>,
) -> bool {
    let mut changed = false;

    egui::SidePanel::right("elastic_controls")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Elastic Controls");
            ui.separator();

            changed |= ui
                .add(
                    egui::Slider::new(&mut config.overshoot_amount, 0.0..=40.0)
                        .text("Overshoot"),
                )
                .changed();

            changed |= fill_editor(ui, &mut config.fill_color);

            ui.separator();

            egui::CollapsingHeader::new("Overshoot Spring")
                .default_open(false)
                .show(ui, |ui| {
                    changed |= spring_sliders(ui, &mut config.overshoot);
                });

            egui::CollapsingHeader::new("Settle Spring")
                .default_open(false)
                .show(ui, |ui| {
                    changed |= spring_sliders(ui, &mut config.settle);
                });

            if let Some(path) = preview {
                ui.separator();
                ui.label("Outline");
                let color = config.fill_color.unwrap_or([0.5, 0.5, 0.5, 1.0]);
                preview_outline(ui, path, color);
            }

            ui.separator();

            if ui.button("Reset").clicked() {
                *config = ElasticConfig::default();
                changed = true;
            }
        });

    changed
}

// A view's fill can be replaced but never cleared, so there is no way back to `None`.
fn fill_editor(ui: &mut egui::Ui, fill: &mut Option<Rgba>) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label("Fill");
        if fill.is_none() && ui.button("Set").clicked() {
            *fill = Some(DEFAULT_FILL);
            changed = true;
        }
        if let Some(color) = fill {
            changed |= ui.color_edit_button_rgba_unmultiplied(color).changed();
        }
    });
    changed
}

fn spring_sliders(ui: &mut egui::Ui, spring: &mut SpringConfig) -> bool {
    let mut changed = false;
    changed |= ui
        .add(egui::Slider::new(&mut spring.duration, 0.05..=2.0).text("Duration"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut spring.damping, 0.05..=2.0).text("Damping"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut spring.initial_velocity, 0.0..=10.0).text("Velocity"))
        .changed();
    changed
}

fn preview_outline(ui: &mut egui::Ui, path: &ElasticPath, color: Rgba) {
    let bounds = path.control_bounds();
    let width = ui.available_width();
    let scale = if bounds.size.x > 0.0 {
        width / bounds.size.x
    } else {
        1.0
    };
    let height = bounds.size.y * scale;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());

    let origin = rect.min - egui::vec2(bounds.origin.x, bounds.origin.y) * scale;
    if let Err(err) = paint_elastic_path(ui.painter(), path, origin, scale, color) {
        log::warn!("elastic: preview skipped: {err}");
    }
}

/// Fill `path` with `color` on an egui painter. Path units are scaled by
/// `scale` and placed with their origin at `origin`.
pub fn paint_elastic_path(
    painter: &egui::Painter,
    path: &ElasticPath,
    origin: egui::Pos2,
    scale: f32,
    color: Rgba,
) -> Result<(), ElasticError> {
    let mesh = elastic_mesh(path, origin, scale, color)?;
    painter.add(egui::Shape::mesh(mesh));
    Ok(())
}

pub fn elastic_mesh(
    path: &ElasticPath,
    origin: egui::Pos2,
    scale: f32,
    color: Rgba,
) -> Result<egui::Mesh, ElasticError> {
    let shape = path.tessellate(DEFAULT_TOLERANCE / scale.max(f32::EPSILON))?;
    let color: egui::Color32 =
        egui::Rgba::from_rgba_unmultiplied(color[0], color[1], color[2], color[3]).into();

    let mut mesh = egui::Mesh::default();
    for [x, y] in &shape.vertices {
        mesh.colored_vertex(origin + egui::vec2(*x, *y) * scale, color);
    }
    for tri in shape.indices.chunks_exact(3) {
        mesh.add_triangle(tri[0], tri[1], tri[2]);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Bounds;

    #[test]
    fn mesh_is_scaled_and_placed() {
        let path = ElasticPath::rest(&Bounds::from_size(10.0, 4.0));
        let mesh = elastic_mesh(&path, egui::pos2(100.0, 50.0), 2.0, [1.0; 4]).unwrap();

        assert!(!mesh.indices.is_empty());
        let rect = mesh.calc_bounds();
        assert!((rect.min.x - 100.0).abs() < 1e-3);
        assert!((rect.min.y - 50.0).abs() < 1e-3);
        assert!((rect.max.x - 120.0).abs() < 1e-3);
        assert!((rect.max.y - 58.0).abs() < 1e-3);
    }

    fn run_panel(config: &mut ElasticConfig) -> bool {
        let ctx = egui::Context::default();
        let mut changed = false;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed |= elastic_control_panel(ctx, &mut *config, None);
        });
        changed
    }

    #[test]
    fn panel_leaves_fill_alone_without_input() {
        let mut config = ElasticConfig {
            fill_color: Some([0.2, 0.4, 0.6, 1.0]),
            ..ElasticConfig::default()
        };
        assert!(!run_panel(&mut config));
        assert_eq!(config.fill_color, Some([0.2, 0.4, 0.6, 1.0]));

        let mut unset = ElasticConfig::default();
        assert!(!run_panel(&mut unset));
        assert_eq!(unset.fill_color, None);
    }
}
