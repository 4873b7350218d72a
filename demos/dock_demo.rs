#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use dockspace::{
    Context, DockBuilder, DockPosition, DrawList, EguiTextMeasure, Panel, PanelId,
    SplitDirection, paint_with_egui,
};
use eframe::egui;

struct App {
    dock: Context,
    panels: Vec<PanelId>,
    frame: DrawList,
    closed: Vec<PanelId>,
}

const TITLES: [(&str, bool); 6] = [
    ("Scene", false),
    ("Game", false),
    ("Hierarchy", true),
    ("Inspector", true),
    ("Console", true),
    ("Project", true),
];

impl App {
    fn new() -> Self {
        let mut dock = Context::new(1200.0, 800.0);
        let panels = TITLES
            .iter()
            .map(|&(title, closable)| dock.create_panel(Panel::new(title).closable(closable)))
            .collect();
        let mut app = Self {
            dock,
            panels,
            frame: DrawList::default(),
            closed: Vec::new(),
        };
        app.reset_layout();
        app
    }

    // +-----------+-----------------+-----------+
    // | Hierarchy |   Scene, Game   | Inspector |
    // |           +-----------------+           |
    // |           | Console,Project |           |
    // +-----------+-----------------+-----------+
    fn reset_layout(&mut self) {
        let &[scene, game, hierarchy, inspector, console, project] = self.panels.as_slice() else {
            return;
        };

        let mut b = DockBuilder::new();
        let (inspector_id, rest) = b.split_node_fixed(b.root(), SplitDirection::Right, 260.0);
        let (hierarchy_id, center) = b.split_node_fixed(rest, SplitDirection::Left, 240.0);
        let (bottom_id, documents) = b.split_node(center, SplitDirection::Down, 0.3);
        b.dock_panels([scene, game], documents);
        b.dock_panel(hierarchy, hierarchy_id);
        b.dock_panel(inspector, inspector_id);
        b.dock_panels([console, project], bottom_id);

        self.dock.set_layout(b.finish());
        self.closed.clear();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Reset layout").clicked() {
                    self.reset_layout();
                }
                for &panel in &self.closed.clone() {
                    let title = self.dock.panel(panel).map_or("?", Panel::title).to_owned();
                    if ui.button(format!("Reopen {title}")).clicked() {
                        self.closed.retain(|&p| p != panel);
                        self.dock.add(panel, None, DockPosition::Center);
                    }
                }
                ui.label(self.dock.manager().describe());
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.dock.on_resize(rect.width(), rect.height());

                let (pos, pressed, released) = ctx.input(|i| {
                    (
                        i.pointer.latest_pos(),
                        i.pointer.primary_pressed(),
                        i.pointer.primary_released(),
                    )
                });
                // The central panel starts at the window origin, like the dock viewport.
                if let Some(pos) = pos {
                    self.dock.on_mouse_move(pos.x, pos.y);
                }
                if pressed {
                    self.dock.on_mouse_button_down(0);
                }
                if released {
                    self.dock.on_mouse_button_up(0);
                }

                let painter = ui.painter().clone();
                let font_id = egui::TextStyle::Body.resolve(ui.style());
                let measure = EguiTextMeasure {
                    painter: &painter,
                    font_id: font_id.clone(),
                };
                if let Some(list) = self.dock.render(&measure) {
                    self.frame.clone_from(list);
                }

                let dock = &self.dock;
                paint_with_egui(&painter, &self.frame, &font_id, |painter, panel, rect| {
                    let title = dock.panel(panel).map_or("", Panel::title);
                    painter.text(
                        rect.left_top() + egui::vec2(8.0, 8.0),
                        egui::Align2::LEFT_TOP,
                        format!("{title} content"),
                        font_id.clone(),
                        egui::Color32::GRAY,
                    );
                });
            });

        let closed = self.dock.take_closed_panels();
        if !closed.is_empty() {
            log::info!("closed {closed:?}");
            self.closed.extend(closed);
        }
        if self.dock.manager().is_interacting() {
            ctx.request_repaint();
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("dockspace: dock demo"),
        ..Default::default()
    };
    eframe::run_native(
        "dockspace: dock demo",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}
