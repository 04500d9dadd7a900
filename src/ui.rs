use crate::about;
use crate::device::{DeviceRecord, RecordKind, Subsystem};
use crate::notification::Toasts;
use crate::{DeviceMonitor, PROGRAM_TITLE};
use eframe::egui::{self, Align2, Color32, Context, RichText, ScrollArea, Ui};

pub const BACKGROUND_COLOR: Color32 = Color32::from_rgb(0x45, 0x43, 0xE4);
const ACCENT_COLOR: Color32 = Color32::from_rgb(0x25, 0x75, 0xFC);
const CARD_COLOR: Color32 = Color32::from_rgba_premultiplied(230, 230, 230, 230);
const BUTTON_HEIGHT: f32 = 56.0;

// --- Screens ---

pub(crate) fn draw_welcome_screen(app: &mut DeviceMonitor, ui: &mut Ui) {
    ui.add_space((ui.available_height() * 0.25).max(16.0));
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("📡").size(96.0).color(Color32::WHITE));
        ui.add_space(32.0);
        ui.label(RichText::new(PROGRAM_TITLE).size(32.0).strong().color(Color32::WHITE));
        ui.add_space(8.0);
        ui.label(
            RichText::new("Discover all your connected devices in one place")
                .size(16.0)
                .color(Color32::from_white_alpha(230)),
        );
        ui.add_space(48.0);

        let button = egui::Button::new(RichText::new("Get Started").size(18.0).color(ACCENT_COLOR))
            .fill(Color32::WHITE)
            .min_size(egui::vec2(ui.available_width() - 64.0, BUTTON_HEIGHT));
        if ui.add(button).clicked() {
            app.flow.advance();
        }

        ui.add_space(32.0);
        for line in about::about() {
            ui.label(RichText::new(line).small().color(Color32::from_white_alpha(180)));
        }
    });
}

pub(crate) fn draw_device_list(app: &DeviceMonitor, ui: &mut Ui) {
    ui.add_space(16.0);
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        ui.label(RichText::new("Connected Devices").size(26.0).strong().color(Color32::WHITE));
    });
    ui.add_space(16.0);

    let snapshot = match app.current_snapshot() {
        Some(snapshot) => snapshot,
        None => {
            // Fetch still running
            ui.centered_and_justified(|ui| {
                ui.add(egui::Spinner::new().size(48.0).color(Color32::WHITE));
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for record in snapshot.records() {
                draw_device_card(ui, record);
            }
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Scanned at {}", snapshot.captured_at().format("%H:%M:%S")))
                    .small()
                    .color(Color32::from_white_alpha(180)),
            );
        });
}

// --- Widgets ---

/// Icon shown next to a record.
pub fn record_icon(record: &DeviceRecord) -> &'static str {
    match record.subsystem {
        Subsystem::Wireless => "📶",
        Subsystem::Radio => "🔷",
        Subsystem::SerialBus => "🔌",
    }
}

fn draw_device_card(ui: &mut Ui, record: &DeviceRecord) {
    egui::Frame::none()
        .fill(CARD_COLOR)
        .rounding(8.0)
        .inner_margin(16.0)
        .outer_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(record_icon(record)).size(20.0).color(ACCENT_COLOR));
                ui.add_space(16.0);
                let text = RichText::new(&record.text).size(16.0).color(Color32::BLACK);
                let text = if record.kind == RecordKind::Header { text.strong() } else { text };
                ui.label(text);
            });
        });
}

pub(crate) fn draw_toasts(toasts: &Toasts, ctx: &Context) {
    if toasts.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -32.0))
        .interactable(false)
        .show(ctx, |ui| {
            for toast in toasts.visible() {
                egui::Frame::none()
                    .fill(Color32::from_black_alpha(200))
                    .rounding(16.0)
                    .inner_margin(egui::Margin::symmetric(16.0, 8.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new(&toast.message).color(Color32::WHITE));
                    });
                ui.add_space(4.0);
            }
        });
}
