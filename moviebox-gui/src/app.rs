use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use eframe::egui::{self, Color32, Rounding, Stroke};
use moviebox_core::view::{Content, GridView, LoginView, MainView, NoticeView, ProfileView, Screen};
use moviebox_core::{render, AppState, Effect, LoadOutcome, NavTarget, Theme};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

const CARD_WIDTH: f32 = 150.0;
const HEART: &str = "♥";

pub struct AppInit {
    pub runtime: Arc<Runtime>,
    pub state: AppState,
    pub catalog_rx: mpsc::Receiver<LoadOutcome>,
    pub loader: JoinHandle<()>,
}

/// User intents collected while drawing, applied once the frame is laid out.
#[derive(Debug, Clone)]
enum UiAction {
    Navigate(NavTarget),
    SelectCategory(String),
    Play(String),
    ToggleFavorite,
    ChangeTheme(Theme),
    ChangeLanguage(String),
    Login,
    Logout,
    ResetData,
    OpenEmbed,
    CloseNotice,
    OpenUrl(String),
}

struct Palette {
    dark_mode: bool,
    background: Color32,
    panel: Color32,
    border: Color32,
    text: Color32,
    accent: Color32,
    hover: Color32,
    widget: Color32,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                dark_mode: true,
                background: Color32::from_rgb(18, 18, 18),
                panel: Color32::from_rgb(30, 30, 30),
                border: Color32::from_rgb(62, 62, 66),
                text: Color32::from_rgb(220, 220, 220),
                accent: Color32::from_rgb(229, 9, 20),
                hover: Color32::from_rgb(46, 46, 46),
                widget: Color32::from_rgb(50, 50, 50),
            },
            Theme::Light => Self {
                dark_mode: false,
                background: Color32::from_rgb(245, 245, 245),
                panel: Color32::from_rgb(230, 230, 232),
                border: Color32::from_rgb(200, 200, 204),
                text: Color32::from_rgb(30, 30, 30),
                accent: Color32::from_rgb(229, 9, 20),
                hover: Color32::from_rgb(215, 215, 218),
                widget: Color32::WHITE,
            },
        }
    }
}

pub struct MovieApp {
    // keeps the loader's runtime alive
    _runtime: Arc<Runtime>,
    state: AppState,
    catalog_rx: mpsc::Receiver<LoadOutcome>,
    loader: Option<JoinHandle<()>>,
    email: String,
    password: String,
    applied_theme: Option<Theme>,
}

impl MovieApp {
    pub fn new(init: AppInit) -> Self {
        Self {
            _runtime: init.runtime,
            state: init.state,
            catalog_rx: init.catalog_rx,
            loader: Some(init.loader),
            email: String::new(),
            password: String::new(),
            applied_theme: None,
        }
    }

    fn refresh_catalog(&mut self) {
        if let Ok(outcome) = self.catalog_rx.try_recv() {
            self.state.apply_catalog(outcome);
            self.loader = None;
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context, theme: Theme) {
        if self.applied_theme == Some(theme) {
            return;
        }
        let palette = Palette::for_theme(theme);
        let mut style = (*ctx.style()).clone();

        style.visuals.dark_mode = palette.dark_mode;
        style.visuals.panel_fill = palette.panel;
        style.visuals.window_fill = palette.background;
        style.visuals.extreme_bg_color = palette.background;
        style.visuals.faint_bg_color = palette.hover;
        style.visuals.override_text_color = Some(palette.text);

        style.visuals.widgets.noninteractive.bg_fill = palette.panel;
        style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, palette.border);
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text);

        style.visuals.widgets.inactive.bg_fill = palette.widget;
        style.visuals.widgets.inactive.weak_bg_fill = palette.widget;
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, palette.border);
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, palette.text);

        style.visuals.widgets.hovered.bg_fill = palette.hover;
        style.visuals.widgets.hovered.weak_bg_fill = palette.hover;
        style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, palette.accent);
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, palette.text);

        style.visuals.widgets.active.bg_fill = palette.accent;
        style.visuals.widgets.active.weak_bg_fill = palette.accent;
        style.visuals.widgets.active.bg_stroke = Stroke::new(1.0, palette.accent);
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

        style.visuals.selection.bg_fill = palette.accent.linear_multiply(0.4);
        style.visuals.selection.stroke = Stroke::new(1.0, palette.accent);

        style.visuals.widgets.noninteractive.rounding = Rounding::same(4.0);
        style.visuals.widgets.inactive.rounding = Rounding::same(4.0);
        style.visuals.widgets.hovered.rounding = Rounding::same(4.0);
        style.visuals.widgets.active.rounding = Rounding::same(4.0);

        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(10.0);

        ctx.set_style(style);
        self.applied_theme = Some(theme);
    }

    fn handle(&mut self, action: UiAction) {
        debug!(?action, "ui action");
        match action {
            UiAction::Navigate(target) => {
                if let Effect::OpenUrl(url) = self.state.navigate(target) {
                    open_url(&url);
                }
            }
            UiAction::SelectCategory(name) => self.state.select_category(&name),
            UiAction::Play(id) => {
                self.state.play(&id);
            }
            UiAction::ToggleFavorite => {
                if let Err(e) = self.state.toggle_now_playing_favorite() {
                    warn!(error = %e, "favorite toggle rejected");
                }
            }
            UiAction::ChangeTheme(theme) => {
                if let Err(e) = self.state.change_theme(theme) {
                    warn!(error = %e, "theme change rejected");
                }
            }
            UiAction::ChangeLanguage(language) => {
                if let Err(e) = self.state.change_language(&language) {
                    warn!(error = %e, "language change rejected");
                }
            }
            UiAction::Login => {
                if self.state.login(&self.email, &self.password).is_ok() {
                    self.password.clear();
                }
            }
            UiAction::Logout => self.state.logout(),
            UiAction::ResetData => {
                self.state.reset_data();
                self.email.clear();
                self.password.clear();
            }
            UiAction::OpenEmbed => self.state.open_embed(),
            UiAction::CloseNotice => self.state.close_notice(),
            UiAction::OpenUrl(url) => open_url(&url),
        }
    }

    fn draw_login(&mut self, ctx: &egui::Context, login: &LoginView, actions: &mut Vec<UiAction>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading(egui::RichText::new(&login.title).size(22.0).strong());
                ui.add_space(16.0);
                ui.set_max_width(320.0);

                ui.label(&login.email_label);
                ui.text_edit_singleline(&mut self.email);
                ui.label(&login.password_label);
                let password = ui.add(egui::TextEdit::singleline(&mut self.password).password(true));
                let submitted =
                    password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(8.0);
                if ui.button(&login.submit_label).clicked() || submitted {
                    actions.push(UiAction::Login);
                }
                if let Some(error) = &login.error {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new(error).color(Color32::from_rgb(229, 57, 53)));
                }
            });
        });
    }
}

fn open_url(raw: &str) {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            if let Err(e) = webbrowser::open(url.as_str()) {
                warn!(error = %e, url = %url, "failed to open browser");
            }
        }
        _ => warn!(url = raw, "refusing to open invalid URL"),
    }
}

fn draw_loading(ctx: &egui::Context, label: &str) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.spinner();
            ui.label(egui::RichText::new(label).weak());
        });
    });
}

fn draw_nav(ctx: &egui::Context, main: &MainView, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for item in &main.nav {
                let text = egui::RichText::new(&item.label).size(15.0);
                let text = if item.active { text.strong() } else { text };
                if ui.selectable_label(item.active, text).clicked() {
                    actions.push(UiAction::Navigate(item.target));
                }
            }
        });
        if !main.menu.is_empty() {
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                for item in &main.menu {
                    if ui.selectable_label(item.active, &item.category).clicked() {
                        actions.push(UiAction::SelectCategory(item.category.clone()));
                    }
                }
            });
        }
        ui.add_space(4.0);
    });
}

fn draw_main(ctx: &egui::Context, main: &MainView, actions: &mut Vec<UiAction>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if !matches!(main.content, Content::Profile(_)) {
            if let Some(player) = &main.player {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(&player.title).strong().size(16.0));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let heart = if player.is_favorite {
                                egui::RichText::new(HEART).color(Color32::from_rgb(229, 57, 53))
                            } else {
                                egui::RichText::new(HEART).weak()
                            };
                            if ui.button(heart).on_hover_text(&player.favorite_label).clicked() {
                                actions.push(UiAction::ToggleFavorite);
                            }
                            if ui.button(&player.open_label).on_hover_text(&player.src).clicked() {
                                actions.push(UiAction::OpenUrl(player.src.clone()));
                            }
                        });
                    });
                });
                ui.add_space(8.0);
            }
        }

        egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| match &main.content {
            Content::Category(grid) | Content::Trending(grid) | Content::Favorites(grid) => {
                draw_grid(ui, grid, actions)
            }
            Content::Profile(profile) => draw_profile(ui, profile, actions),
        });
    });
}

fn draw_grid(ui: &mut egui::Ui, grid: &GridView, actions: &mut Vec<UiAction>) {
    if let Some(heading) = &grid.heading {
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new(heading).size(18.0).strong());
        });
        ui.add_space(6.0);
    }
    if let Some(message) = &grid.empty_message {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label(egui::RichText::new(message).weak().size(15.0));
        });
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for card in &grid.cards {
            ui.group(|ui| {
                ui.set_width(CARD_WIDTH);
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if card.is_favorite {
                            ui.label(
                                egui::RichText::new(HEART).color(Color32::from_rgb(229, 57, 53)),
                            );
                        }
                        ui.add(egui::Label::new(egui::RichText::new(&card.title).size(13.0)).truncate(true))
                            .on_hover_text(&card.thumb);
                    });
                    if ui.small_button(&card.play_label).clicked() {
                        actions.push(UiAction::Play(card.id.clone()));
                    }
                });
            });
        }
    });
}

fn draw_profile(ui: &mut egui::Ui, profile: &ProfileView, actions: &mut Vec<UiAction>) {
    ui.vertical_centered(|ui| {
        ui.set_max_width(420.0);
        ui.heading(egui::RichText::new(&profile.title).size(22.0).strong());
        ui.label(egui::RichText::new(&profile.email).weak());
        ui.add_space(10.0);

        ui.group(|ui| {
            ui.label(egui::RichText::new(&profile.settings_title).strong().size(16.0));
            ui.separator();

            ui.horizontal(|ui| {
                ui.label(&profile.theme_label);
                let selected = profile
                    .themes
                    .iter()
                    .find(|c| c.selected)
                    .map(|c| c.label.clone())
                    .unwrap_or_default();
                egui::ComboBox::from_id_source("theme_select")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for choice in &profile.themes {
                            if ui.selectable_label(choice.selected, &choice.label).clicked()
                                && !choice.selected
                            {
                                actions.push(UiAction::ChangeTheme(choice.value));
                            }
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label(&profile.language_label);
                let selected = profile
                    .languages
                    .iter()
                    .find(|c| c.selected)
                    .map(|c| c.label.clone())
                    .unwrap_or_default();
                egui::ComboBox::from_id_source("language_select")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for choice in &profile.languages {
                            if ui.selectable_label(choice.selected, &choice.label).clicked()
                                && !choice.selected
                            {
                                actions.push(UiAction::ChangeLanguage(choice.value.clone()));
                            }
                        }
                    });
            });

            ui.add_space(8.0);
            if ui.button(&profile.reset_label).clicked() {
                actions.push(UiAction::ResetData);
            }
        });

        ui.add_space(10.0);
        if ui.button(&profile.embed_label).clicked() {
            actions.push(UiAction::OpenEmbed);
        }
        if ui.button(&profile.logout_label).clicked() {
            actions.push(UiAction::Logout);
        }
    });
}

fn draw_notice(ctx: &egui::Context, notice: &NoticeView, actions: &mut Vec<UiAction>) {
    egui::Window::new(&notice.title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(message) = &notice.message {
                ui.label(message);
            }
            if let Some(url) = &notice.url {
                ui.hyperlink_to(url, url);
                if ui.button("↗").on_hover_text(url).clicked() {
                    actions.push(UiAction::OpenUrl(url.clone()));
                }
            }
            ui.add_space(6.0);
            if ui.button(&notice.close_label).clicked() {
                actions.push(UiAction::CloseNotice);
            }
        });
}

impl Drop for MovieApp {
    fn drop(&mut self) {
        if let Some(handle) = self.loader.take() {
            handle.abort();
        }
    }
}

impl eframe::App for MovieApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_catalog();
        self.state.tick(Utc::now());

        let view = render(&self.state);
        self.apply_theme(ctx, view.theme);

        let mut actions = Vec::new();
        match &view.screen {
            Screen::Loading { label } => draw_loading(ctx, label),
            Screen::Login(login) => self.draw_login(ctx, login, &mut actions),
            Screen::Main(main) => {
                draw_nav(ctx, main, &mut actions);
                draw_main(ctx, main, &mut actions);
            }
        }
        if let Some(notice) = &view.notice {
            draw_notice(ctx, notice, &mut actions);
        }

        for action in actions {
            self.handle(action);
        }

        if self.state.is_loading() || self.state.notice().is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
