// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front-end for the capture session
//!
//! Renders the live preview with Unicode half-block characters and drives
//! [`CameraSession`] from key presses. Also hosts the two collaborator
//! screens the session navigates to: the permission screen and the review
//! screen.

use crate::app::layout::{self, ArcSide, RadialButton};
use crate::app::panels::{exposure_label, zoom_label};
use crate::app::permissions::{PermissionSource, PermissionState, PermissionStatus, StaticPermissions};
use crate::app::{
    CameraSession, Command, Message, PanelVisibility, Route, SessionScreen, SessionSettings,
};
use crate::backends::camera::VirtualCameraBackend;
use crate::config::Config;
use crate::errors::AppError;
use crate::pipelines::photo::CapturedMedia;
use crate::storage::{GalleryDirectory, MediaLibrary, discard_capture, latest_photo};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::channel::mpsc;
use image::RgbImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Logical points per terminal cell, used to map the radial layout
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;

/// Run the terminal capture session
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    init_file_logging(&config.log_file());

    let runtime = tokio::runtime::Runtime::new()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &runtime, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_file_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Events delivered back to the UI loop from background tasks
enum AppEvent {
    Session(Message),
    Saved(Result<PathBuf, AppError>),
    LatestPhoto(Option<PathBuf>),
}

/// Screen currently owning the terminal
enum Screen {
    Camera,
    Permissions(PermissionState),
    Review {
        media: CapturedMedia,
        /// Downscaled copy of the photo, decoded once on entry
        thumbnail: Option<image::DynamicImage>,
        saved: Option<PathBuf>,
    },
}

struct App {
    session: CameraSession,
    screen: Screen,
    gallery: Arc<GalleryDirectory>,
    status_message: String,
    /// Newest photo in the gallery, shown next to the gallery button
    latest: Option<PathBuf>,
    events: mpsc::UnboundedSender<AppEvent>,
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &tokio::runtime::Runtime,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Arc::new(VirtualCameraBackend::new(config.capture_directory()));
    let permissions = StaticPermissions(config.permissions).current();
    let session = CameraSession::new(backend, permissions, SessionSettings::from(&config));

    let (sender, mut receiver) = mpsc::unbounded();
    let screen = match session.screen() {
        SessionScreen::Redirect(_) => Screen::Permissions(session.permissions()),
        _ => Screen::Camera,
    };
    let mut app = App {
        session,
        screen,
        gallery: Arc::new(GalleryDirectory::new(config.photo_directory())),
        status_message: String::new(),
        latest: None,
        events: sender,
    };
    app.refresh_latest(runtime);

    loop {
        // Drain results of background work
        while let Ok(event) = receiver.try_recv() {
            app.handle_event(event, runtime);
        }

        terminal.draw(|f| app.draw(f.area(), f.buffer_mut()))?;

        // Handle input with timeout for preview updates
        if event::poll(Duration::from_millis(33))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            if key.code == KeyCode::Char('q') {
                break;
            }
            app.handle_key(key.code, runtime);
        }
    }

    Ok(())
}

impl App {
    fn handle_event(&mut self, event: AppEvent, runtime: &tokio::runtime::Runtime) {
        match event {
            AppEvent::Session(message) => self.dispatch(message, runtime),
            AppEvent::Saved(Ok(path)) => {
                if let Screen::Review { saved, .. } = &mut self.screen {
                    *saved = Some(path.clone());
                }
                self.latest = Some(path);
                self.status_message = "Saved to gallery!".into();
            }
            AppEvent::LatestPhoto(path) => self.latest = path,
            AppEvent::Saved(Err(e)) => {
                error!(error = %e, "Failed to save to gallery");
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Feed a message to the session and carry out the resulting command
    fn dispatch(&mut self, message: Message, runtime: &tokio::runtime::Runtime) {
        let capture_message = matches!(message, Message::Capture | Message::PhotoCaptured(_));
        let command = self.session.update(message);
        if capture_message
            && command.is_none()
            && let Some(e) = self.session.last_capture_error()
        {
            self.status_message = format!("Error: {}", e);
        }

        match command {
            Command::None => {}
            Command::Navigate(Route::Permissions) => {
                self.screen = Screen::Permissions(self.session.permissions());
            }
            Command::Navigate(Route::Media(media)) => {
                self.status_message.clear();
                let thumbnail = image::open(&media.path)
                    .map(|img| img.thumbnail(320, 240))
                    .map_err(|e| error!(path = %media.path, error = %e, "Failed to load photo"))
                    .ok();
                self.screen = Screen::Review {
                    media,
                    thumbnail,
                    saved: None,
                };
            }
            Command::Capture(job) => {
                self.status_message = "Taking photo...".into();
                let events = self.events.clone();
                runtime.spawn(async move {
                    let result = job.run().await;
                    let _ = events.unbounded_send(AppEvent::Session(Message::PhotoCaptured(result)));
                });
            }
            Command::OpenGallery => self.open_gallery(),
        }
    }

    fn refresh_latest(&self, runtime: &tokio::runtime::Runtime) {
        let dir = self.gallery.root().to_path_buf();
        let events = self.events.clone();
        runtime.spawn(async move {
            let _ = events.unbounded_send(AppEvent::LatestPhoto(latest_photo(dir).await));
        });
    }

    fn open_gallery(&mut self) {
        let dir = self.gallery.root().to_path_buf();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            self.status_message = format!("Error: {}", e);
            return;
        }
        match open::that_detached(&dir) {
            Ok(()) => info!(path = %dir.display(), "Opened gallery"),
            Err(e) => {
                error!(path = %dir.display(), error = %e, "Failed to open gallery");
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode, runtime: &tokio::runtime::Runtime) {
        match &mut self.screen {
            Screen::Permissions(state) => match code {
                KeyCode::Char('c') => state.camera = PermissionStatus::Granted,
                KeyCode::Char('m') => state.microphone = PermissionStatus::Granted,
                KeyCode::Char('n') => state.microphone = PermissionStatus::Denied,
                KeyCode::Enter => {
                    let state = *state;
                    if !crate::app::should_redirect(&state) {
                        self.screen = Screen::Camera;
                    }
                    self.dispatch(Message::PermissionsChanged(state), runtime);
                }
                _ => {}
            },
            Screen::Review { media, .. } => match code {
                KeyCode::Char('s') => {
                    let gallery = Arc::clone(&self.gallery);
                    let path = PathBuf::from(&media.path);
                    let events = self.events.clone();
                    runtime.spawn(async move {
                        let result = gallery.save_to_library(&path).await;
                        let _ = events.unbounded_send(AppEvent::Saved(result));
                    });
                }
                KeyCode::Char('d') => {
                    let path = PathBuf::from(&media.path);
                    runtime.spawn(async move {
                        if let Err(e) = discard_capture(&path).await {
                            error!(error = %e, "Failed to delete capture");
                        }
                    });
                    self.status_message = "Deleted".into();
                    self.screen = Screen::Camera;
                }
                KeyCode::Esc | KeyCode::Char('b') => {
                    self.status_message.clear();
                    self.screen = Screen::Camera;
                }
                _ => {}
            },
            Screen::Camera => {
                if let Some(message) = self.camera_key(code) {
                    self.dispatch(message, runtime);
                }
            }
        }
    }

    fn camera_key(&self, code: KeyCode) -> Option<Message> {
        match self.session.panel() {
            PanelVisibility::None => match code {
                KeyCode::Char('t') => Some(Message::ToggleTorch),
                KeyCode::Char('f') => Some(Message::ToggleFlash),
                KeyCode::Char('s') => Some(Message::SwitchCamera),
                KeyCode::Char('g') => Some(Message::OpenGallery),
                KeyCode::Char('z') => Some(Message::ShowZoomControls),
                KeyCode::Char('e') => Some(Message::ShowExposureControls),
                KeyCode::Char(' ') | KeyCode::Char('p') => Some(Message::Capture),
                _ => None,
            },
            PanelVisibility::ZoomPanel => match code {
                KeyCode::Char('x') | KeyCode::Esc => Some(Message::CloseZoomControls),
                KeyCode::Char('0') => Some(Message::SetZoom(crate::constants::ZOOM_RESET_SENTINEL)),
                KeyCode::Char(c) => option_for_digit(self.session.zoom_options(), c).map(Message::SetZoom),
                _ => None,
            },
            PanelVisibility::ExposurePanel => match code {
                KeyCode::Char('x') | KeyCode::Esc => Some(Message::CloseExposureControls),
                KeyCode::Char(c) => {
                    option_for_digit(self.session.exposure_options(), c).map(Message::SetExposure)
                }
                _ => None,
            },
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        match &self.screen {
            Screen::Camera => self.draw_camera(main, buf),
            Screen::Permissions(state) => draw_permissions(state, main, buf),
            Screen::Review {
                media,
                thumbnail,
                saved,
            } => draw_review(media, thumbnail.as_ref(), saved.as_deref(), main, buf),
        }

        let hint = match (&self.screen, self.session.panel()) {
            (Screen::Permissions(_), _) => "c grant camera | m grant mic | n deny mic | Enter continue | q quit",
            (Screen::Review { .. }, _) => "s save to gallery | d delete and go back | b back | q quit",
            (Screen::Camera, PanelVisibility::None) => {
                "t torch | f flash | s switch | g gallery | z zoom | e exposure | space capture | q quit"
            }
            (Screen::Camera, PanelVisibility::ZoomPanel) => "1-5 zoom | 0 neutral | x close",
            (Screen::Camera, PanelVisibility::ExposurePanel) => "1-5 exposure | x close",
        };
        let message = if self.status_message.is_empty() {
            hint.to_string()
        } else {
            format!("{} | {}", self.status_message, hint)
        };
        StatusBar { message: &message }.render(status, buf);
    }

    fn draw_camera(&self, area: Rect, buf: &mut Buffer) {
        let view = match self.session.screen() {
            SessionScreen::Capture(view) => view,
            SessionScreen::NoDevice(facing) => {
                let msg = format!("No {} camera ('s' to switch)", facing);
                centered_text(&msg, area, buf);
                return;
            }
            SessionScreen::Redirect(_) => return,
        };

        let [preview_area, controls_area] =
            Layout::vertical([Constraint::Fill(2), Constraint::Fill(1)]).areas(area);

        let frame = self
            .session
            .camera()
            .and_then(|camera| camera.preview_frame(preview_area.width as u32, preview_area.height as u32 * 2));
        PreviewWidget { frame: frame.as_ref() }.render(preview_area, buf);

        // Status overlay in the preview's bottom-right corner
        let overlay = &view.status_text;
        let x = preview_area.right().saturating_sub(overlay.len() as u16 + 1);
        let y = preview_area.bottom().saturating_sub(1);
        buf.set_string(x, y, overlay, Style::default().fg(Color::White).bg(Color::Black));

        let params = self.session.parameters();
        match self.session.panel() {
            PanelVisibility::None => {
                let mut lines = view.device.lines();
                lines.push(String::new());
                let latest = self
                    .latest
                    .as_deref()
                    .and_then(Path::file_name)
                    .map(|name| format!(" ({})", name.to_string_lossy()))
                    .unwrap_or_default();
                lines.push(format!(
                    "[t] Torch {}   [f] Flash {}   [s] Flip   [g] Gallery{}",
                    if params.torch().is_on() { "on" } else { "off" },
                    if params.flash().is_on() { "on" } else { "off" },
                    latest,
                ));
                lines.push(String::new());
                let shutter = if view.capturing { "( ... )" } else { "(  ●  )" };
                lines.push(format!("[z] +/-        {}        [e] 1x", shutter));
                for (i, line) in lines.iter().enumerate() {
                    let y = controls_area.y + i as u16;
                    if y < controls_area.bottom() {
                        buf.set_string(controls_area.x + 1, y, line, Style::default());
                    }
                }
            }
            PanelVisibility::ZoomPanel => {
                let (width, height) = logical_size(area);
                let buttons = self.session.zoom_buttons(width, height);
                draw_radial(&buttons, params.zoom(), zoom_label, area, buf);
                draw_close(layout::close_button(width, height, ArcSide::Left), area, buf);
            }
            PanelVisibility::ExposurePanel => {
                let (width, height) = logical_size(area);
                let buttons = self.session.exposure_buttons(width, height);
                draw_radial(&buttons, params.exposure(), exposure_label, area, buf);
                draw_close(layout::close_button(width, height, ArcSide::Right), area, buf);
            }
        }
    }
}

/// Option selected by digit key `c` (1-based)
fn option_for_digit(options: &[f64], c: char) -> Option<f64> {
    let index = c.to_digit(10)? as usize;
    index.checked_sub(1).and_then(|i| options.get(i)).copied()
}

fn logical_size(area: Rect) -> (f64, f64) {
    (area.width as f64 * CELL_WIDTH, area.height as f64 * CELL_HEIGHT)
}

/// Map a logical point to a cell inside `area`, if it lands there
fn to_cell(x: f64, y: f64, area: Rect) -> Option<(u16, u16)> {
    let col = (x / CELL_WIDTH).round();
    let row = (y / CELL_HEIGHT).round();
    if col < 0.0 || row < 0.0 || col >= area.width as f64 || row >= area.height as f64 {
        return None;
    }
    Some((area.x + col as u16, area.y + row as u16))
}

fn draw_radial(
    buttons: &[RadialButton],
    current: f64,
    label: fn(f64) -> String,
    area: Rect,
    buf: &mut Buffer,
) {
    for (i, button) in buttons.iter().enumerate() {
        let Some((x, y)) = to_cell(button.x, button.y, area) else {
            continue;
        };
        let style = if button.value == current {
            Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        let text = format!(" {}:{} ", i + 1, label(button.value));
        buf.set_stringn(x, y, &text, area.right().saturating_sub(x) as usize, style);
    }
}

fn draw_close(close: layout::CloseButton, area: Rect, buf: &mut Buffer) {
    if let Some((x, y)) = to_cell(close.x, close.y, area) {
        buf.set_stringn(
            x,
            y,
            " X ",
            area.right().saturating_sub(x) as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

fn draw_permissions(state: &PermissionState, area: Rect, buf: &mut Buffer) {
    let lines = [
        "Permissions".to_string(),
        String::new(),
        "The camera needs a few permissions to work on this device.".to_string(),
        String::new(),
        format!("Camera:     {}", state.camera.display_name()),
        format!("Microphone: {}", state.microphone.display_name()),
    ];
    for (i, line) in lines.iter().enumerate() {
        let y = area.y + 1 + i as u16;
        if y < area.bottom() {
            buf.set_string(area.x + 2, y, line, Style::default());
        }
    }
}

fn draw_review(
    media: &CapturedMedia,
    thumbnail: Option<&image::DynamicImage>,
    saved: Option<&Path>,
    area: Rect,
    buf: &mut Buffer,
) {
    let preview_height = area.height.saturating_sub(4);
    let preview_area = Rect {
        height: preview_height,
        ..area
    };
    let frame = thumbnail.map(|img| {
        img.resize_exact(
            preview_area.width.max(1) as u32,
            (preview_area.height.max(1) * 2) as u32,
            image::imageops::FilterType::Triangle,
        )
        .to_rgb8()
    });
    PreviewWidget {
        frame: frame.as_ref(),
    }
    .render(preview_area, buf);

    let mut y = area.y + preview_height;
    let lines = [
        format!("{}: {}", media.kind.as_str(), media.path),
        match saved {
            Some(path) => format!("In gallery: {}", path.display()),
            None => "Not saved".to_string(),
        },
    ];
    for line in lines {
        if y < area.bottom() {
            buf.set_string(area.x + 1, y, line, Style::default());
        }
        y += 1;
    }
}

fn centered_text(msg: &str, area: Rect, buf: &mut Buffer) {
    let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
    let y = area.y + area.height / 2;
    if y < area.bottom() && x < area.right() {
        buf.set_string(x, y, msg, Style::default());
    }
}

/// Widget that renders an RGB frame using half-block characters
///
/// The frame is expected at `width` x `2 * height` pixels of the area.
struct PreviewWidget<'a> {
    frame: Option<&'a RgbImage>,
}

impl Widget for PreviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame else {
            centered_text("Waiting for camera...", area, buf);
            return;
        };

        // Each cell shows two vertical pixels: fg is the upper, bg the lower
        for ty in 0..area.height {
            for tx in 0..area.width {
                let px = (tx as u32).min(frame.width().saturating_sub(1));
                let top_y = (ty as u32 * 2).min(frame.height().saturating_sub(1));
                let bottom_y = (ty as u32 * 2 + 1).min(frame.height().saturating_sub(1));
                let top = frame.get_pixel(px, top_y).0;
                let bottom = frame.get_pixel(px, bottom_y).0;

                if let Some(cell) = buf.cell_mut((area.x + tx, area.y + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(top[0], top[1], top[2]));
                    cell.set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
