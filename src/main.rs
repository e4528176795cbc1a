use chrono::{Local, NaiveDate};
use iced::widget::image::Handle;
use iced::widget::{column, container, horizontal_rule, scrollable, text};
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use std::fs;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod capture;
mod config;
mod error;
mod state;
mod ui;

use capture::{ArchiveBuilder, CaptureStore, DailyArchive};
use config::Config;
use error::CaptureError;
use state::data::{date_label, Identifier, Side};
use state::registry::Registry;
use ui::Status;

/// Main application state
struct MouseCapture {
    /// Registered mouse numbers
    registry: Registry,
    /// Daily photo folders
    store: CaptureStore,
    archiver: ArchiveBuilder,
    /// Contents of the "new mouse" input
    new_mouse: String,
    delete_choice: Option<Identifier>,
    /// Mouse whose photos are being uploaded
    selected: Option<Identifier>,
    /// Today's photos of the selected mouse, indexed by `Side::index`
    previews: [Option<Handle>; 2],
    /// Status message to display to the user
    status: Option<Status>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    NewMouseChanged(String),
    /// User pressed "Register" or hit Enter in the input
    Register,
    DeleteChoiceSelected(Identifier),
    Delete,
    MouseSelected(Identifier),
    /// User clicked "Choose photo…" for one ear
    UploadPhoto(Side),
    DownloadArchive,
}

/// Date of the folder uploads go to
fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl MouseCapture {
    /// Open the registry and photo store described by `config`
    fn open(config: &Config) -> Result<Self, CaptureError> {
        let registry = Registry::open(config.registry_path())?;
        if registry.is_empty() {
            info!("No mice registered yet in {}", registry.path().display());
        }

        let store = CaptureStore::new(&config.base_dir).with_jpeg_quality(config.jpeg_quality);
        let archiver = ArchiveBuilder::new(store.clone());

        let mut app = MouseCapture {
            selected: registry.identifiers().first().cloned(),
            registry,
            store,
            archiver,
            new_mouse: String::new(),
            delete_choice: None,
            previews: [None, None],
            status: None,
        };
        app.refresh_previews();

        Ok(app)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NewMouseChanged(value) => {
                self.new_mouse = value;
            }
            Message::Register => match self.registry.add(&self.new_mouse) {
                Ok(id) => {
                    self.status = Some(Status::success(format!("Registered mouse {}", id)));
                    self.new_mouse.clear();
                    if self.selected.is_none() {
                        self.selected = Some(id);
                        self.refresh_previews();
                    }
                }
                Err(e) => self.report(e),
            },
            Message::DeleteChoiceSelected(id) => {
                self.delete_choice = Some(id);
            }
            Message::Delete => {
                let Some(id) = self.delete_choice.take() else {
                    return Task::none();
                };
                match self.registry.remove(id.as_str()) {
                    Ok(()) => {
                        self.status = Some(Status::warning(format!("Deleted mouse {}", id)));
                        if self.selected.as_ref() == Some(&id) {
                            self.selected = self.registry.identifiers().first().cloned();
                            self.refresh_previews();
                        }
                    }
                    Err(e) => self.report(e),
                }
            }
            Message::MouseSelected(id) => {
                if !self.registry.contains(id.as_str()) {
                    return Task::none();
                }
                self.selected = Some(id);
                self.refresh_previews();
            }
            Message::UploadPhoto(side) => {
                let Some(id) = self.selected.clone() else {
                    return Task::none();
                };

                // Show the native file picker dialog
                let picked = FileDialog::new()
                    .set_title(format!("{} photo of mouse {}", side, id))
                    .add_filter("Images", &["jpg", "jpeg", "png"])
                    .pick_file();

                if let Some(path) = picked {
                    let saved = fs::read(&path)
                        .map_err(CaptureError::from)
                        .and_then(|bytes| {
                            self.store.save_photograph(today(), &id, side, &bytes)?;
                            Ok(bytes)
                        });

                    match saved {
                        Ok(bytes) => {
                            self.previews[side.index()] = Some(Handle::from_bytes(bytes));
                            self.status = Some(Status::success(format!(
                                "{} photo of mouse {} saved!",
                                side, id
                            )));
                        }
                        Err(e) => self.report(e),
                    }
                }
            }
            Message::DownloadArchive => self.save_archive(),
        }

        Task::none()
    }

    /// Build today's archive and ask where to save it
    fn save_archive(&mut self) {
        let date = today();
        let archive = match self.archiver.build_archive(date) {
            Ok(Some(archive)) => archive,
            Ok(None) => {
                self.status = Some(Status::info(format!(
                    "No photos for {} yet.",
                    date_label(date)
                )));
                return;
            }
            Err(e) => return self.report(e),
        };

        self.write_archive(archive);
    }

    /// Ask where to save a built archive and write it there
    fn write_archive(&mut self, archive: DailyArchive) {
        let destination = FileDialog::new()
            .set_title("Save daily archive")
            .set_file_name(archive.file_name())
            .add_filter("ZIP archive", &["zip"])
            .save_file();

        let Some(destination) = destination else {
            return;
        };

        let entry_count = archive.entry_count();
        let date = archive.date();
        let size_kb = archive.bytes().len() / 1024;

        match fs::write(&destination, archive.into_bytes()) {
            Ok(()) => {
                info!("💾 Archive saved to {} ({}KB)", destination.display(), size_kb);
                self.status = Some(Status::success(format!(
                    "Saved {} photos from {} to {}",
                    entry_count,
                    date_label(date),
                    destination.display()
                )));
            }
            Err(e) => self.report(e.into()),
        }
    }

    /// Reload today's photos of the selected mouse from disk
    fn refresh_previews(&mut self) {
        let date = today();
        for side in Side::ALL {
            self.previews[side.index()] = self.selected.as_ref().and_then(|id| {
                match self.store.load_photograph(date, id, side) {
                    Ok(bytes) => bytes.map(Handle::from_bytes),
                    Err(e) => {
                        warn!("Could not load {} preview of mouse {}: {}", side.label(), id, e);
                        None
                    }
                }
            });
        }
    }

    /// Show a failed operation to the user
    fn report(&mut self, err: CaptureError) {
        warn!("⚠️  {}", err);
        self.status = Some(Status::from(&err));
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let date = today();
        let mice = self.registry.identifiers();
        let both_present = self
            .selected
            .as_ref()
            .is_some_and(|id| self.store.both_sides_present(date, id));

        let mut content = column![
            text("🐭 Mouse Ear Photo Manager").size(40),
            text(format!(
                "{} · {} mice registered · storage: {}",
                date_label(date),
                self.registry.len(),
                self.store.base_dir().display()
            ))
            .size(14),
        ]
        .spacing(20)
        .padding(40);

        if let Some(status) = &self.status {
            content = content.push(ui::panels::status_line(status));
        }

        content = content
            .push(ui::panels::registration(
                &self.new_mouse,
                mice,
                self.delete_choice.as_ref(),
            ))
            .push(horizontal_rule(1))
            .push(ui::panels::upload(
                mice,
                self.selected.as_ref(),
                &self.previews,
                both_present,
            ))
            .push(horizontal_rule(1))
            .push(ui::panels::download(&date_label(date)));

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mouse_capture=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().unwrap_or_else(|e| {
        error!("❌ {}; falling back to default settings", e);
        Config::default()
    });
    info!(
        base_dir = %config.base_dir.display(),
        jpeg_quality = config.jpeg_quality,
        "Loaded configuration"
    );

    let app = match MouseCapture::open(&config) {
        Ok(app) => app,
        Err(e) => {
            error!(
                "❌ Could not open the mouse registry at {}: {}",
                config.registry_path().display(),
                e
            );
            std::process::exit(1);
        }
    };

    iced::application("Mouse Ear Photo Manager", MouseCapture::update, MouseCapture::view)
        .theme(MouseCapture::theme)
        .centered()
        .run_with(move || (app, Task::none()))
}
