use iced::widget::{button, canvas, column, container, row, stack, text};
use iced::{window, Element, Length, Size, Subscription, Task, Theme};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod assets;
mod error;
mod layout;
mod state;
mod ui;

use assets::{manifest, ImageStore};
use error::GalleryError;
use state::catalog::Catalog;
use state::config::Config;
use state::data::ImageRef;
use state::view::{Route, ViewController};
use ui::camera::{Camera, Gesture};
use ui::canvas::GalleryCanvas;

/// Where the gallery is in its startup sequence
#[derive(Debug, Clone)]
enum Status {
    /// Waiting for this many images to decode
    Loading(usize),
    Ready,
    Failed(String),
}

/// Main application state
struct Gallery {
    config: Config,
    /// Owns the catalog and everything currently drawn
    controller: ViewController,
    camera: Camera,
    status: Status,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// A navigation link was clicked
    Navigate(String),
    /// Every image finished decoding, or one of them failed
    Loaded(Result<Arc<ImageStore>, Arc<GalleryError>>),
    /// Pan, zoom or fling on the canvas
    Camera(Gesture),
    /// Animation frame while the camera is coasting
    Tick(Instant),
    /// The window is about to close
    CloseRequested(window::Id),
}

impl Gallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load().unwrap_or_else(|err| {
            tracing::error!("❌ {err}; using the default config");
            Config::default()
        });

        let camera = Camera::new(Size::new(config.world_size.width, config.world_size.height));
        tracing::debug!("camera world hint {:?}", camera.world());

        let route = Route::parse(&config.start_route);

        match open_catalog(&config) {
            Ok(catalog) => {
                let images: Vec<ImageRef> = catalog
                    .leaves()
                    .into_iter()
                    .map(|(_, image)| image.clone())
                    .collect();
                let count = images.len();
                let controller = ViewController::new(catalog, config.layout.clone(), route);

                (
                    Gallery {
                        config,
                        controller,
                        camera,
                        status: Status::Loading(count),
                    },
                    Task::perform(load_images(images), Message::Loaded),
                )
            }
            Err(err) => {
                tracing::error!("❌ {err}");
                let controller = ViewController::new(Catalog::default(), config.layout.clone(), route);

                (
                    Gallery {
                        config,
                        controller,
                        camera,
                        status: Status::Failed(err.to_string()),
                    },
                    Task::none(),
                )
            }
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(fragment) => {
                self.controller.navigate(Route::parse(&fragment));
                Task::none()
            }
            Message::Loaded(Ok(images)) => {
                self.status = Status::Ready;
                self.controller.assets_loaded(images);
                Task::none()
            }
            Message::Loaded(Err(err)) => {
                tracing::error!("❌ Loading failed: {err}");
                self.status = Status::Failed(err.to_string());
                Task::none()
            }
            Message::Camera(gesture) => {
                self.camera.apply(gesture);
                Task::none()
            }
            Message::Tick(now) => {
                self.camera.tick(now);
                Task::none()
            }
            Message::CloseRequested(id) => {
                self.controller.teardown();
                window::close(id)
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let current = self.controller.route().as_str();
        let nav = row![
            nav_link("Home", Route::HOME, current),
            nav_link("By height", Route::BY_HEIGHT, current),
        ]
        .spacing(10)
        .padding(10);

        let body: Element<Message> = match &self.status {
            Status::Loading(count) => centered(format!("Loading {count} assets...")),
            Status::Failed(err) => centered(format!("❌ {err}")),
            Status::Ready => canvas(GalleryCanvas {
                scene: self.controller.scene(),
                images: self.controller.images(),
                camera: &self.camera,
                text: self.config.layout.text,
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        };

        let footer = container(text(&self.config.footer).size(14))
            .align_right(Length::Fill)
            .align_bottom(Length::Fill)
            .padding(8);

        column![nav, stack![body, footer]].into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![window::close_requests().map(Message::CloseRequested)];
        if self.camera.is_coasting() {
            subscriptions.push(window::frames().map(Message::Tick));
        }
        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn nav_link<'a>(label: &'a str, route: &'static str, current: &str) -> Element<'a, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if route == current {
        button::primary
    } else {
        button::secondary
    };

    button(text(label))
        .on_press(Message::Navigate(route.to_string()))
        .style(style)
        .padding(8)
        .into()
}

fn centered<'a>(message: String) -> Element<'a, Message> {
    container(text(message).size(24))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Scan the textures root and build the catalog from what is found
fn open_catalog(config: &Config) -> error::Result<Catalog<ImageRef>> {
    let entries = manifest::scan(&config.textures_root)?;
    let catalog = Catalog::build(entries)?;
    tracing::info!("📚 Catalog ready with {} images", catalog.len());
    Ok(catalog)
}

async fn load_images(images: Vec<ImageRef>) -> Result<Arc<ImageStore>, Arc<GalleryError>> {
    assets::loader::load_all(images)
        .await
        .map(Arc::new)
        .map_err(Arc::new)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application("Asset Gallery", Gallery::update, Gallery::view)
        .subscription(Gallery::subscription)
        .theme(Gallery::theme)
        .window(window::Settings {
            exit_on_close_request: false,
            ..window::Settings::default()
        })
        .centered()
        .run_with(Gallery::new)
}
