use iced::widget::image::Handle;
use iced::widget::{button, column, horizontal_space, row, text};
use iced::{Alignment, Element, Task, Theme};

mod api;
mod images;
mod state;
mod ui;

use api::ApiClient;
use images::ImageStore;
use state::collection::RemoteError;
use state::session::Session;

/// Main application state
struct PortfolioStudio {
    /// API client holding the resolved base URL and bearer token
    api: ApiClient,
    /// The persisted admin session (the admin gate)
    session: Session,
    /// Fetched photo bytes shared by all screens
    images: ImageStore,
    /// The active screen; replacing it drops the old screen's state,
    /// so late task results for it have nowhere to land
    screen: Screen,
}

enum Screen {
    Portfolio(ui::portfolio::State),
    WorkGallery(ui::work_gallery::State),
    Login(ui::login::State),
    Admin(ui::admin::State),
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Portfolio(ui::portfolio::Message),
    WorkGallery(ui::work_gallery::Message),
    Login(ui::login::Message),
    Admin(ui::admin::Message),
    /// Top-bar navigation
    OpenPortfolio,
    OpenAdmin,
    /// Result of verifying the stored token at startup
    SessionChecked(Result<(), RemoteError>),
    /// One fetched (or failed) gallery image
    ImageFetched(String, Result<Handle, RemoteError>),
}

/// Cross-screen consequences of an update, applied after the screen
/// borrow ends
enum Effect {
    None,
    ShowPortfolio,
    ShowAdmin,
    OpenWork(i64),
    Authenticated(ui::login::Authenticated),
    Logout,
    SessionInvalid,
}

impl PortfolioStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let session = Session::load();
        let mut api = ApiClient::new(api::resolve_base_url());
        api.set_token(session.token().map(str::to_string));

        let (portfolio, portfolio_task) = ui::portfolio::State::new(&api);
        let mut tasks = vec![portfolio_task.map(Message::Portfolio)];

        // A stored token is verified in the background; a 401 clears
        // it, anything else (offline, server down) leaves it alone.
        if session.is_authenticated() {
            let verify_api = api.clone();
            tasks.push(Task::perform(
                async move {
                    verify_api
                        .verify()
                        .await
                        .map(|_| ())
                        .map_err(RemoteError::from)
                },
                Message::SessionChecked,
            ));
        }

        let app = Self {
            api,
            session,
            images: ImageStore::new(),
            screen: Screen::Portfolio(portfolio),
        };
        (app, Task::batch(tasks))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let mut tasks: Vec<Task<Message>> = Vec::new();

        // A message for a screen that is no longer active falls
        // through to Effect::None: results of abandoned screens are
        // dropped here instead of mutating fresh state.
        let effect = match (&mut self.screen, message) {
            (Screen::Portfolio(screen), Message::Portfolio(message)) => {
                let (task, event) = ui::portfolio::update(screen, message, &self.api);
                tasks.push(task.map(Message::Portfolio));
                match event {
                    Some(ui::portfolio::Event::OpenWork(work_id)) => Effect::OpenWork(work_id),
                    None => Effect::None,
                }
            }
            (Screen::WorkGallery(screen), Message::WorkGallery(message)) => {
                let (task, event) = ui::work_gallery::update(screen, message, &self.api);
                tasks.push(task.map(Message::WorkGallery));
                match event {
                    Some(ui::work_gallery::Event::Back) => Effect::ShowPortfolio,
                    None => Effect::None,
                }
            }
            (Screen::Login(screen), Message::Login(message)) => {
                let (task, event) = ui::login::update(screen, message, &self.api);
                tasks.push(task.map(Message::Login));
                match event {
                    Some(ui::login::Event::Authenticated(auth)) => Effect::Authenticated(auth),
                    Some(ui::login::Event::Back) => Effect::ShowPortfolio,
                    None => Effect::None,
                }
            }
            (Screen::Admin(screen), Message::Admin(message)) => {
                let (task, event) = ui::admin::update(screen, message, &self.api);
                tasks.push(task.map(Message::Admin));
                match event {
                    Some(ui::admin::Event::Logout) => Effect::Logout,
                    Some(ui::admin::Event::ViewPortfolio) => Effect::ShowPortfolio,
                    None => Effect::None,
                }
            }
            (_, Message::OpenPortfolio) => Effect::ShowPortfolio,
            (_, Message::OpenAdmin) => Effect::ShowAdmin,
            (_, Message::SessionChecked(result)) => match result {
                Ok(()) => {
                    tracing::info!("stored session verified");
                    Effect::None
                }
                Err(err) if err.status == Some(401) => Effect::SessionInvalid,
                Err(err) => {
                    tracing::warn!("could not verify session: {}", err);
                    Effect::None
                }
            },
            (_, Message::ImageFetched(url, result)) => {
                match result {
                    Ok(handle) => self.images.insert(url, handle),
                    Err(err) => {
                        tracing::debug!("image fetch failed for {}: {}", url, err);
                        self.images.forget(&url);
                    }
                }
                Effect::None
            }
            _ => Effect::None,
        };

        self.apply(effect, &mut tasks);
        tasks.push(self.sync_images());
        Task::batch(tasks)
    }

    fn apply(&mut self, effect: Effect, tasks: &mut Vec<Task<Message>>) {
        match effect {
            Effect::None => {}
            Effect::ShowPortfolio => {
                let (screen, task) = ui::portfolio::State::new(&self.api);
                self.screen = Screen::Portfolio(screen);
                tasks.push(task.map(Message::Portfolio));
            }
            Effect::OpenWork(work_id) => {
                let (screen, task) = ui::work_gallery::State::new(&self.api, work_id);
                self.screen = Screen::WorkGallery(screen);
                tasks.push(task.map(Message::WorkGallery));
            }
            Effect::ShowAdmin => {
                // Already there: don't rebuild and lose drafts in
                // progress. Unauthenticated: the admin area is gated
                // behind the login screen.
                if matches!(self.screen, Screen::Admin(_)) {
                    return;
                }
                if self.session.is_authenticated() {
                    let (screen, task) = ui::admin::State::new(&self.api);
                    self.screen = Screen::Admin(screen);
                    tasks.push(task.map(Message::Admin));
                } else {
                    self.screen = Screen::Login(ui::login::State::new());
                }
            }
            Effect::Authenticated(auth) => {
                if let Err(err) = self.session.login(auth.token.clone(), auth.user) {
                    // The in-memory session still works for this run
                    tracing::warn!("could not persist session: {}", err);
                }
                self.api.set_token(Some(auth.token));
                let (screen, task) = ui::admin::State::new(&self.api);
                self.screen = Screen::Admin(screen);
                tasks.push(task.map(Message::Admin));
            }
            Effect::Logout => {
                self.session.logout();
                self.api.set_token(None);
                self.screen = Screen::Login(ui::login::State::new());
            }
            Effect::SessionInvalid => {
                tracing::info!("stored token rejected by the server, clearing session");
                self.session.logout();
                self.api.set_token(None);
                if matches!(self.screen, Screen::Admin(_)) {
                    self.screen = Screen::Login(ui::login::State::new());
                }
            }
        }
    }

    /// Fetch whichever images the active screen wants and doesn't
    /// have yet. Runs after every update; already-fetched and
    /// in-flight URLs are skipped.
    fn sync_images(&mut self) -> Task<Message> {
        let wanted: Vec<&str> = match &self.screen {
            Screen::Portfolio(screen) => screen.image_urls(),
            Screen::WorkGallery(screen) => screen.image_urls(),
            Screen::Admin(screen) => screen.image_urls(),
            Screen::Login(_) => Vec::new(),
        };
        let fresh = self.images.request(wanted.into_iter());

        let tasks: Vec<Task<Message>> = fresh
            .into_iter()
            .map(|url| {
                let api = self.api.clone();
                Task::perform(fetch_image(api, url), |(url, result)| {
                    Message::ImageFetched(url, result)
                })
            })
            .collect();
        Task::batch(tasks)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let screen = match &self.screen {
            Screen::Portfolio(screen) => {
                ui::portfolio::view(screen, &self.images).map(Message::Portfolio)
            }
            Screen::WorkGallery(screen) => {
                ui::work_gallery::view(screen, &self.images).map(Message::WorkGallery)
            }
            Screen::Login(screen) => ui::login::view(screen).map(Message::Login),
            Screen::Admin(screen) => ui::admin::view(screen, &self.images).map(Message::Admin),
        };

        column![self.top_bar(), screen].into()
    }

    fn top_bar(&self) -> Element<Message> {
        let admin_label = if self.session.is_authenticated() {
            "Admin"
        } else {
            "Admin login"
        };

        let mut bar = row![text("Portfolio Studio").size(16)]
            .spacing(8)
            .padding(10)
            .align_y(Alignment::Center);

        if let Some(user) = self.session.user() {
            bar = bar.push(ui::widgets::muted(format!("signed in as {}", user.username)).size(12));
        }

        bar.push(horizontal_space())
            .push(
                button(text("Portfolio").size(13))
                    .style(button::text)
                    .on_press(Message::OpenPortfolio),
            )
            .push(
                button(text(admin_label).size(13))
                    .style(button::text)
                    .on_press(Message::OpenAdmin),
            )
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

async fn fetch_image(api: ApiClient, url: String) -> (String, Result<Handle, RemoteError>) {
    let result = images::load_remote(api, url.clone()).await;
    (url, result)
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    iced::application(
        "Portfolio Studio",
        PortfolioStudio::update,
        PortfolioStudio::view,
    )
    .theme(PortfolioStudio::theme)
    .centered()
    .run_with(PortfolioStudio::new)
}
