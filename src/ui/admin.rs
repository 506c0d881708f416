/// Admin dashboard
///
/// Owns the admin-side collections (photos, works, categories), the
/// statistics tiles, the API health line, and the two tabs (upload,
/// manage). A finished upload reloads photos and works, so the manage
/// tab and the tiles pick up the new photos and any cover changes.

use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length, Task};

use crate::api::ApiClient;
use crate::images::ImageStore;
use crate::state::collection::{RemoteError, Tracked};
use crate::state::data::{Category, Health, Photo, Work};
use crate::state::derive;
use crate::ui::widgets::{self, BannerKind};
use crate::ui::{manage, upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Manage,
}

pub struct State {
    tab: Tab,
    photos: Tracked<Photo>,
    works: Tracked<Work>,
    categories: Tracked<Category>,
    health: Option<Result<Health, String>>,
    upload: upload::State,
    manage: manage::State,
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    PhotosLoaded(u64, Result<Vec<Photo>, RemoteError>),
    WorksLoaded(u64, Result<Vec<Work>, RemoteError>),
    CategoriesLoaded(u64, Result<Vec<Category>, RemoteError>),
    HealthLoaded(Result<Health, RemoteError>),
    Upload(upload::Message),
    Manage(manage::Message),
    Logout,
    ViewPortfolio,
}

pub enum Event {
    Logout,
    ViewPortfolio,
}

impl State {
    pub fn new(api: &ApiClient) -> (Self, Task<Message>) {
        let mut state = Self {
            tab: Tab::Upload,
            photos: Tracked::new(),
            works: Tracked::new(),
            categories: Tracked::new(),
            health: None,
            upload: upload::State::new(),
            manage: manage::State::new(),
        };

        let health_api = api.clone();
        let health = Task::perform(
            async move { health_api.health().await.map_err(RemoteError::from) },
            Message::HealthLoaded,
        );

        let task = Task::batch([
            state.reload_photos(api),
            state.reload_works(api),
            state.reload_categories(api),
            health,
        ]);
        (state, task)
    }

    fn reload_photos(&mut self, api: &ApiClient) -> Task<Message> {
        let generation = self.photos.begin();
        let api = api.clone();
        Task::perform(
            async move { api.list_photos().await.map_err(RemoteError::from) },
            move |result| Message::PhotosLoaded(generation, result),
        )
    }

    fn reload_works(&mut self, api: &ApiClient) -> Task<Message> {
        let generation = self.works.begin();
        let api = api.clone();
        Task::perform(
            async move { api.list_works().await.map_err(RemoteError::from) },
            move |result| Message::WorksLoaded(generation, result),
        )
    }

    fn reload_categories(&mut self, api: &ApiClient) -> Task<Message> {
        let generation = self.categories.begin();
        let api = api.clone();
        Task::perform(
            async move { api.list_categories().await.map_err(RemoteError::from) },
            move |result| Message::CategoriesLoaded(generation, result),
        )
    }

    /// Every image URL the admin screens want rendered.
    pub fn image_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self
            .photos
            .items()
            .iter()
            .map(|photo| photo.url.as_str())
            .collect();
        urls.extend(
            self.works
                .items()
                .iter()
                .filter_map(|work| work.cover_photo_url.as_deref()),
        );
        urls
    }
}

pub fn update(
    state: &mut State,
    message: Message,
    api: &ApiClient,
) -> (Task<Message>, Option<Event>) {
    match message {
        Message::TabSelected(tab) => {
            state.tab = tab;
            (Task::none(), None)
        }
        Message::PhotosLoaded(generation, result) => {
            state.photos.resolve(generation, result);
            (Task::none(), None)
        }
        Message::WorksLoaded(generation, result) => {
            state.works.resolve(generation, result);
            (Task::none(), None)
        }
        Message::CategoriesLoaded(generation, result) => {
            state.categories.resolve(generation, result);
            (Task::none(), None)
        }
        Message::HealthLoaded(result) => {
            state.health = Some(result.map_err(|err| err.message));
            (Task::none(), None)
        }
        Message::Upload(message) => {
            let (task, event) = upload::update(&mut state.upload, message, api);
            let mut tasks = vec![task.map(Message::Upload)];
            if let Some(upload::Event::Uploaded(created)) = event {
                tracing::info!("{} photos uploaded, refreshing collections", created.len());
                // New photos and possibly new covers: reload both.
                tasks.push(state.reload_photos(api));
                tasks.push(state.reload_works(api));
            }
            (Task::batch(tasks), None)
        }
        Message::Manage(message) => {
            let (task, events) = manage::update(
                &mut state.manage,
                message,
                api,
                &mut state.photos,
                &mut state.works,
                state.categories.items(),
            );
            let mut tasks = vec![task.map(Message::Manage)];
            for event in events {
                match event {
                    manage::Event::ReloadWorks => tasks.push(state.reload_works(api)),
                    manage::Event::ReloadPhotos => tasks.push(state.reload_photos(api)),
                }
            }
            (Task::batch(tasks), None)
        }
        Message::Logout => (Task::none(), Some(Event::Logout)),
        Message::ViewPortfolio => (Task::none(), Some(Event::ViewPortfolio)),
    }
}

pub fn view<'a>(state: &'a State, images: &'a ImageStore) -> Element<'a, Message> {
    let header = row![
        container(text("Admin dashboard").size(24)).width(Length::Fill),
        button(text("View portfolio").size(13))
            .style(button::secondary)
            .on_press(Message::ViewPortfolio),
        button(text("Log out").size(13))
            .style(button::danger)
            .on_press(Message::Logout),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let content = column![
        header,
        health_line(state),
        stat_tiles(state),
        tab_bar(state.tab),
        match state.tab {
            Tab::Upload => upload::view(
                &state.upload,
                state.works.items(),
                state.categories.items(),
            )
            .map(Message::Upload),
            Tab::Manage => manage::view(
                &state.manage,
                &state.photos,
                &state.works,
                state.categories.items(),
                images,
            )
            .map(Message::Manage),
        },
    ]
    .spacing(20)
    .padding(24)
    .width(Length::Fill);

    scrollable(content).height(Length::Fill).into()
}

fn health_line(state: &State) -> Element<'_, Message> {
    match &state.health {
        None => widgets::muted("Checking API...").size(13).into(),
        Some(Ok(health)) => {
            let mut line = format!("API online: {}", health.message);
            if !health.jwt_configured {
                line.push_str(" (auth not configured)");
            }
            if !health.database_configured {
                line.push_str(" (database not configured)");
            }
            widgets::muted(line).size(13).into()
        }
        Some(Err(message)) => {
            widgets::banner(BannerKind::Warning, format!("API unreachable: {}", message))
        }
    }
}

fn stat_tiles(state: &State) -> Element<'_, Message> {
    let loading = state.photos.is_loading() || state.works.is_loading();
    let stats = derive::stats(state.photos.items(), state.works.items());

    let tile = |label: &'static str, value: usize| -> Element<'static, Message> {
        let value_text = if loading {
            text("...").size(28)
        } else {
            text(value.to_string()).size(28)
        };
        container(
            column![value_text, widgets::muted(label).size(12)]
                .spacing(4)
                .align_x(Alignment::Center),
        )
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
    };

    row![
        tile("Photos", stats.total_photos),
        tile("Works", stats.total_works),
        tile("Featured", stats.featured_photos),
        tile("Unassigned", stats.unassigned_photos),
        tile("Categories", stats.categories),
    ]
    .spacing(12)
    .into()
}

fn tab_bar<'a>(active: Tab) -> Element<'a, Message> {
    let tab = |label: &'static str, tab: Tab| -> Element<'static, Message> {
        let base = button(text(label).size(14)).padding(10);
        if tab == active {
            base.style(button::primary).into()
        } else {
            base.style(button::text)
                .on_press(Message::TabSelected(tab))
                .into()
        }
    };

    row![
        tab("Upload photos", Tab::Upload),
        tab("Works & photos", Tab::Manage),
    ]
    .spacing(8)
    .into()
}
