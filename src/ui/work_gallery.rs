/// Per-work gallery screen
///
/// Opened from a portfolio tile: the work's title and description on
/// top, its photos in a grid below, and a lightbox with wrap-around
/// prev/next. The work itself comes from the works list (there is no
/// single-work endpoint); its photos come from the per-work photos
/// endpoint.

use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length, Task};

use crate::api::ApiClient;
use crate::images::ImageStore;
use crate::state::collection::{RemoteError, Tracked};
use crate::state::data::{Photo, Work};
use crate::ui::widgets::{self, BannerKind};

pub struct State {
    work_id: i64,
    /// The work's own record, once the works list arrives
    work: Option<Work>,
    photos: Tracked<Photo>,
    lightbox: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Message {
    WorkLoaded(Result<Option<Work>, RemoteError>),
    PhotosLoaded(u64, Result<Vec<Photo>, RemoteError>),
    Refresh,
    Open(usize),
    Close,
    Prev,
    Next,
    Back,
}

pub enum Event {
    Back,
}

impl State {
    pub fn new(api: &ApiClient, work_id: i64) -> (Self, Task<Message>) {
        let mut state = Self {
            work_id,
            work: None,
            photos: Tracked::new(),
            lightbox: None,
        };
        let task = state.reload(api);
        (state, task)
    }

    fn reload(&mut self, api: &ApiClient) -> Task<Message> {
        let generation = self.photos.begin();

        let photos_api = api.clone();
        let work_id = self.work_id;
        let photos = Task::perform(
            async move {
                photos_api
                    .work_photos(work_id)
                    .await
                    .map_err(RemoteError::from)
            },
            move |result| Message::PhotosLoaded(generation, result),
        );

        let works_api = api.clone();
        let work = Task::perform(
            async move {
                let works = works_api.list_works().await.map_err(RemoteError::from)?;
                Ok(works.into_iter().find(|work| work.id == work_id))
            },
            Message::WorkLoaded,
        );

        Task::batch([photos, work])
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.photos
            .items()
            .iter()
            .map(|photo| photo.url.as_str())
            .collect()
    }
}

pub fn update(
    state: &mut State,
    message: Message,
    api: &ApiClient,
) -> (Task<Message>, Option<Event>) {
    match message {
        Message::WorkLoaded(result) => {
            if let Ok(work) = result {
                state.work = work;
            }
            (Task::none(), None)
        }
        Message::PhotosLoaded(generation, result) => {
            // Photos render in their stored order within the work
            let result = result.map(|mut photos| {
                photos.sort_by_key(|photo| (photo.order, photo.id));
                photos
            });
            state.photos.resolve(generation, result);
            (Task::none(), None)
        }
        Message::Refresh => (state.reload(api), None),
        Message::Open(index) => {
            if index < state.photos.items().len() {
                state.lightbox = Some(index);
            }
            (Task::none(), None)
        }
        Message::Close => {
            state.lightbox = None;
            (Task::none(), None)
        }
        Message::Prev => {
            let len = state.photos.items().len();
            if let (Some(index), true) = (state.lightbox, len > 0) {
                state.lightbox = Some(if index == 0 { len - 1 } else { index - 1 });
            }
            (Task::none(), None)
        }
        Message::Next => {
            let len = state.photos.items().len();
            if let (Some(index), true) = (state.lightbox, len > 0) {
                state.lightbox = Some((index + 1) % len);
            }
            (Task::none(), None)
        }
        Message::Back => (Task::none(), Some(Event::Back)),
    }
}

pub fn view<'a>(state: &'a State, images: &'a ImageStore) -> Element<'a, Message> {
    if let Some(index) = state.lightbox {
        if let Some(photo) = state.photos.items().get(index) {
            return lightbox(photo, index, state.photos.items().len(), images);
        }
    }

    let mut content = column![header(state)].spacing(24).padding(32);

    if state.photos.is_loading() {
        content = content.push(widgets::muted("Loading gallery..."));
    } else if let Some(error) = state.photos.error() {
        content = content
            .push(widgets::banner(BannerKind::Error, error))
            .push(button("Retry").on_press(Message::Refresh));
    } else if state.photos.items().is_empty() {
        content = content.push(widgets::muted("No photos found in this work."));
    } else {
        let tiles = state
            .photos
            .items()
            .iter()
            .enumerate()
            .map(|(index, photo)| tile(photo, index, images))
            .collect();
        content = content.push(widgets::photo_grid(tiles));
    }

    scrollable(content.width(Length::Fill)).height(Length::Fill).into()
}

fn header(state: &State) -> Element<'_, Message> {
    let title = state
        .work
        .as_ref()
        .map(|work| work.title.as_str())
        .unwrap_or("Work gallery");

    let mut heading = column![text(title).size(36)].spacing(8).align_x(Alignment::Center);

    if let Some(description) = state.work.as_ref().and_then(|work| work.description.as_deref()) {
        heading = heading.push(widgets::muted(description).size(16));
    }

    let mut meta = row![].spacing(12);
    if let Some(category) = state.work.as_ref().and_then(|work| work.category_name.as_deref()) {
        meta = meta.push(widgets::muted(category).size(14));
    }
    meta = meta.push(widgets::muted(format!("{} photos", state.photos.items().len())).size(14));

    column![
        button("Back to portfolio").style(button::text).on_press(Message::Back),
        container(heading.push(meta)).width(Length::Fill).center_x(Length::Fill),
    ]
    .spacing(16)
    .into()
}

fn tile<'a>(photo: &'a Photo, index: usize, images: &'a ImageStore) -> Element<'a, Message> {
    button(
        column![
            widgets::photo_tile(images.get(&photo.url), 240.0, 240.0),
            text(&photo.title).size(13),
        ]
        .spacing(4),
    )
    .style(button::text)
    .padding(0)
    .on_press(Message::Open(index))
    .into()
}

fn lightbox<'a>(
    photo: &'a Photo,
    index: usize,
    total: usize,
    images: &'a ImageStore,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match images.get(&photo.url) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(iced::ContentFit::Contain)
            .into(),
        None => container(widgets::muted("Loading photo..."))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    let mut details = column![text(&photo.title).size(18)]
        .spacing(8)
        .align_x(Alignment::Center);
    if let Some(description) = photo.description.as_deref() {
        details = details.push(widgets::muted(description).size(14));
    }

    let mut controls = row![].spacing(12);
    if total > 1 {
        controls = controls.push(button("Previous").on_press(Message::Prev));
    }
    controls = controls.push(button("Close").style(button::secondary).on_press(Message::Close));
    if total > 1 {
        controls = controls.push(button("Next").on_press(Message::Next));
    }

    container(
        column![
            picture,
            details,
            widgets::muted(format!("{} / {}", index + 1, total)),
            controls,
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .padding(24)
    .into()
}
