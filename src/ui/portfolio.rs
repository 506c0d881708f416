/// Public portfolio screen
///
/// Hero header, category filter pills, the gallery grid, an about
/// blurb and the contact form. Gallery tiles come from published
/// works (cover photo + count); when no works exist yet the grid
/// falls back to individually uploaded photos. Tiles that belong to a
/// work open the work's own gallery; loose tiles open a lightbox.

use iced::widget::{button, column, container, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Task};

use crate::api::ApiClient;
use crate::images::ImageStore;
use crate::state::collection::{first_non_empty, RemoteError, Tracked};
use crate::state::derive::{self, CategoryFilter, GalleryCard};
use crate::state::forms::ContactForm;
use crate::ui::widgets::{self, BannerKind};

pub struct State {
    cards: Tracked<GalleryCard>,
    filter: CategoryFilter,
    /// Index into the filtered card list while the lightbox is open
    lightbox: Option<usize>,
    contact: ContactForm,
}

#[derive(Debug, Clone)]
pub enum Message {
    CardsLoaded(u64, Result<Vec<GalleryCard>, RemoteError>),
    Refresh,
    SetFilter(CategoryFilter),
    OpenCard(usize),
    CloseLightbox,
    LightboxPrev,
    LightboxNext,
    ContactName(String),
    ContactEmail(String),
    ContactBody(String),
    ContactSubmit,
    ContactSettled(Result<String, RemoteError>),
}

/// What this screen asks the application to do
pub enum Event {
    OpenWork(i64),
}

impl State {
    pub fn new(api: &ApiClient) -> (Self, Task<Message>) {
        let mut state = Self {
            cards: Tracked::new(),
            filter: CategoryFilter::All,
            lightbox: None,
            contact: ContactForm::default(),
        };
        let task = state.reload(api);
        (state, task)
    }

    fn reload(&mut self, api: &ApiClient) -> Task<Message> {
        let generation = self.cards.begin();
        let api = api.clone();
        Task::perform(load_cards(api), move |result| {
            Message::CardsLoaded(generation, result)
        })
    }

    /// Cards matching the active filter, in load order.
    fn filtered(&self) -> Vec<&GalleryCard> {
        derive::filter_by_category(self.cards.items(), &self.filter)
    }

    /// Every image URL this screen wants rendered.
    pub fn image_urls(&self) -> Vec<&str> {
        self.cards.items().iter().map(|card| card.url.as_str()).collect()
    }
}

/// Works drive the public gallery; individual photos are the fallback
/// when none are published (or the works endpoint 404s).
async fn load_cards(api: ApiClient) -> Result<Vec<GalleryCard>, RemoteError> {
    first_non_empty(
        async {
            let works = api.list_works().await?;
            Ok(derive::work_cards(&works))
        },
        async {
            let photos = api.list_photos().await?;
            Ok(derive::photo_cards(&photos))
        },
    )
    .await
    .map_err(RemoteError::from)
}

async fn send_contact(
    api: ApiClient,
    name: String,
    email: String,
    body: String,
) -> Result<String, RemoteError> {
    let message = crate::api::endpoints::ContactMessage {
        name,
        email,
        message: body,
    };
    let response = api.send_contact(&message).await.map_err(RemoteError::from)?;
    Ok(response
        .message
        .unwrap_or_else(|| "Message sent. Thank you!".to_string()))
}

pub fn update(
    state: &mut State,
    message: Message,
    api: &ApiClient,
) -> (Task<Message>, Option<Event>) {
    match message {
        Message::CardsLoaded(generation, result) => {
            state.cards.resolve(generation, result);
            (Task::none(), None)
        }
        Message::Refresh => (state.reload(api), None),
        Message::SetFilter(filter) => {
            state.filter = filter;
            state.lightbox = None;
            (Task::none(), None)
        }
        Message::OpenCard(index) => {
            let filtered = state.filtered();
            let Some(card) = filtered.get(index) else {
                return (Task::none(), None);
            };
            match card.work_id {
                Some(work_id) => (Task::none(), Some(Event::OpenWork(work_id))),
                None => {
                    state.lightbox = Some(index);
                    (Task::none(), None)
                }
            }
        }
        Message::CloseLightbox => {
            state.lightbox = None;
            (Task::none(), None)
        }
        Message::LightboxPrev => {
            let len = state.filtered().len();
            if let (Some(index), true) = (state.lightbox, len > 0) {
                state.lightbox = Some(if index == 0 { len - 1 } else { index - 1 });
            }
            (Task::none(), None)
        }
        Message::LightboxNext => {
            let len = state.filtered().len();
            if let (Some(index), true) = (state.lightbox, len > 0) {
                state.lightbox = Some((index + 1) % len);
            }
            (Task::none(), None)
        }
        Message::ContactName(value) => {
            state.contact.name = value;
            (Task::none(), None)
        }
        Message::ContactEmail(value) => {
            state.contact.email = value;
            (Task::none(), None)
        }
        Message::ContactBody(value) => {
            state.contact.message = value;
            (Task::none(), None)
        }
        Message::ContactSubmit => {
            if !state.contact.begin_submit() {
                return (Task::none(), None);
            }
            let task = Task::perform(
                send_contact(
                    api.clone(),
                    state.contact.name.trim().to_string(),
                    state.contact.email.trim().to_string(),
                    state.contact.message.trim().to_string(),
                ),
                Message::ContactSettled,
            );
            (task, None)
        }
        Message::ContactSettled(result) => {
            match result {
                Ok(confirmation) => state.contact.succeed(confirmation),
                Err(err) => state.contact.fail(err.message),
            }
            (Task::none(), None)
        }
    }
}

pub fn view<'a>(state: &'a State, images: &'a ImageStore) -> Element<'a, Message> {
    if let Some(index) = state.lightbox {
        if let Some(card) = state.filtered().get(index).copied() {
            return lightbox(card, index, state.filtered().len(), images);
        }
    }

    let content = column![
        hero(),
        gallery(state, images),
        about(),
        contact(&state.contact),
        footer(),
    ]
    .spacing(48)
    .padding(32)
    .width(Length::Fill);

    scrollable(content).height(Length::Fill).into()
}

fn hero<'a>() -> Element<'a, Message> {
    container(
        column![
            text("Capturing Moments").size(48),
            widgets::muted("Professional photography that tells unique stories").size(20),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .center_x(Length::Fill)
    .padding(40)
    .into()
}

fn gallery<'a>(state: &'a State, images: &'a ImageStore) -> Element<'a, Message> {
    let mut section = column![text("My Work").size(32)]
        .spacing(20)
        .align_x(Alignment::Center)
        .width(Length::Fill);

    section = section.push(filter_pills(state));

    if state.cards.is_loading() {
        return section.push(widgets::muted("Loading photos...")).into();
    }
    if let Some(error) = state.cards.error() {
        return section
            .push(widgets::banner(BannerKind::Error, error))
            .push(button("Retry").on_press(Message::Refresh))
            .into();
    }

    let filtered = state.filtered();
    if filtered.is_empty() {
        return section
            .push(widgets::muted("No photos found in this category."))
            .into();
    }

    let tiles = filtered
        .iter()
        .enumerate()
        .map(|(index, card)| card_tile(card, index, images))
        .collect();
    section.push(widgets::photo_grid(tiles)).into()
}

fn filter_pills(state: &State) -> Element<'_, Message> {
    let mut pills = row![].spacing(8);

    pills = pills.push(pill("All", state.filter == CategoryFilter::All, CategoryFilter::All));
    for slug in derive::distinct_categories(state.cards.items()) {
        let active = state.filter == CategoryFilter::Slug(slug.clone());
        let label = slug.clone();
        pills = pills.push(pill(&label, active, CategoryFilter::Slug(slug)));
    }

    container(pills).center_x(Length::Fill).into()
}

fn pill<'a>(label: &str, active: bool, filter: CategoryFilter) -> Element<'a, Message> {
    let base = button(text(label.to_string()).size(14))
        .padding(8)
        .on_press(Message::SetFilter(filter));
    if active {
        base.style(button::primary).into()
    } else {
        base.style(button::secondary).into()
    }
}

fn card_tile<'a>(card: &'a GalleryCard, index: usize, images: &'a ImageStore) -> Element<'a, Message> {
    let mut caption = row![text(&card.title).size(14)].spacing(8);
    if card.photo_count > 1 {
        caption = caption.push(widgets::muted(format!("{} photos", card.photo_count)).size(12));
    }

    button(
        column![
            widgets::photo_tile(images.get(&card.url), 280.0, 280.0),
            caption,
        ]
        .spacing(6),
    )
    .style(button::text)
    .padding(0)
    .on_press(Message::OpenCard(index))
    .into()
}

fn lightbox<'a>(
    card: &GalleryCard,
    index: usize,
    total: usize,
    images: &'a ImageStore,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match images.get(&card.url) {
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

    let controls = row![
        button("Previous").on_press(Message::LightboxPrev),
        button("Close").style(button::secondary).on_press(Message::CloseLightbox),
        button("Next").on_press(Message::LightboxNext),
    ]
    .spacing(12);

    container(
        column![
            picture,
            text(card.title.clone()).size(18),
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

fn about<'a>() -> Element<'a, Message> {
    column![
        text("About Me").size(32),
        text(
            "I'm a photographer driven by the mission of turning moments into \
             lasting memories. With years of experience across portrait sessions, \
             shows and events, I look for the angles, light and perspectives that \
             tell each story best.",
        )
        .size(16),
    ]
    .spacing(12)
    .max_width(720)
    .into()
}

fn contact(form: &ContactForm) -> Element<'_, Message> {
    let mut section = column![text("Get in Touch").size(32)]
        .spacing(12)
        .max_width(520);

    if let Some(confirmation) = &form.sent {
        section = section.push(widgets::banner(BannerKind::Success, confirmation));
    }
    if let Some(error) = form.state.error() {
        section = section.push(widgets::banner(BannerKind::Error, error));
    }

    let submitting = form.state.is_submitting();
    let submit_label = if submitting { "Sending..." } else { "Send message" };
    let mut submit = button(text(submit_label).size(14)).padding(10);
    if !submitting {
        submit = submit.on_press(Message::ContactSubmit);
    }

    section
        .push(text_input("Your name", &form.name).on_input(Message::ContactName).padding(8))
        .push(
            text_input("you@example.com", &form.email)
                .on_input(Message::ContactEmail)
                .padding(8),
        )
        .push(
            text_input("Tell me about your project...", &form.message)
                .on_input(Message::ContactBody)
                .on_submit(Message::ContactSubmit)
                .padding(8),
        )
        .push(submit)
        .into()
}

fn footer<'a>() -> Element<'a, Message> {
    container(widgets::muted("Photography portfolio. All rights reserved."))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(16)
        .into()
}
