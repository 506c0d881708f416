/// Works & photos manager tab
///
/// Create works, expand them to see and edit their photos, and keep a
/// separate section for photos that belong to no work yet. Deletes go
/// through an inline confirmation bar. Mutations reconcile the loaded
/// collections in place; the lists never flash back to a loader. Only
/// the cross-entity effects of deleting a work (its photos becoming
/// unassigned server-side) trigger a reload, which the admin screen
/// owns.

use std::collections::HashSet;

use iced::widget::{button, checkbox, column, container, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length, Task};

use crate::api::endpoints::PhotoUpdate;
use crate::api::ApiClient;
use crate::images::ImageStore;
use crate::state::collection::{RemoteError, Tracked};
use crate::state::data::{Category, Photo, Work};
use crate::state::derive;
use crate::state::forms::{PhotoEditForm, WorkForm};
use crate::ui::widgets::{
    self, category_choices, category_selection, work_choices, work_selection, BannerKind,
    CategoryChoice, Notice, WorkChoice,
};

/// A destructive action awaiting its confirmation click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Work(i64),
    Photo(i64),
}

pub struct State {
    expanded: HashSet<i64>,
    work_form: WorkForm,
    editing: Option<PhotoEditForm>,
    pending_delete: Option<PendingDelete>,
    banner: Option<Notice>,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Create-work form
    FormTitle(String),
    FormDescription(String),
    FormCategory(CategoryChoice),
    FormFeatured(bool),
    FormSubmit,
    WorkCreated(Result<(), RemoteError>),
    // List interactions
    ToggleWork(i64),
    ExpandAll,
    CollapseAll,
    Refresh,
    // Deletes
    AskDeleteWork(i64),
    AskDeletePhoto(i64),
    ConfirmDelete,
    CancelDelete,
    WorkDeleted(i64, Result<(), RemoteError>),
    PhotoDeleted(i64, Result<(), RemoteError>),
    // Photo edit
    EditPhoto(i64),
    EditTitle(String),
    EditDescription(String),
    EditCategory(CategoryChoice),
    EditWork(WorkChoice),
    EditFeatured(bool),
    EditSubmit,
    EditSaved(PhotoUpdate, Result<(), RemoteError>),
    EditCancel,
    DismissBanner,
}

/// Reloads this tab needs but the admin screen owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ReloadWorks,
    ReloadPhotos,
}

impl State {
    pub fn new() -> Self {
        Self {
            expanded: HashSet::new(),
            work_form: WorkForm::default(),
            editing: None,
            pending_delete: None,
            banner: None,
        }
    }
}

pub fn update(
    state: &mut State,
    message: Message,
    api: &ApiClient,
    photos: &mut Tracked<Photo>,
    works: &mut Tracked<Work>,
    categories: &[Category],
) -> (Task<Message>, Vec<Event>) {
    match message {
        Message::FormTitle(value) => {
            state.work_form.title = value;
            (Task::none(), Vec::new())
        }
        Message::FormDescription(value) => {
            state.work_form.description = value;
            (Task::none(), Vec::new())
        }
        Message::FormCategory(choice) => {
            state.work_form.category_id = choice.id;
            (Task::none(), Vec::new())
        }
        Message::FormFeatured(value) => {
            state.work_form.is_featured = value;
            (Task::none(), Vec::new())
        }
        Message::FormSubmit => {
            if !state.work_form.begin_submit() {
                return (Task::none(), Vec::new());
            }
            let request = state.work_form.to_request();
            let api = api.clone();
            let task = Task::perform(
                async move { api.create_work(&request).await.map_err(RemoteError::from) },
                Message::WorkCreated,
            );
            (task, Vec::new())
        }
        Message::WorkCreated(result) => match result {
            Ok(()) => {
                // The server assigns the id and cover, so reload
                // instead of inserting optimistically.
                state.work_form.clear();
                state.banner = Some(Notice::success("Work created."));
                (Task::none(), vec![Event::ReloadWorks])
            }
            Err(err) => {
                state.work_form.fail(err.message);
                (Task::none(), Vec::new())
            }
        },
        Message::ToggleWork(id) => {
            if !state.expanded.remove(&id) {
                state.expanded.insert(id);
            }
            (Task::none(), Vec::new())
        }
        Message::ExpandAll => {
            state.expanded = works.items().iter().map(|work| work.id).collect();
            (Task::none(), Vec::new())
        }
        Message::CollapseAll => {
            state.expanded.clear();
            (Task::none(), Vec::new())
        }
        Message::Refresh => (Task::none(), vec![Event::ReloadWorks, Event::ReloadPhotos]),
        Message::AskDeleteWork(id) => {
            state.pending_delete = Some(PendingDelete::Work(id));
            (Task::none(), Vec::new())
        }
        Message::AskDeletePhoto(id) => {
            state.pending_delete = Some(PendingDelete::Photo(id));
            (Task::none(), Vec::new())
        }
        Message::CancelDelete => {
            state.pending_delete = None;
            (Task::none(), Vec::new())
        }
        Message::ConfirmDelete => {
            let Some(pending) = state.pending_delete.take() else {
                return (Task::none(), Vec::new());
            };
            let api = api.clone();
            let task = match pending {
                PendingDelete::Work(id) => Task::perform(
                    async move { api.delete_work(id).await.map_err(RemoteError::from) },
                    move |result| Message::WorkDeleted(id, result),
                ),
                PendingDelete::Photo(id) => Task::perform(
                    async move { api.delete_photo(id).await.map_err(RemoteError::from) },
                    move |result| Message::PhotoDeleted(id, result),
                ),
            };
            (task, Vec::new())
        }
        Message::WorkDeleted(id, result) => match result {
            Ok(()) => {
                works.remove(id);
                state.expanded.remove(&id);
                state.banner = Some(Notice::success(
                    "Work deleted. Its photos were kept and are now unassigned.",
                ));
                // The server detached this work's photos; our copies
                // still carry the stale work_id until reloaded.
                (Task::none(), vec![Event::ReloadPhotos])
            }
            Err(err) if err.is_not_found() => {
                works.remove(id);
                state.expanded.remove(&id);
                state.banner = Some(Notice::info("That work was already deleted."));
                (Task::none(), vec![Event::ReloadPhotos])
            }
            Err(err) => {
                state.banner = Some(Notice::error(format!("Could not delete work: {}", err)));
                (Task::none(), Vec::new())
            }
        },
        Message::PhotoDeleted(id, result) => match result {
            Ok(()) => {
                photos.remove(id);
                (Task::none(), Vec::new())
            }
            Err(err) if err.is_not_found() => {
                photos.remove(id);
                state.banner = Some(Notice::info("That photo was already deleted."));
                (Task::none(), Vec::new())
            }
            Err(err) => {
                state.banner = Some(Notice::error(format!("Could not delete photo: {}", err)));
                (Task::none(), Vec::new())
            }
        },
        Message::EditPhoto(id) => {
            if let Some(photo) = photos.items().iter().find(|photo| photo.id == id) {
                state.editing = Some(PhotoEditForm::from_photo(photo));
            }
            (Task::none(), Vec::new())
        }
        Message::EditTitle(value) => {
            if let Some(form) = &mut state.editing {
                form.title = value;
            }
            (Task::none(), Vec::new())
        }
        Message::EditDescription(value) => {
            if let Some(form) = &mut state.editing {
                form.description = value;
            }
            (Task::none(), Vec::new())
        }
        Message::EditCategory(choice) => {
            if let Some(form) = &mut state.editing {
                form.category_id = choice.id;
            }
            (Task::none(), Vec::new())
        }
        Message::EditWork(choice) => {
            if let Some(form) = &mut state.editing {
                form.work_id = choice.id;
            }
            (Task::none(), Vec::new())
        }
        Message::EditFeatured(value) => {
            if let Some(form) = &mut state.editing {
                form.is_featured = value;
            }
            (Task::none(), Vec::new())
        }
        Message::EditSubmit => {
            let Some(form) = &mut state.editing else {
                return (Task::none(), Vec::new());
            };
            if !form.begin_submit() {
                return (Task::none(), Vec::new());
            }
            let update = form.to_request();
            let api = api.clone();
            let request = update.clone();
            let task = Task::perform(
                async move { api.update_photo(&request).await.map_err(RemoteError::from) },
                move |result| Message::EditSaved(update.clone(), result),
            );
            (task, Vec::new())
        }
        Message::EditSaved(update, result) => match result {
            Ok(()) => {
                // Patch the one photo in place, refreshing the
                // denormalized category fields from the lookup table.
                let category = update
                    .category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id));
                photos.patch(update.id, |photo| {
                    photo.title = update.title.clone();
                    photo.description = if update.description.is_empty() {
                        None
                    } else {
                        Some(update.description.clone())
                    };
                    photo.category_id = update.category_id;
                    photo.category_name = category.map(|c| c.name.clone());
                    photo.category_slug = category.and_then(|c| c.slug.clone());
                    photo.work_id = update.work_id;
                    photo.is_featured = update.is_featured;
                });
                state.editing = None;
                state.banner = Some(Notice::success("Photo updated."));
                (Task::none(), Vec::new())
            }
            Err(err) => {
                if let Some(form) = &mut state.editing {
                    form.fail(err.message);
                }
                (Task::none(), Vec::new())
            }
        },
        Message::EditCancel => {
            state.editing = None;
            (Task::none(), Vec::new())
        }
        Message::DismissBanner => {
            state.banner = None;
            (Task::none(), Vec::new())
        }
    }
}

pub fn view<'a>(
    state: &'a State,
    photos: &'a Tracked<Photo>,
    works: &'a Tracked<Work>,
    categories: &'a [Category],
    images: &'a ImageStore,
) -> Element<'a, Message> {
    let mut content = column![].spacing(20);

    if let Some(notice) = &state.banner {
        content = content.push(
            row![
                container(widgets::banner(notice.kind, &notice.text)).width(Length::Fill),
                button(text("Dismiss").size(13))
                    .style(button::text)
                    .on_press(Message::DismissBanner),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        );
    }

    if let Some(pending) = state.pending_delete {
        content = content.push(confirm_bar(pending));
    }

    if let Some(form) = &state.editing {
        content = content.push(edit_panel(form, works.items(), categories));
    }

    content = content.push(create_work_panel(&state.work_form, categories));

    if photos.is_loading() || works.is_loading() {
        content = content.push(widgets::muted("Loading works..."));
        return content.into();
    }
    if let Some(error) = works.error().or_else(|| photos.error()) {
        content = content
            .push(widgets::banner(BannerKind::Error, error))
            .push(button("Retry").on_press(Message::Refresh));
        return content.into();
    }

    content = content.push(works_header(works.items().len()));

    if works.items().is_empty() {
        content = content.push(widgets::muted(
            "No works yet. Create the first one to start organizing photos.",
        ));
    } else {
        for work in works.items() {
            content = content.push(work_row(state, work, photos.items(), images));
        }
    }

    let loose = derive::unassigned(photos.items());
    if !loose.is_empty() {
        content = content.push(text(format!("Photos without a work ({})", loose.len())).size(18));
        content = content.push(widgets::muted(
            "Uploaded photos that are not part of any work yet.",
        ));
        let cards = loose
            .into_iter()
            .map(|photo| photo_card(photo, images))
            .collect();
        content = content.push(widgets::photo_grid(cards));
    }

    content.into()
}

fn confirm_bar<'a>(pending: PendingDelete) -> Element<'a, Message> {
    let prompt = match pending {
        PendingDelete::Work(_) => {
            "Delete this work? Its photos will be kept but left without a work."
        }
        PendingDelete::Photo(_) => "Delete this photo? This cannot be undone.",
    };
    container(
        row![
            container(text(prompt).size(14)).width(Length::Fill),
            button(text("Delete").size(13))
                .style(button::danger)
                .on_press(Message::ConfirmDelete),
            button(text("Cancel").size(13))
                .style(button::secondary)
                .on_press(Message::CancelDelete),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

fn create_work_panel<'a>(form: &'a WorkForm, categories: &'a [Category]) -> Element<'a, Message> {
    let submitting = form.state.is_submitting();

    let mut panel = column![
        text("Create new work").size(16),
        widgets::muted("Group your photos into themed works.").size(13),
    ]
    .spacing(10);

    if let Some(error) = form.state.error() {
        panel = panel.push(widgets::banner(BannerKind::Error, error));
    }

    let submit_label = if submitting { "Creating..." } else { "Create work" };
    let mut submit = button(text(submit_label).size(14)).padding(10);
    if !submitting {
        submit = submit.on_press(Message::FormSubmit);
    }

    panel = panel
        .push(
            row![
                text_input("e.g. Spring Session 2026", &form.title)
                    .on_input(Message::FormTitle)
                    .padding(8),
                pick_list(
                    category_choices(categories),
                    Some(category_selection(categories, form.category_id)),
                    Message::FormCategory,
                ),
            ]
            .spacing(12),
        )
        .push(
            text_input("Describe the work...", &form.description)
                .on_input(Message::FormDescription)
                .padding(8),
        )
        .push(
            row![
                checkbox("Featured work", form.is_featured).on_toggle(Message::FormFeatured),
                submit,
            ]
            .spacing(16)
            .align_y(Alignment::Center),
        );

    container(panel)
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn works_header<'a>(count: usize) -> Element<'a, Message> {
    row![
        container(text(format!("Works and photos ({} works)", count)).size(18))
            .width(Length::Fill),
        button(text("Expand all").size(13))
            .style(button::secondary)
            .on_press(Message::ExpandAll),
        button(text("Collapse all").size(13))
            .style(button::secondary)
            .on_press(Message::CollapseAll),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn work_row<'a>(
    state: &'a State,
    work: &'a Work,
    photos: &'a [Photo],
    images: &'a ImageStore,
) -> Element<'a, Message> {
    let expanded = state.expanded.contains(&work.id);
    let in_work = derive::for_work(photos, work.id);

    let cover: Element<'a, Message> = match &work.cover_photo_url {
        Some(url) => widgets::photo_tile(images.get(url), 48.0, 48.0),
        None => widgets::photo_tile(None, 48.0, 48.0),
    };

    let mut title_line = row![text(&work.title).size(15)].spacing(8);
    if work.is_featured {
        title_line = title_line.push(widgets::muted("Featured").size(12));
    }

    let mut summary = column![title_line].spacing(2);
    if let Some(description) = work.description.as_deref() {
        summary = summary.push(widgets::muted(description).size(12));
    }

    let toggle_label = if expanded { "Hide photos" } else { "Show photos" };

    let header = row![
        cover,
        container(summary).width(Length::Fill),
        widgets::muted(work.category_name.as_deref().unwrap_or("No category")).size(13),
        widgets::muted(format!("{} photos", in_work.len())).size(13),
        button(text(toggle_label).size(13))
            .style(button::secondary)
            .on_press(Message::ToggleWork(work.id)),
        button(text("Delete").size(13))
            .style(button::danger)
            .on_press(Message::AskDeleteWork(work.id)),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut body = column![header].spacing(12);

    if expanded {
        if in_work.is_empty() {
            body = body.push(widgets::muted(
                "No photos in this work. Upload photos and assign them here.",
            ));
        } else {
            let cards = in_work
                .into_iter()
                .map(|photo| photo_card(photo, images))
                .collect();
            body = body.push(widgets::photo_grid(cards));
        }
    }

    container(body)
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn photo_card<'a>(photo: &'a Photo, images: &'a ImageStore) -> Element<'a, Message> {
    let mut caption = row![
        container(text(&photo.title).size(13)).width(Length::Fill),
    ]
    .spacing(6)
    .align_y(Alignment::Center);
    if photo.is_featured {
        caption = caption.push(widgets::muted("Featured").size(11));
    }

    column![
        widgets::photo_tile(images.get(&photo.url), 160.0, 120.0),
        caption,
        widgets::muted(photo.category_name.as_deref().unwrap_or("No category")).size(11),
        row![
            button(text("Edit").size(12))
                .style(button::secondary)
                .on_press(Message::EditPhoto(photo.id)),
            button(text("Delete").size(12))
                .style(button::danger)
                .on_press(Message::AskDeletePhoto(photo.id)),
        ]
        .spacing(6),
    ]
    .spacing(4)
    .width(Length::Fixed(160.0))
    .into()
}

fn edit_panel<'a>(
    form: &'a PhotoEditForm,
    works: &'a [Work],
    categories: &'a [Category],
) -> Element<'a, Message> {
    let submitting = form.state.is_submitting();

    let mut panel = column![text("Edit photo").size(16)].spacing(10);

    if let Some(error) = form.state.error() {
        panel = panel.push(widgets::banner(BannerKind::Error, error));
    }

    let save_label = if submitting { "Saving..." } else { "Save changes" };
    let mut save = button(text(save_label).size(14)).padding(10);
    if !submitting {
        save = save.on_press(Message::EditSubmit);
    }

    panel = panel
        .push(
            text_input("Title", &form.title)
                .on_input(Message::EditTitle)
                .padding(8),
        )
        .push(
            text_input("Description", &form.description)
                .on_input(Message::EditDescription)
                .padding(8),
        )
        .push(
            row![
                pick_list(
                    category_choices(categories),
                    Some(category_selection(categories, form.category_id)),
                    Message::EditCategory,
                ),
                pick_list(
                    work_choices(works),
                    Some(work_selection(works, form.work_id)),
                    Message::EditWork,
                ),
                checkbox("Featured photo", form.is_featured).on_toggle(Message::EditFeatured),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        )
        .push(
            row![
                save,
                button(text("Cancel").size(14))
                    .style(button::secondary)
                    .padding(10)
                    .on_press(Message::EditCancel),
            ]
            .spacing(12),
        );

    container(panel)
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
