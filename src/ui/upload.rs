/// Photo upload tab
///
/// Pick files (or a whole folder), edit each draft's metadata, apply
/// shared defaults, then upload. Uploads run one request at a time in
/// selection order: every settled draft schedules the next one, which
/// is what keeps the server load flat and the per-photo status
/// deterministic. Failed drafts stay listed with their error for
/// retry; a run that partly succeeds is summarized, not treated as an
/// error.

use std::collections::HashMap;
use std::path::PathBuf;

use iced::widget::image::Handle;
use iced::widget::{button, checkbox, column, container, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length, Task};

use crate::api::endpoints::{is_image_file, PhotoUpload, IMAGE_EXTENSIONS};
use crate::api::ApiClient;
use crate::images;
use crate::state::collection::RemoteError;
use crate::state::data::{Category, Photo, Work};
use crate::state::drafts::{BatchOutcome, Draft, DraftBatch, DraftStatus, GlobalDefaults};
use crate::ui::widgets::{
    self, category_choices, category_selection, work_choices, work_selection, BannerKind,
    CategoryChoice, Notice, WorkChoice,
};

pub struct State {
    drafts: DraftBatch,
    defaults: GlobalDefaults,
    /// Downscaled previews keyed by draft id, decoded off-thread
    previews: HashMap<u64, Handle>,
    uploading: bool,
    run_succeeded: usize,
    run_failed: usize,
    /// Photos created during the current run, reported up at the end
    created: Vec<Photo>,
    outcome: Option<BatchOutcome>,
    notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub enum Message {
    PickFiles,
    PickFolder,
    PreviewReady(u64, Result<Handle, String>),
    DefaultCategory(CategoryChoice),
    DefaultWork(WorkChoice),
    DefaultFeatured(bool),
    ReapplyDefaults,
    Title(u64, String),
    Description(u64, String),
    CategoryFor(u64, CategoryChoice),
    WorkFor(u64, WorkChoice),
    FeaturedFor(u64, bool),
    Remove(u64),
    ClearAll,
    StartUpload,
    DraftSettled(u64, Result<Photo, RemoteError>),
    DismissOutcome,
}

pub enum Event {
    /// A run finished with at least one created photo; the admin
    /// screen reloads its collections in response.
    Uploaded(Vec<Photo>),
}

impl State {
    pub fn new() -> Self {
        Self {
            drafts: DraftBatch::new(),
            defaults: GlobalDefaults::default(),
            previews: HashMap::new(),
            uploading: false,
            run_succeeded: 0,
            run_failed: 0,
            created: Vec::new(),
            outcome: None,
            notice: None,
        }
    }

    /// Add picked files as drafts and kick off their preview decodes.
    fn add_paths(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        let mut tasks = Vec::new();
        for path in paths {
            let id = self.drafts.add_file(path.clone(), &self.defaults);
            tasks.push(Task::perform(images::draft_preview(path), move |result| {
                Message::PreviewReady(id, result)
            }));
        }
        Task::batch(tasks)
    }
}

async fn upload_draft(api: ApiClient, draft: Draft) -> Result<Photo, RemoteError> {
    let bytes = tokio::fs::read(&draft.path).await.map_err(|err| RemoteError {
        status: None,
        message: format!("Could not read {}: {}", draft.path.display(), err),
    })?;

    let upload = PhotoUpload {
        file_name: draft.file_name,
        bytes,
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        category_id: draft.category_id,
        work_id: draft.work_id,
        is_featured: draft.is_featured,
    };
    api.upload_photo(upload).await.map_err(RemoteError::from)
}

/// Issue the next pending draft's request, or finish the run.
fn start_next(state: &mut State, api: &ApiClient) -> (Task<Message>, Option<Event>) {
    let Some(id) = state.drafts.next_pending() else {
        state.uploading = false;
        state.outcome = BatchOutcome::from_counts(state.run_succeeded, state.run_failed);
        if let Some(outcome) = &state.outcome {
            tracing::info!("upload run finished: {}", outcome.message());
        }
        let event = if state.created.is_empty() {
            None
        } else {
            Some(Event::Uploaded(std::mem::take(&mut state.created)))
        };
        return (Task::none(), event);
    };

    state.drafts.mark_uploading(id);
    let Some(draft) = state.drafts.get(id) else {
        return (Task::none(), None);
    };
    let draft = draft.clone();
    let api = api.clone();
    let task = Task::perform(upload_draft(api, draft), move |result| {
        Message::DraftSettled(id, result)
    });
    (task, None)
}

pub fn update(
    state: &mut State,
    message: Message,
    api: &ApiClient,
) -> (Task<Message>, Option<Event>) {
    match message {
        Message::PickFiles => {
            if state.uploading {
                return (Task::none(), None);
            }
            let picked = rfd::FileDialog::new()
                .set_title("Select Photos")
                .add_filter("Images", &IMAGE_EXTENSIONS)
                .pick_files();
            match picked {
                Some(paths) => (state.add_paths(paths), None),
                None => (Task::none(), None),
            }
        }
        Message::PickFolder => {
            if state.uploading {
                return (Task::none(), None);
            }
            let Some(folder) = rfd::FileDialog::new()
                .set_title("Select Folder with Photos")
                .pick_folder()
            else {
                return (Task::none(), None);
            };

            // Walk the directory tree and take every supported image
            let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(&folder)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file() && is_image_file(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            paths.sort();

            if paths.is_empty() {
                state.notice = Some(Notice::warning("No image files found in that folder."));
                return (Task::none(), None);
            }
            state.notice = Some(Notice::info(format!(
                "Added {} photos from {}",
                paths.len(),
                folder.display()
            )));
            (state.add_paths(paths), None)
        }
        Message::PreviewReady(id, result) => {
            match result {
                Ok(handle) => {
                    state.previews.insert(id, handle);
                }
                Err(err) => tracing::warn!("preview failed: {}", err),
            }
            (Task::none(), None)
        }
        Message::DefaultCategory(choice) => {
            state.defaults.category_id = choice.id;
            state.drafts.apply_defaults(&state.defaults);
            (Task::none(), None)
        }
        Message::DefaultWork(choice) => {
            state.defaults.work_id = choice.id;
            state.drafts.apply_defaults(&state.defaults);
            (Task::none(), None)
        }
        Message::DefaultFeatured(value) => {
            state.defaults.is_featured = value;
            state.drafts.apply_defaults(&state.defaults);
            (Task::none(), None)
        }
        Message::ReapplyDefaults => {
            state.drafts.apply_defaults(&state.defaults);
            if !state.drafts.is_empty() {
                state.notice = Some(Notice::success(format!(
                    "Defaults applied to {} photos.",
                    state.drafts.len()
                )));
            }
            (Task::none(), None)
        }
        Message::Title(id, value) => {
            if let Some(draft) = state.drafts.get_mut(id) {
                draft.title = value;
            }
            (Task::none(), None)
        }
        Message::Description(id, value) => {
            if let Some(draft) = state.drafts.get_mut(id) {
                draft.description = value;
            }
            (Task::none(), None)
        }
        Message::CategoryFor(id, choice) => {
            if let Some(draft) = state.drafts.get_mut(id) {
                draft.category_id = choice.id;
            }
            (Task::none(), None)
        }
        Message::WorkFor(id, choice) => {
            if let Some(draft) = state.drafts.get_mut(id) {
                draft.work_id = choice.id;
            }
            (Task::none(), None)
        }
        Message::FeaturedFor(id, value) => {
            if let Some(draft) = state.drafts.get_mut(id) {
                draft.is_featured = value;
            }
            (Task::none(), None)
        }
        Message::Remove(id) => {
            if !state.uploading {
                state.drafts.remove(id);
                state.previews.remove(&id);
            }
            (Task::none(), None)
        }
        Message::ClearAll => {
            if !state.uploading {
                state.drafts.clear();
                state.previews.clear();
                state.outcome = None;
                state.notice = None;
            }
            (Task::none(), None)
        }
        Message::StartUpload => {
            if state.uploading || state.drafts.is_empty() {
                return (Task::none(), None);
            }
            if !state.drafts.all_titled() {
                state.notice = Some(Notice::error("Every photo needs a title before uploading."));
                return (Task::none(), None);
            }
            state.uploading = true;
            state.run_succeeded = 0;
            state.run_failed = 0;
            state.created.clear();
            state.outcome = None;
            state.notice = None;
            state.drafts.reset_for_run();
            start_next(state, api)
        }
        Message::DraftSettled(id, result) => {
            if !state.uploading {
                return (Task::none(), None);
            }
            match result {
                Ok(photo) => {
                    state.drafts.complete(id);
                    state.previews.remove(&id);
                    state.run_succeeded += 1;
                    state.created.push(photo);
                }
                Err(err) => {
                    tracing::warn!("upload failed for draft {}: {}", id, err);
                    state.drafts.mark_failed(id, err.message);
                    state.run_failed += 1;
                }
            }
            // Only now does the next draft's request go out
            start_next(state, api)
        }
        Message::DismissOutcome => {
            state.outcome = None;
            state.notice = None;
            (Task::none(), None)
        }
    }
}

pub fn view<'a>(
    state: &'a State,
    works: &'a [Work],
    categories: &'a [Category],
) -> Element<'a, Message> {
    let mut content = column![].spacing(20);

    if let Some(outcome) = &state.outcome {
        let kind = match outcome {
            BatchOutcome::AllSucceeded(_) => BannerKind::Success,
            BatchOutcome::Partial { .. } => BannerKind::Warning,
            BatchOutcome::AllFailed(_) => BannerKind::Error,
        };
        content = content.push(
            row![
                container(widgets::banner(kind, outcome.message())).width(Length::Fill),
                button(text("Dismiss").size(13))
                    .style(button::text)
                    .on_press(Message::DismissOutcome),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        );
    }

    if let Some(notice) = &state.notice {
        content = content.push(widgets::banner(notice.kind, &notice.text));
    }

    content = content.push(defaults_panel(state, works, categories));
    content = content.push(
        row![
            button("Add photos...").on_press(Message::PickFiles),
            button("Add folder...").style(button::secondary).on_press(Message::PickFolder),
        ]
        .spacing(12),
    );

    if !state.drafts.is_empty() {
        content = content.push(text(format!("Selected photos ({})", state.drafts.len())).size(18));
        for draft in state.drafts.iter() {
            content = content.push(draft_card(state, draft, works, categories));
        }
        content = content.push(run_controls(state));
    }

    content.into()
}

fn defaults_panel<'a>(
    state: &'a State,
    works: &'a [Work],
    categories: &'a [Category],
) -> Element<'a, Message> {
    let mut panel = column![
        text("Shared defaults").size(16),
        widgets::muted("Applied to every photo; individual photos can still be adjusted.")
            .size(13),
    ]
    .spacing(10);

    panel = panel.push(
        row![
            pick_list(
                category_choices(categories),
                Some(category_selection(categories, state.defaults.category_id)),
                Message::DefaultCategory,
            )
            .placeholder("Default category"),
            pick_list(
                work_choices(works),
                Some(work_selection(works, state.defaults.work_id)),
                Message::DefaultWork,
            )
            .placeholder("Default work"),
            checkbox("Feature all", state.defaults.is_featured).on_toggle(Message::DefaultFeatured),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    );

    if !state.drafts.is_empty() {
        panel = panel.push(
            button(text("Reapply to all photos").size(13))
                .style(button::secondary)
                .on_press(Message::ReapplyDefaults),
        );
    }

    container(panel)
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn draft_card<'a>(
    state: &'a State,
    draft: &'a Draft,
    works: &'a [Work],
    categories: &'a [Category],
) -> Element<'a, Message> {
    let id = draft.local_id;

    let status: Element<'a, Message> = match &draft.status {
        DraftStatus::Pending if state.uploading => widgets::muted("Queued").size(13).into(),
        DraftStatus::Pending => widgets::muted(&draft.file_name).size(13).into(),
        DraftStatus::Uploading => widgets::muted("Uploading...").size(13).into(),
        DraftStatus::Failed(message) => widgets::danger(message).size(13).into(),
    };

    let fields = column![
        text_input("Photo title", &draft.title)
            .on_input(move |value| Message::Title(id, value))
            .padding(8),
        text_input("Description", &draft.description)
            .on_input(move |value| Message::Description(id, value))
            .padding(8),
        row![
            pick_list(
                category_choices(categories),
                Some(category_selection(categories, draft.category_id)),
                move |choice| Message::CategoryFor(id, choice),
            ),
            pick_list(
                work_choices(works),
                Some(work_selection(works, draft.work_id)),
                move |choice| Message::WorkFor(id, choice),
            ),
            checkbox("Featured", draft.is_featured)
                .on_toggle(move |value| Message::FeaturedFor(id, value)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        status,
    ]
    .spacing(8)
    .width(Length::Fill);

    let mut remove = button(text("Remove").size(13)).style(button::danger);
    if !state.uploading {
        remove = remove.on_press(Message::Remove(id));
    }

    container(
        row![
            widgets::photo_tile(state.previews.get(&id), 88.0, 88.0),
            fields,
            remove,
        ]
        .spacing(16)
        .align_y(Alignment::Start),
    )
    .padding(12)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

fn run_controls(state: &State) -> Element<'_, Message> {
    let count = state.drafts.len();
    let label = if state.uploading {
        format!("Uploading {} photos...", count)
    } else {
        format!("Upload {} photos", count)
    };

    let mut upload = button(text(label).size(14)).padding(10);
    if !state.uploading && state.drafts.all_titled() {
        upload = upload.on_press(Message::StartUpload);
    }

    let mut clear = button(text("Clear all").size(14)).style(button::secondary).padding(10);
    if !state.uploading {
        clear = clear.on_press(Message::ClearAll);
    }

    row![upload, clear].spacing(12).into()
}
