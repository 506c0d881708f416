/// Admin login screen
///
/// idle -> submitting -> (authenticated | rejected | network error).
/// On success the application persists the session and switches to
/// the admin area; on any failure the form stays on screen with the
/// message and remains resubmittable.

use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Element, Length, Task};

use crate::api::ApiClient;
use crate::state::collection::RemoteError;
use crate::state::data::User;
use crate::state::forms::LoginForm;
use crate::ui::widgets::{self, BannerKind};

#[derive(Default)]
pub struct State {
    form: LoginForm,
}

/// Successful login payload handed up to the application
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
    pub user: Option<User>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Username(String),
    Password(String),
    ToggleShowPassword,
    Submit,
    Settled(Result<Authenticated, RemoteError>),
    Back,
}

pub enum Event {
    Authenticated(Authenticated),
    Back,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }
}

async fn attempt_login(
    api: ApiClient,
    username: String,
    password: String,
) -> Result<Authenticated, RemoteError> {
    let response = api
        .login(&username, &password)
        .await
        .map_err(RemoteError::from)?;

    // Some deployments answer a rejection with 200 + success:false
    // instead of a 401; both paths surface the server's message.
    match (response.success, response.token) {
        (true, Some(token)) => Ok(Authenticated {
            token,
            user: response.user,
        }),
        _ => Err(RemoteError {
            status: None,
            message: response
                .error
                .unwrap_or_else(|| "Login failed. Try again.".to_string()),
        }),
    }
}

pub fn update(
    state: &mut State,
    message: Message,
    api: &ApiClient,
) -> (Task<Message>, Option<Event>) {
    match message {
        Message::Username(value) => {
            state.form.username = value;
            (Task::none(), None)
        }
        Message::Password(value) => {
            state.form.password = value;
            (Task::none(), None)
        }
        Message::ToggleShowPassword => {
            state.form.show_password = !state.form.show_password;
            (Task::none(), None)
        }
        Message::Submit => {
            if !state.form.begin_submit() {
                return (Task::none(), None);
            }
            let task = Task::perform(
                attempt_login(
                    api.clone(),
                    state.form.username.trim().to_string(),
                    state.form.password.clone(),
                ),
                Message::Settled,
            );
            (task, None)
        }
        Message::Settled(result) => match result {
            Ok(authenticated) => {
                tracing::info!("admin login succeeded");
                (Task::none(), Some(Event::Authenticated(authenticated)))
            }
            Err(err) => {
                state.form.fail(err.message);
                (Task::none(), None)
            }
        },
        Message::Back => (Task::none(), Some(Event::Back)),
    }
}

pub fn view(state: &State) -> Element<'_, Message> {
    let form = &state.form;
    let submitting = form.state.is_submitting();

    let mut card = column![
        text("Admin Panel").size(32),
        widgets::muted("Sign in to manage your portfolio").size(14),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    if let Some(error) = form.state.error() {
        card = card.push(widgets::banner(BannerKind::Error, error));
    }

    let password_field = text_input("Password", &form.password)
        .on_input(Message::Password)
        .on_submit(Message::Submit)
        .secure(!form.show_password)
        .padding(8);

    let toggle_label = if form.show_password { "Hide" } else { "Show" };

    let submit_label = if submitting { "Signing in..." } else { "Sign in" };
    let mut submit = button(
        container(text(submit_label).size(14)).center_x(Length::Fill),
    )
    .width(Length::Fill)
    .padding(10);
    if !submitting {
        submit = submit.on_press(Message::Submit);
    }

    card = card
        .push(
            text_input("Username", &form.username)
                .on_input(Message::Username)
                .padding(8),
        )
        .push(
            row![
                password_field,
                button(text(toggle_label).size(13))
                    .style(button::text)
                    .on_press(Message::ToggleShowPassword),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        )
        .push(submit)
        .push(
            button(text("Back to portfolio").size(13))
                .style(button::text)
                .on_press(Message::Back),
        );

    container(container(card).max_width(380).padding(24))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
