/// Shared view pieces used by several screens
///
/// Status banners, photo tiles with a placeholder, the wrapping photo
/// grid, and the pick-list option types for categories and works.

use std::fmt;

use iced::widget::image::Handle;
use iced::widget::{container, text, Text};
use iced::{Element, Length, Theme};

use crate::state::data::{Category, Work};

/// Severity of a status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, dismissible status line shown at the top of a screen
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: BannerKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }
}

/// Full-width colored banner for a notice or error message.
pub fn banner<'a, Message: 'a>(kind: BannerKind, message: impl ToString) -> Element<'a, Message> {
    container(text(message.to_string()).size(14))
        .padding(10)
        .width(Length::Fill)
        .style(move |theme: &Theme| {
            let palette = theme.extended_palette();
            let pair = match kind {
                BannerKind::Info => palette.background.weak,
                BannerKind::Success => palette.success.weak,
                BannerKind::Warning => palette.secondary.weak,
                BannerKind::Error => palette.danger.weak,
            };
            container::Style {
                background: Some(pair.color.into()),
                text_color: Some(pair.text),
                border: iced::border::rounded(6.0),
                ..container::Style::default()
            }
        })
        .into()
}

/// Secondary-colored text (captions, metadata lines).
pub fn muted<'a>(content: impl ToString) -> Text<'a> {
    text(content.to_string()).style(|theme: &Theme| text::Style {
        color: Some(theme.extended_palette().background.strong.color),
    })
}

/// Error-colored text (inline failure notes).
pub fn danger<'a>(content: impl ToString) -> Text<'a> {
    text(content.to_string()).style(|theme: &Theme| text::Style {
        color: Some(theme.extended_palette().danger.base.color),
    })
}

/// A photo at fixed size, or a placeholder box while its bytes are
/// still on their way.
pub fn photo_tile<'a, Message: 'a>(
    handle: Option<&Handle>,
    width: f32,
    height: f32,
) -> Element<'a, Message> {
    match handle {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .content_fit(iced::ContentFit::Cover)
            .into(),
        None => container(muted("..."))
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .center_x(Length::Fixed(width))
            .center_y(Length::Fixed(height))
            .style(container::rounded_box)
            .into(),
    }
}

/// Wrapping grid for photo cards.
pub fn photo_grid<'a, Message: 'a>(children: Vec<Element<'a, Message>>) -> Element<'a, Message> {
    iced_aw::Wrap::with_elements(children)
        .spacing(16.0)
        .line_spacing(16.0)
        .into()
}

// ========== Pick-list options ==========

/// One entry of the category pick list ("No category" is id None)
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChoice {
    pub id: Option<i64>,
    pub name: String,
}

impl fmt::Display for CategoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Options for a category pick list, with the "none" entry first.
pub fn category_choices(categories: &[Category]) -> Vec<CategoryChoice> {
    let mut choices = vec![CategoryChoice {
        id: None,
        name: "No category".to_string(),
    }];
    choices.extend(categories.iter().map(|category| CategoryChoice {
        id: Some(category.id),
        name: category.name.clone(),
    }));
    choices
}

/// The currently selected entry for a category pick list.
pub fn category_selection(categories: &[Category], id: Option<i64>) -> CategoryChoice {
    match id.and_then(|id| categories.iter().find(|c| c.id == id)) {
        Some(category) => CategoryChoice {
            id: Some(category.id),
            name: category.name.clone(),
        },
        None => CategoryChoice {
            id: None,
            name: "No category".to_string(),
        },
    }
}

/// One entry of the work pick list ("No work" is id None)
#[derive(Debug, Clone, PartialEq)]
pub struct WorkChoice {
    pub id: Option<i64>,
    pub title: String,
}

impl fmt::Display for WorkChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Options for a work pick list, with the "none" entry first.
pub fn work_choices(works: &[Work]) -> Vec<WorkChoice> {
    let mut choices = vec![WorkChoice {
        id: None,
        title: "No work".to_string(),
    }];
    choices.extend(works.iter().map(|work| WorkChoice {
        id: Some(work.id),
        title: work.title.clone(),
    }));
    choices
}

/// The currently selected entry for a work pick list.
pub fn work_selection(works: &[Work], id: Option<i64>) -> WorkChoice {
    match id.and_then(|id| works.iter().find(|w| w.id == id)) {
        Some(work) => WorkChoice {
            id: Some(work.id),
            title: work.title.clone(),
        },
        None => WorkChoice {
            id: None,
            title: "No work".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            slug: None,
        }
    }

    #[test]
    fn test_category_choices_lead_with_none() {
        let categories = vec![category(1, "Sessions"), category(2, "Events")];
        let choices = category_choices(&categories);
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[0].id, None);
        assert_eq!(choices[2].name, "Events");
    }

    #[test]
    fn test_category_selection_falls_back_to_none() {
        let categories = vec![category(1, "Sessions")];
        assert_eq!(category_selection(&categories, Some(1)).id, Some(1));
        // Unknown or absent ids select the "none" entry
        assert_eq!(category_selection(&categories, Some(99)).id, None);
        assert_eq!(category_selection(&categories, None).id, None);
    }
}
