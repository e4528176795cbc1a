/// The three sections of the capture window
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length};

use super::status::{Status, StatusKind};
use crate::state::data::{Identifier, Side};
use crate::Message;

const PREVIEW_HEIGHT: f32 = 260.0;

/// Register a new mouse / delete an existing one
pub fn registration<'a>(
    new_mouse: &'a str,
    mice: &'a [Identifier],
    delete_choice: Option<&'a Identifier>,
) -> Element<'a, Message> {
    let add = column![
        text_input("New mouse number, e.g. 001", new_mouse)
            .on_input(Message::NewMouseChanged)
            .on_submit(Message::Register)
            .padding(8),
        button("Register")
            .on_press(Message::Register)
            .padding(10),
    ]
    .spacing(10)
    .width(Length::FillPortion(2));

    let delete = column![
        pick_list(mice, delete_choice, Message::DeleteChoiceSelected)
            .placeholder("Mouse to delete")
            .width(Length::Fill),
        button("Delete")
            .on_press_maybe(delete_choice.map(|_| Message::Delete))
            .padding(10),
    ]
    .spacing(10)
    .width(Length::FillPortion(1));

    column![
        text("🧬 Mouse registration").size(24),
        row![add, delete].spacing(30),
    ]
    .spacing(12)
    .into()
}

/// Pick a mouse and upload today's ear photos
pub fn upload<'a>(
    mice: &'a [Identifier],
    selected: Option<&'a Identifier>,
    previews: &'a [Option<Handle>; 2],
    both_present: bool,
) -> Element<'a, Message> {
    let header = text("📸 Photo upload").size(24);

    if mice.is_empty() {
        return column![header, text("Register a mouse first.")]
            .spacing(12)
            .into();
    }

    let picker = pick_list(mice, selected, Message::MouseSelected)
        .placeholder("Select a mouse")
        .width(Length::Fixed(240.0));

    let Some(mouse) = selected else {
        return column![header, picker].spacing(12).into();
    };

    let sides = row(Side::ALL.into_iter().map(|side| {
        side_column(mouse, side, previews[side.index()].as_ref())
    }))
    .spacing(30);

    let mut content = column![header, picker, sides].spacing(12);
    if both_present {
        content = content.push(
            text("✅ Both ear photos are in for today!")
                .color(StatusKind::Success.color()),
        );
    }

    content.into()
}

fn side_column<'a>(
    mouse: &Identifier,
    side: Side,
    preview: Option<&'a Handle>,
) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match preview {
        Some(handle) => column![
            image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT)),
            text(format!("{}_{}.jpg", mouse, side.label())).size(14),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .into(),
        None => container(text("No photo yet"))
            .width(Length::Fill)
            .height(Length::Fixed(PREVIEW_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(PREVIEW_HEIGHT))
            .into(),
    };

    column![
        text(side.to_string()).size(20),
        button("Choose photo…")
            .on_press(Message::UploadPhoto(side))
            .padding(10),
        preview,
    ]
    .spacing(10)
    .width(Length::FillPortion(1))
    .into()
}

/// Bundle today's photos into a zip
pub fn download<'a>(today: &str) -> Element<'a, Message> {
    column![
        text("📦 Download today's data").size(24),
        button(text(format!("📥 Save {} photos as ZIP…", today)))
            .on_press(Message::DownloadArchive)
            .padding(10),
    ]
    .spacing(12)
    .into()
}

/// Last status message, coloured by kind
pub fn status_line(status: &Status) -> Element<'_, Message> {
    text(status.text.as_str())
        .size(16)
        .color(status.color())
        .into()
}
