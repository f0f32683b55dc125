/// Add-product modal

use iced::widget::image::{Handle, Image};
use iced::widget::{
    button, center, column, container, horizontal_space, mouse_area, opaque, row, stack, text,
    text_editor, text_input,
};
use iced::{alignment, Color, ContentFit, Element, Length};

use crate::state::data::DraftField;
use crate::state::draft::{AddProductFlow, FlowState};
use crate::Message;

/// Lay the add-product dialog over `base` when the flow is open
pub fn overlay<'a>(
    base: impl Into<Element<'a, Message>>,
    flow: &'a AddProductFlow,
    description: &'a text_editor::Content,
) -> Element<'a, Message> {
    if !flow.is_open() {
        return base.into();
    }

    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(dialog(flow, description))).style(|_theme| container::Style {
                background: Some(
                    Color {
                        a: 0.6,
                        ..Color::BLACK
                    }
                    .into()
                ),
                ..container::Style::default()
            }))
            .on_press(Message::CloseAddProduct)
        )
    ]
    .into()
}

fn dialog<'a>(
    flow: &'a AddProductFlow,
    description: &'a text_editor::Content,
) -> Element<'a, Message> {
    let draft = flow.draft();

    let header = row![
        text("Add Product").size(24),
        horizontal_space(),
        button("×").on_press(Message::CloseAddProduct),
    ];

    let mut form = column![header].spacing(14);

    if flow.succeeded() {
        form = form.push(banner(
            "Product added successfully!",
            Color::from_rgb(0.1, 0.6, 0.3),
        ));
    }
    if let Some(error) = flow.error() {
        form = form.push(banner(error, Color::from_rgb(0.8, 0.2, 0.2)));
    }

    form = form
        .push(
            text_input("Product Name", &draft.name)
                .on_input(|value| Message::DraftChanged(DraftField::Name, value))
                .padding(10),
        )
        .push(
            text_editor(description)
                .placeholder("Product Description")
                .on_action(Message::DescriptionEdited)
                .height(Length::Fixed(96.0))
                .padding(10),
        )
        .push(
            text_input("Price (₹)", &draft.price_text)
                .on_input(|value| Message::DraftChanged(DraftField::Price, value))
                .padding(10),
        )
        .push(image_picker(flow.preview()));

    let label = match flow.state() {
        FlowState::Submitting => "Adding...",
        _ => "Add Product",
    };
    form = form.push(
        button(
            text(label)
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Center),
        )
        .width(Length::Fill)
        .padding(12)
        .on_press_maybe(flow.can_submit().then_some(Message::Submit)),
    );

    container(form)
        .width(Length::Fixed(560.0))
        .padding(24)
        .style(container::rounded_box)
        .into()
}

fn image_picker(preview: Option<&Handle>) -> Element<'_, Message> {
    match preview {
        Some(handle) => column![
            Image::<Handle>::new(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(220.0))
                .content_fit(ContentFit::Cover),
            button("Remove image").on_press(Message::RemoveImage),
        ]
        .spacing(8)
        .into(),
        None => button(
            container(text("Click to upload product image"))
                .padding(40)
                .center_x(Length::Fill),
        )
        .width(Length::Fill)
        .style(button::secondary)
        .on_press(Message::PickImage)
        .into(),
    }
}

fn banner(message: &str, color: Color) -> Element<'_, Message> {
    container(text(message).color(color))
        .padding(10)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}
