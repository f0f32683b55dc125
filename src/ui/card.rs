use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, row, stack, text, Space};
use iced::{Color, ContentFit, Element, Length};

use crate::contact::{Contact, ORDER_PHONE};
use crate::state::data::Product;
use crate::Message;

const CARD_WIDTH: f32 = 220.0;
const IMAGE_HEIGHT: f32 = 160.0;

/// One product tile in the grid
pub fn product_card(product: &Product) -> Element<'_, Message> {
    let mut picture = stack![product_image(product.image.as_ref())];
    if product.is_new() {
        picture = picture.push(
            container(
                container(text("New").size(12))
                    .padding([2, 8])
                    .style(container::rounded_box),
            )
            .width(Length::Fill)
            .align_right(Length::Fill)
            .padding(6),
        );
    }

    let details = column![
        text(&product.name).size(18),
        text(&product.description)
            .size(13)
            .color(Color::from_rgb(0.55, 0.55, 0.55))
            .height(Length::Fixed(36.0)),
        text(product.price_label())
            .size(22)
            .color(Color::from_rgb(0.1, 0.6, 0.45)),
        text(format!("Place order: {ORDER_PHONE}")).size(13),
        contact_buttons("Call", 12.0),
    ]
    .spacing(6)
    .padding(12);

    container(column![picture, details])
        .width(Length::Fixed(CARD_WIDTH))
        .style(container::bordered_box)
        .into()
}

/// Call and WhatsApp buttons; the header reuses them with a bigger label
pub fn contact_buttons<'a>(call_label: &'a str, size: f32) -> Element<'a, Message> {
    row![
        button(text(call_label).size(size))
            .style(button::success)
            .on_press(Message::OpenContact(Contact::Call)),
        button(text("WhatsApp").size(size))
            .style(button::success)
            .on_press(Message::OpenContact(Contact::WhatsApp)),
    ]
    .spacing(8)
    .into()
}

/// Decoded product photo, or a grey placeholder box when there is none
fn product_image(handle: Option<&Handle>) -> Element<'_, Message> {
    match handle {
        Some(handle) => Image::<Handle>::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(IMAGE_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(Space::new(Length::Fill, Length::Fixed(IMAGE_HEIGHT)))
            .style(container::rounded_box)
            .into(),
    }
}
