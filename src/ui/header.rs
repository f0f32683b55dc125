use iced::widget::{column, container, text};
use iced::{Alignment, Color, Element, Length};

use super::card::contact_buttons;
use crate::Message;

/// Store name and landing tagline above the catalog
pub fn view<'a>() -> Element<'a, Message> {
    container(
        column![
            text("MediSupply").size(40),
            text("Quality medicines and healthcare supplies, delivered to your door")
                .size(16)
                .color(Color::from_rgb(0.6, 0.6, 0.6)),
            contact_buttons("Call us to Order", 16.0),
        ]
        .spacing(8)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .padding([32, 24])
    .center_x(Length::Fill)
    .into()
}
