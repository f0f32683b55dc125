/// Product grid rendering
///
/// `project` decides *what* to show from the catalog state; `view` turns
/// that decision into widgets. Keeping the two apart lets the decision be
/// tested without a renderer.

use iced::widget::{button, column, container, horizontal_space, row, text, text_input, Column};
use iced::{Alignment, Color, Element, Length};
use iced_aw::Wrap;

use super::card::product_card;
use crate::state::catalog::{CatalogStore, Phase};
use crate::state::data::Product;
use crate::Message;

/// Why the grid is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The search text filtered everything out
    NoMatches,
    /// The backend has no products at all
    NoProducts,
}

/// What the catalog section should display
#[derive(Debug)]
pub enum CatalogView<'a> {
    /// First load still in flight
    Loading,
    /// First load failed; offer a retry
    Failed { message: &'a str },
    Empty(EmptyReason),
    Grid(Vec<&'a Product>),
}

/// Pure projection of catalog state onto one of the views
pub fn project(store: &CatalogStore) -> CatalogView<'_> {
    let first_load = store.items().is_empty();

    match store.phase() {
        Phase::Loading if first_load => return CatalogView::Loading,
        Phase::Failed if first_load => {
            return CatalogView::Failed {
                message: store.last_error().unwrap_or_default(),
            }
        }
        _ => {}
    }

    let visible = store.visible();
    if !visible.is_empty() {
        return CatalogView::Grid(visible);
    }
    if store.has_filter() {
        CatalogView::Empty(EmptyReason::NoMatches)
    } else {
        CatalogView::Empty(EmptyReason::NoProducts)
    }
}

/// Small status text shown above a populated grid during a background
/// refresh, or after one failed
pub fn background_status(store: &CatalogStore) -> Option<String> {
    if store.items().is_empty() {
        return None;
    }
    match store.phase() {
        Phase::Loading => Some("Refreshing…".to_string()),
        Phase::Failed => store.last_error().map(str::to_string),
        Phase::Ready => None,
    }
}

/// "Found 1 result" / "Found 3 results"
pub fn result_count_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("Found {count} result{plural}")
}

/// Build the whole products section: heading, search bar and grid
pub fn view(store: &CatalogStore) -> Element<'_, Message> {
    let heading = column![
        text("Our Products").size(32),
        text("Browse our collection of quality medicines and healthcare products")
            .size(15)
            .color(Color::from_rgb(0.6, 0.6, 0.6)),
    ]
    .spacing(6);

    let add_button = button("+ Add Product")
        .on_press(Message::OpenAddProduct)
        .padding([10, 20]);

    let mut search: Column<Message> = column![text_input(
        "Search for medicines, healthcare products...",
        store.filter_text(),
    )
    .on_input(Message::SearchChanged)
    .padding(12)
    .width(Length::Fill)]
    .spacing(6)
    .max_width(640);

    if store.has_filter() {
        search = search.push(text(result_count_label(store.result_count())).size(14));
    }

    let mut section = column![
        row![heading, horizontal_space(), add_button]
            .align_y(Alignment::Center),
        search,
    ]
    .spacing(24)
    .padding(24)
    .width(Length::Fill);

    if let Some(status) = background_status(store) {
        section = section.push(text(status).size(14).color(Color::from_rgb(0.8, 0.6, 0.2)));
    }

    section.push(view_body(project(store))).into()
}

fn view_body(projection: CatalogView<'_>) -> Element<'_, Message> {
    match projection {
        CatalogView::Loading => centered(column![text("Loading products…").size(18)]),
        CatalogView::Failed { message } => centered(
            column![
                text("Error Loading Products")
                    .size(20)
                    .color(Color::from_rgb(0.9, 0.3, 0.3)),
                text(message),
                button("Try Again").on_press(Message::Retry).padding(8),
            ]
            .spacing(10)
            .align_x(Alignment::Center),
        ),
        CatalogView::Empty(reason) => {
            let hint = match reason {
                EmptyReason::NoMatches => "Try adjusting your search terms",
                EmptyReason::NoProducts => "No products available at the moment",
            };
            centered(
                column![text("No Products Found").size(20), text(hint)]
                    .spacing(8)
                    .align_x(Alignment::Center),
            )
        }
        CatalogView::Grid(products) => {
            let cards: Vec<Element<'_, Message>> =
                products.into_iter().map(product_card).collect();
            Wrap::with_elements(cards)
                .spacing(12.0)
                .line_spacing(12.0)
                .into()
        }
    }
}

fn centered(content: Column<'_, Message>) -> Element<'_, Message> {
    container(content)
        .width(Length::Fill)
        .padding(48)
        .center_x(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            description: String::new(),
            price: 1.0,
            image_data: None,
            upload_date: None,
            image: None,
        }
    }

    fn store_with(products: Vec<Product>) -> CatalogStore {
        let mut store = CatalogStore::new();
        let ticket = store.load();
        store.apply_load(ticket, Ok(products));
        store
    }

    #[test]
    fn test_first_load_shows_spinner() {
        let store = CatalogStore::new();
        assert!(matches!(project(&store), CatalogView::Loading));
    }

    #[test]
    fn test_refresh_keeps_grid() {
        let mut store = store_with(vec![product("Gauze")]);
        store.refresh();

        assert!(matches!(project(&store), CatalogView::Grid(ref p) if p.len() == 1));
        assert_eq!(background_status(&store).as_deref(), Some("Refreshing…"));
    }

    #[test]
    fn test_first_failure_shows_error_panel() {
        let mut store = CatalogStore::new();
        let ticket = store.load();
        store.apply_load(ticket, Err(ApiError::Server { status: 500 }));

        match project(&store) {
            CatalogView::Failed { message } => assert_eq!(message, "Failed to fetch products"),
            other => panic!("expected error panel, got {other:?}"),
        }
        assert!(background_status(&store).is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_grid_with_status() {
        let mut store = store_with(vec![product("Gauze")]);
        let ticket = store.refresh();
        store.apply_load(ticket, Err(ApiError::Transport("timed out".into())));

        assert!(matches!(project(&store), CatalogView::Grid(_)));
        assert_eq!(
            background_status(&store).as_deref(),
            Some("Failed to fetch products")
        );
    }

    #[test]
    fn test_empty_states_distinguish_search_from_no_products() {
        let store = store_with(vec![]);
        assert!(matches!(
            project(&store),
            CatalogView::Empty(EmptyReason::NoProducts)
        ));

        let mut store = store_with(vec![product("Gauze")]);
        store.set_filter("scalpel");
        assert!(matches!(
            project(&store),
            CatalogView::Empty(EmptyReason::NoMatches)
        ));

        store.set_filter("   ");
        assert!(matches!(project(&store), CatalogView::Grid(_)));
    }

    #[test]
    fn test_result_count_label() {
        assert_eq!(result_count_label(0), "Found 0 results");
        assert_eq!(result_count_label(1), "Found 1 result");
        assert_eq!(result_count_label(7), "Found 7 results");
    }
}
