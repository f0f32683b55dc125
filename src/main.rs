use iced::widget::{column, scrollable, text_editor};
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod contact;
mod error;
mod state;
mod ui;

use api::image_file::{load_image_file, IMAGE_EXTENSIONS};
use api::ProductApi;
use config::Config;
use contact::Contact;
use error::ApiError;
use state::catalog::{CatalogStore, LoadTicket};
use state::data::{DraftField, Product, SelectedImage};
use state::draft::{AddProductFlow, ImageOutcome, ImageTicket, SubmitOutcome, SubmitTicket};

/// Main application state
struct Storefront {
    config: Config,
    /// Backend client
    api: ProductApi,
    /// Products, search filter and fetch lifecycle
    catalog: CatalogStore,
    /// The add-product modal
    add_product: AddProductFlow,
    /// Multi-line editor behind the draft's description field
    description: text_editor::Content,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Search box edited
    SearchChanged(String),
    /// User clicked "Try Again" after a failed first load
    Retry,
    /// Background list fetch completed
    ProductsLoaded(LoadTicket, Result<Vec<Product>, ApiError>),
    OpenAddProduct,
    CloseAddProduct,
    DraftChanged(DraftField, String),
    DescriptionEdited(text_editor::Action),
    /// User clicked the image upload area
    PickImage,
    /// Picked image finished reading from disk
    ImageLoaded(ImageTicket, Result<SelectedImage, String>),
    RemoveImage,
    Submit,
    /// Add-product request completed
    SubmitFinished(SubmitTicket, Result<(), ApiError>),
    /// The success banner has been up long enough
    ConfirmationElapsed(SubmitTicket),
    /// Call or WhatsApp button pressed
    OpenContact(Contact),
}

impl Storefront {
    /// Create the application and kick off the first catalog load
    fn new(config: Config) -> (Self, Task<Message>) {
        let api = ProductApi::new(config.api_base_url.clone());
        let mut app = Storefront {
            config,
            api,
            catalog: CatalogStore::new(),
            add_product: AddProductFlow::new(),
            description: text_editor::Content::new(),
        };

        let ticket = app.catalog.load();
        let task = app.fetch_products(ticket);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SearchChanged(text) => {
                self.catalog.set_filter(text);
                Task::none()
            }
            Message::Retry => {
                let ticket = self.catalog.refresh();
                self.fetch_products(ticket)
            }
            Message::ProductsLoaded(ticket, result) => {
                self.catalog.apply_load(ticket, result);
                Task::none()
            }
            Message::OpenAddProduct => {
                self.add_product.open();
                self.description =
                    text_editor::Content::with_text(&self.add_product.draft().description);
                Task::none()
            }
            Message::CloseAddProduct => {
                self.add_product.close();
                Task::none()
            }
            Message::DraftChanged(field, value) => {
                self.add_product.set_field(field, value);
                Task::none()
            }
            Message::DescriptionEdited(action) => {
                let is_edit = action.is_edit();
                self.description.perform(action);
                if is_edit {
                    let text = self.description.text();
                    self.add_product
                        .set_field(DraftField::Description, text.trim_end_matches('\n'));
                }
                Task::none()
            }
            Message::PickImage => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select Product Image")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => {
                        let ticket = self.add_product.image_ticket();
                        Task::perform(load_image_file(path), move |result| {
                            Message::ImageLoaded(ticket, result)
                        })
                    }
                    None => Task::none(),
                }
            }
            Message::ImageLoaded(ticket, Ok(image)) => {
                // A rejected image is reported through the form's error banner
                if let ImageOutcome::Rejected(err) = self.add_product.apply_image(ticket, image) {
                    debug!("Image rejected: {err}");
                }
                Task::none()
            }
            Message::ImageLoaded(_, Err(err)) => {
                warn!("Could not load image: {err}");
                Task::none()
            }
            Message::RemoveImage => {
                self.add_product.clear_image();
                Task::none()
            }
            Message::Submit => match self.add_product.submit() {
                Ok(submission) => {
                    let api = self.api.clone();
                    let ticket = submission.ticket;
                    Task::perform(
                        async move { api.add_product(submission.product).await },
                        move |result| Message::SubmitFinished(ticket, result),
                    )
                }
                Err(err) => {
                    debug!("Submission blocked: {err}");
                    Task::none()
                }
            },
            Message::SubmitFinished(ticket, result) => {
                match self.add_product.apply_submit(ticket, result) {
                    SubmitOutcome::Confirm(ticket) => {
                        let delay = self.config.confirmation_delay;
                        Task::perform(
                            async move { tokio::time::sleep(delay).await },
                            move |_| Message::ConfirmationElapsed(ticket),
                        )
                    }
                    SubmitOutcome::Detached => {
                        let ticket = self.catalog.refresh();
                        self.fetch_products(ticket)
                    }
                    SubmitOutcome::Failed | SubmitOutcome::Ignored => Task::none(),
                }
            }
            Message::ConfirmationElapsed(ticket) => {
                if self.add_product.finish_confirmation(ticket) {
                    let ticket = self.catalog.refresh();
                    self.fetch_products(ticket)
                } else {
                    Task::none()
                }
            }
            Message::OpenContact(target) => {
                let link = target.link();
                info!("Opening {link}");
                if let Err(err) = contact::open_link(link) {
                    warn!("Could not open {link}: {err}");
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let page = scrollable(column![ui::header::view(), ui::catalog::view(&self.catalog)])
            .width(Length::Fill)
            .height(Length::Fill);

        ui::add_product::overlay(page, &self.add_product, &self.description)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }

    /// Launch a list fetch for an issued ticket
    fn fetch_products(&self, ticket: LoadTicket) -> Task<Message> {
        debug!("Fetching catalog (request {})", self.catalog.requests_issued());
        let api = self.api.clone();
        Task::perform(async move { api.fetch_products().await }, move |result| {
            Message::ProductsLoaded(ticket, result)
        })
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medi_storefront=info")),
        )
        .init();

    let config = Config::load().unwrap_or_else(|err| {
        error!("Invalid configuration, using defaults: {err}");
        Config::default()
    });
    info!("MediSupply storefront starting against {}", config.api_base_url);

    iced::application(
        "MediSupply Storefront",
        Storefront::update,
        Storefront::view,
    )
    .theme(Storefront::theme)
    .centered()
    .run_with(move || Storefront::new(config))
}
