//! Paint a toy classification dataset, then copy it out as CSV.
//!
//! Run with `RUST_LOG=iced_scatter_brush=debug` to watch the cache rebuild.
use iced::widget::{button, column, row, text};
use iced::{Element, Task};
use iced_scatter_brush::{ScatterData, ScatterMessage, ScatterPresenter, ScatterPresenterBuilder};
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    iced::application(new_app, update, view)
        .theme(iced::theme::Theme::SolarizedLight)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    Scatter(ScatterMessage),
    CopyCsv,
    PrintOptions,
}

struct App {
    presenter: ScatterPresenter,
    edits: usize,
}

fn new_app() -> App {
    let presenter = ScatterPresenterBuilder::new()
        .with_scatter(ScatterData::make_default())
        .with_image_size_em(30.0, 24.0)
        .with_brush_size(0.05)
        .build()
        .unwrap();
    App { presenter, edits: 0 }
}

fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::Scatter(msg) => {
            if app.presenter.update(msg) {
                app.edits += 1;
            }
            Task::none()
        }
        Message::CopyCsv => match app.presenter.clipboard_csv() {
            Some(csv) => iced::clipboard::write(csv),
            None => Task::none(),
        },
        Message::PrintOptions => {
            let json = app.presenter.save_gui_options_to_json();
            println!("{}", serde_json::to_string_pretty(&json).unwrap());
            Task::none()
        }
    }
}

fn view(app: &App) -> Element<'_, Message> {
    let info = app
        .presenter
        .scatter()
        .map(ScatterData::info)
        .unwrap_or_default();

    column![
        app.presenter.view().map(Message::Scatter),
        row![
            button("Copy CSV").on_press(Message::CopyCsv),
            button("Print GUI options").on_press(Message::PrintOptions),
            text(format!("{info}  ({} edits)", app.edits)),
        ]
        .spacing(10.0),
    ]
    .spacing(10.0)
    .padding(10.0)
    .into()
}
