use iced::widget::{
    button, column, container, image, mouse_area, radio, row, slider, text, text_input,
};
use iced::{Alignment, Color, Element, Length};

use crate::{
    ScatterPresenter,
    brush::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE},
    message::{BoundField, ScatterMessage},
    scatter_data::{Bounding, Rgb, ScatterCluster, ScatterData},
};

const BOUND_LIMIT: f64 = 1000.0;
const LABEL_SIZE: f32 = 12.0;

pub(crate) fn scatter_view(presenter: &ScatterPresenter) -> Element<'_, ScatterMessage> {
    let Some(scatter) = presenter.scatter() else {
        return text("No scatter data").into();
    };

    let mut col = column![class_selector(scatter, presenter.selected_class_idx())].spacing(6.0);
    col = col.push(edit_toggle(presenter.is_edit_panel_open()));
    if presenter.is_edit_panel_open() {
        col = col.push(edit_panel(scatter));
    }
    col.push(brush_controls(presenter))
        .push(plot_area(presenter))
        .into()
}

fn class_selector(scatter: &ScatterData, selected: usize) -> Element<'_, ScatterMessage> {
    let mut r = row![].spacing(12.0).align_y(Alignment::Center);
    for (i, cluster) in scatter.classes.iter().enumerate() {
        let color = Color::from(cluster.color);
        r = r.push(
            row![
                radio(cluster.name.as_str(), i, Some(selected), ScatterMessage::SelectClass)
                    .size(14.0),
                text(format!("({})", cluster.points.len())).color(color),
            ]
            .spacing(4.0)
            .align_y(Alignment::Center),
        );
    }
    r.into()
}

fn edit_toggle<'a>(open: bool) -> Element<'a, ScatterMessage> {
    let label = if open {
        "▼ Edit classes and bounds"
    } else {
        "▶ Edit classes and bounds"
    };
    button(text(label).size(LABEL_SIZE))
        .on_press(ScatterMessage::ToggleEditPanel)
        .into()
}

fn edit_panel(scatter: &ScatterData) -> Element<'_, ScatterMessage> {
    let mut col = column![text("Bounds").size(LABEL_SIZE), bounds_editor(&scatter.bounding)]
        .spacing(6.0);

    col = col.push(text("Classes").size(LABEL_SIZE));
    for (i, cluster) in scatter.classes.iter().enumerate() {
        col = col.push(class_editor(i, cluster));
    }
    col = col.push(button(text("Add class").size(LABEL_SIZE)).on_press(ScatterMessage::AddClass));

    container(col)
        .padding(6.0)
        .style(container::bordered_box)
        .into()
}

fn bounds_editor<'a>(bounding: &Bounding) -> Element<'a, ScatterMessage> {
    fn edit_one_value<'a>(label: &str, field: BoundField, value: f64) -> Element<'a, ScatterMessage> {
        row![
            text(format!("{label} {value:.3}")).size(LABEL_SIZE).width(Length::Fixed(90.0)),
            slider(-BOUND_LIMIT..=BOUND_LIMIT, value, move |v| ScatterMessage::SetBound(field, v))
                .step(0.001)
                .width(Length::Fixed(160.0)),
        ]
        .spacing(4.0)
        .align_y(Alignment::Center)
        .into()
    }

    column![
        row![
            edit_one_value("Min x", BoundField::MinX, bounding.min[0]),
            edit_one_value("Min y", BoundField::MinY, bounding.min[1]),
        ]
        .spacing(12.0),
        row![
            edit_one_value("Max x", BoundField::MaxX, bounding.max[0]),
            edit_one_value("Max y", BoundField::MaxY, bounding.max[1]),
        ]
        .spacing(12.0),
    ]
    .spacing(4.0)
    .into()
}

fn class_editor(index: usize, cluster: &ScatterCluster) -> Element<'_, ScatterMessage> {
    let swatch_color = Color::from(cluster.color);
    let swatch = container("")
        .width(Length::Fixed(14.0))
        .height(Length::Fixed(14.0))
        .style(move |_| swatch_color.into());

    row![
        text_input("Name", &cluster.name)
            .on_input(move |name| ScatterMessage::RenameClass(index, name))
            .size(LABEL_SIZE)
            .width(Length::Fixed(100.0)),
        swatch,
        color_sliders(index, cluster.color),
        button(text("Clear").size(LABEL_SIZE)).on_press(ScatterMessage::ClearClass(index)),
        button(text("Delete").size(LABEL_SIZE)).on_press(ScatterMessage::DeleteClass(index)),
    ]
    .spacing(6.0)
    .align_y(Alignment::Center)
    .into()
}

/// One slider per RGB channel.
fn color_sliders<'a>(index: usize, color: Rgb) -> Element<'a, ScatterMessage> {
    let channel = |c: usize| {
        slider(0.0..=255.0, color.0[c] as f64, move |v: f64| {
            let mut channels = color.0;
            channels[c] = v.round().clamp(0.0, 255.0) as u8;
            ScatterMessage::SetClassColor(index, Rgb(channels))
        })
        .step(1.0)
        .width(Length::Fixed(60.0))
    };
    row![channel(0), channel(1), channel(2)].spacing(2.0).into()
}

fn brush_controls(presenter: &ScatterPresenter) -> Element<'_, ScatterMessage> {
    let brush_size = presenter.gui_options().random_brush_size;
    row![
        text(format!("Brush size {brush_size:.2}")).size(LABEL_SIZE),
        slider(MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE, brush_size, ScatterMessage::SetBrushSize)
            .step(0.01)
            .width(Length::Fixed(160.0)),
        button(text("Undo").size(LABEL_SIZE))
            .on_press_maybe(presenter.can_undo().then_some(ScatterMessage::Undo)),
        button(text("Redo").size(LABEL_SIZE))
            .on_press_maybe(presenter.can_redo().then_some(ScatterMessage::Redo)),
    ]
    .spacing(8.0)
    .align_y(Alignment::Center)
    .into()
}

fn plot_area(presenter: &ScatterPresenter) -> Element<'_, ScatterMessage> {
    let (Some(handle), Some(transformer)) = (presenter.image_handle(), presenter.transformer())
    else {
        return text("Plot not rendered").into();
    };
    let [width, height] = transformer.image_size_px();
    let width = Length::Fixed(width as f32);
    let height = Length::Fixed(height as f32);

    let plot: Element<'_, ScatterMessage> = image(handle.clone())
        .width(width)
        .height(height)
        .into();

    #[cfg(feature = "canvas")]
    let plot: Element<'_, ScatterMessage> = {
        use crate::brush_overlay::BrushOverlay;
        let overlay = BrushOverlay {
            center: presenter.hover_position(),
            radius_px: presenter.brush().radius_px(transformer.image_size_px()[0]),
        };
        iced::widget::stack![plot, overlay.view(width, height)].into()
    };

    mouse_area(plot)
        .interaction(iced::mouse::Interaction::Crosshair)
        .on_move(|p| ScatterMessage::PlotMoved([p.x as f64, p.y as f64]))
        .on_press(ScatterMessage::PlotPressed)
        .on_release(ScatterMessage::PlotReleased)
        .on_exit(ScatterMessage::PlotExited)
        .into()
}
