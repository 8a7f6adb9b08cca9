//! Dashboard layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, List, ListItem, Paragraph};

use super::runtime::App;
use super::style;

/// Renders the full dashboard frame.
pub fn render(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // body
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Min(10)])
        .split(body[1]);

    render_header(frame, app, rows[0]);
    render_buildings(frame, app, body[0]);
    render_proposal(frame, app, right[0]);
    render_sensor_chart(frame, app, right[1]);
    render_footer(frame, rows[2]);
}

/// Header bar: city, climate factor and city-wide totals.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let totals = app.simulation.as_ref().map_or_else(
        || "no buildings".to_string(),
        |s| {
            format!(
                "energy={:.0} kWh  water={:.0} L  stress={:.2}{}",
                s.total_energy,
                s.total_water,
                s.average_stress,
                s.most_stressed()
                    .map_or_else(String::new, |b| format!("  hotspot={}", b.building_id))
            )
        },
    );
    let header = Line::from(vec![
        Span::styled(
            " REGENERAX ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&app.city.name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " │ climate×{:.1} │ {} ",
            app.city.climate_factor, totals
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Building list with per-building stress bars.
fn render_buildings(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .buildings
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let stress = app.estimate_for(i).map_or(0.0, |e| e.stress_level);
            let row = Line::from(vec![
                Span::raw(format!("{:<26}", b.name)),
                Span::styled(
                    style::stress_bar(stress),
                    Style::default().fg(style::stress_color(stress)),
                ),
                Span::raw(format!(" {stress:.2}")),
            ]);
            let item = ListItem::new(row);
            if i == app.selected {
                item.style(Style::default().bg(style::SELECTED_BG))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Buildings (stress) ")
            .borders(Borders::ALL),
    );
    frame.render_widget(list, area);
}

/// Retrofit proposal for the selected building.
fn render_proposal(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    if let (Some(b), Some(p)) = (app.selected_building(), app.proposal.as_ref()) {
        if let Some(e) = app.estimate_for(app.selected) {
            lines.push(Line::from(format!(
                "  {} {}  energy={:.2}  water={:.2}  materials={:.2}",
                b.category, b.properties.rating(), e.energy_demand, e.water_demand, e.material_flow,
            )));
        }
        if p.is_empty() {
            lines.push(Line::from("  Fully retrofitted: no interventions to propose."));
        }
        for i in &p.interventions {
            lines.push(Line::from(format!(
                "  {:<28} cost={:>9.0}  roi={:>3.0}%",
                i.name, i.cost_estimate, i.roi
            )));
        }
        if let Some(best) = p.best_roi() {
            lines.push(Line::from(format!("  best return: {} ({:.0}%)", best.name, best.roi)));
        }
        let payback = p
            .payback_period
            .map_or_else(|| "n/a".to_string(), |y| format!("{y:.1} yrs"));
        lines.push(Line::from(format!(
            "  invest={:.0}  savings={:.0}  payback={payback}",
            p.total_investment, p.total_savings
        )));
    } else {
        lines.push(Line::from("  No building selected."));
    }

    let title = app
        .selected_building()
        .map_or_else(|| " Proposal ".to_string(), |b| format!(" Proposal: {} ", b.name));
    let paragraph =
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Sensor readings followed by the smoothed forecast.
fn render_sensor_chart(frame: &mut Frame, app: &App, area: Rect) {
    let Some(sensor) = app.current_sensor() else {
        let empty = Paragraph::new("  No sensors.")
            .block(Block::default().title(" Sensor ").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let history: Vec<(f64, f64)> = sensor
        .readings
        .iter()
        .zip(0_u32..)
        .map(|(r, i)| (f64::from(i), r.value))
        .collect();
    let start = history.len().saturating_sub(1) as f64;
    let mut forecast: Vec<(f64, f64)> = history.last().copied().into_iter().collect();
    forecast.extend(
        app.sensor_forecast()
            .into_iter()
            .zip(1_u32..)
            .map(|(v, i)| (start + f64::from(i), v)),
    );

    let y_bounds = style::auto_bounds_y(&history, &forecast);
    let x_hi = forecast.last().map_or(1.0, |p| p.0).max(1.0);
    let unit = sensor.latest_reading().map_or("", |r| r.unit.as_str());

    let datasets = vec![
        Dataset::default()
            .name("Readings")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::HISTORY_COLOR))
            .data(&history),
        Dataset::default()
            .name(format!("Forecast α={:.1}", app.alpha))
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::FORECAST_COLOR))
            .data(&forecast),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" Sensor {} ({:?}) ", sensor.id, sensor.kind))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("reading")
                .bounds([0.0, x_hi])
                .labels(vec!["0".to_string(), format!("{}", x_hi as u32)]),
        )
        .y_axis(
            Axis::default()
                .title(unit)
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  ↑/↓:Building  Tab:Sensor  +/-:Alpha  r:Re-simulate",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
