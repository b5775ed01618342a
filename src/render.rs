// Static HTML page with one Plotly figure per chart section.

use crate::charts::{Axis as RefAxis, ChartKind, ChartSpec, Palette, ReferenceLine};
use crate::config::ReportConfig;
use crate::dashboard::{Section, SectionBody};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::common::{ColorScale, ColorScalePalette, DashType, Fill, Line, Marker, Mode};
use plotly::layout::{Annotation, Axis, Layout, Shape, ShapeLine, ShapeType};
use plotly::{Bar, BoxPlot, HeatMap, Pie, Plot, Scatter, ScatterPolar};
use serde_json::{json, Value};
use tracing::warn;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = "body{background-color:#f5f7fa;font-family:sans-serif;margin:0}\
.block-container{padding:2rem 2rem}\
h1,h2,h3,h4{color:#003366}\
.credit{color:#555}\
.placeholder{color:#8a6d3b;background:#fcf8e3;padding:1rem;border-radius:4px}\
.error{color:#a94442;background:#f2dede;padding:1rem;border-radius:4px}";

/// JSON that is safe to embed inside a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn reference_marks(lines: &[ReferenceLine]) -> (Vec<Shape>, Vec<Annotation>) {
    lines
        .iter()
        .map(|line| {
            let stroke = ShapeLine::new().color(line.color.clone()).dash(DashType::Dash);
            match line.axis {
                RefAxis::Y => (
                    Shape::new()
                        .shape_type(ShapeType::Line)
                        .x_ref("paper")
                        .y_ref("y")
                        .x0(0.0)
                        .x1(1.0)
                        .y0(line.value)
                        .y1(line.value)
                        .line(stroke),
                    Annotation::new()
                        .x_ref("paper")
                        .y_ref("y")
                        .x(0.0)
                        .y(line.value)
                        .text(line.label.as_str())
                        .show_arrow(false),
                ),
                RefAxis::X => (
                    Shape::new()
                        .shape_type(ShapeType::Line)
                        .x_ref("x")
                        .y_ref("paper")
                        .x0(line.value)
                        .x1(line.value)
                        .y0(0.0)
                        .y1(1.0)
                        .line(stroke),
                    Annotation::new()
                        .x_ref("x")
                        .y_ref("paper")
                        .x(line.value)
                        .y(1.0)
                        .text(line.label.as_str())
                        .show_arrow(false),
                ),
            }
        })
        .unzip()
}

fn layout_for(spec: &ChartSpec) -> Layout {
    let (shapes, annotations) = reference_marks(&spec.reference_lines);
    let mut layout = Layout::new()
        .title(spec.title.as_str())
        .width(spec.width as usize)
        .height(spec.height as usize)
        .x_axis(Axis::new().title(spec.bindings.x.as_str()))
        .shapes(shapes)
        .annotations(annotations);
    if let Some(y) = &spec.bindings.y {
        layout = layout.y_axis(Axis::new().title(y.as_str()));
    }
    if let Some(bg) = &spec.paper_background {
        layout = layout.paper_background_color(bg.clone()).plot_background_color("white");
    }
    layout
}

fn field(spec: &ChartSpec, name: &Option<String>) -> Vec<Value> {
    name.as_deref().map(|n| spec.column(n)).unwrap_or_default()
}

fn label(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scale_for(palette: &Palette) -> ColorScale {
    ColorScale::Palette(match palette {
        Palette::Greens => ColorScalePalette::Greens,
        Palette::Reds => ColorScalePalette::Reds,
        Palette::YlOrRd | Palette::Oranges => ColorScalePalette::YlOrRd,
        _ => ColorScalePalette::Viridis,
    })
}

/// Sums `z` over each distinct (x, y) pair. Axes keep first-seen order.
fn grid(xs: &[Value], ys: &[Value], zs: &[Value]) -> (Vec<String>, Vec<String>, Vec<Vec<Option<f64>>>) {
    let mut cols: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();
    let mut cells: Vec<(usize, usize, f64)> = Vec::new();
    for ((x, y), z) in xs.iter().zip(ys).zip(zs) {
        let (x, y) = (label(x), label(y));
        let xi = cols.iter().position(|c| *c == x).unwrap_or_else(|| {
            cols.push(x);
            cols.len() - 1
        });
        let yi = rows.iter().position(|r| *r == y).unwrap_or_else(|| {
            rows.push(y);
            rows.len() - 1
        });
        cells.push((xi, yi, z.as_f64().unwrap_or(0.0)));
    }
    let mut z = vec![vec![None; cols.len()]; rows.len()];
    for (xi, yi, v) in cells {
        let cell: &mut Option<f64> = &mut z[yi][xi];
        *cell = Some(cell.unwrap_or(0.0) + v);
    }
    (cols, rows, z)
}

fn plot_for(spec: &ChartSpec) -> Plot {
    let b = &spec.bindings;
    let x = spec.column(&b.x);
    let y = field(spec, &b.y);
    let first = spec.palette.colors().first().cloned().unwrap_or_default();
    let mut plot = Plot::new();
    match spec.kind {
        ChartKind::Line => plot.add_trace(
            Scatter::new(x, y)
                .mode(Mode::LinesMarkers)
                .name(b.y.as_deref().unwrap_or_default())
                .line(Line::new().color(first)),
        ),
        ChartKind::Bar => {
            let colors = spec.palette.cycle(x.len());
            plot.add_trace(Bar::new(x, y).marker(Marker::new().color_array(colors)));
        }
        ChartKind::Scatter => {
            let colors = spec.palette.cycle(x.len());
            let text: Vec<String> = field(spec, &b.color).iter().map(label).collect();
            plot.add_trace(
                Scatter::new(x, y)
                    .mode(Mode::Markers)
                    .name(b.color.as_deref().unwrap_or_default())
                    .text_array(text)
                    .marker(Marker::new().color_array(colors).size(10)),
            );
            if let Some(trend) = &spec.trend_line {
                let (tx, ty): (Vec<f64>, Vec<f64>) = trend.points.iter().map(|p| (p.x, p.y)).unzip();
                plot.add_trace(Scatter::new(tx, ty).mode(Mode::Lines).name("Trend line"));
            }
        }
        ChartKind::Box => {
            // one box per group, in row order
            let mut groups: Vec<(String, Vec<Value>)> = Vec::new();
            for (key, val) in x.iter().map(label).zip(y) {
                match groups.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, vals)) => vals.push(val),
                    None => groups.push((key, vec![val])),
                }
            }
            let colors = spec.palette.cycle(groups.len());
            for ((name, vals), color) in groups.into_iter().zip(colors) {
                plot.add_trace(BoxPlot::new(vals).name(name.as_str()).marker(Marker::new().color(color)));
            }
        }
        ChartKind::Heatmap => {
            let (cols, rows, z) = grid(&x, &y, &field(spec, &b.z));
            plot.add_trace(HeatMap::new(cols, rows, z).color_scale(scale_for(&spec.palette)));
        }
        ChartKind::Polar => plot.add_trace(
            ScatterPolar::new(x, y)
                .fill(Fill::ToSelf)
                .fill_color(first.clone())
                .opacity(0.6)
                .line(Line::new().color(first).width(2.0)),
        ),
        ChartKind::Pie => {
            let labels: Vec<String> = x.iter().map(label).collect();
            plot.add_trace(Pie::new(y).labels(labels));
        }
        // built by hand in `choropleth_figure`
        ChartKind::Choropleth => {}
    }
    plot.set_layout(layout_for(spec));
    plot
}

/// plotly-rs has no choropleth trace, so this figure is written as JSON.
fn choropleth_figure(spec: &ChartSpec) -> Result<Value, serde_json::Error> {
    let scale: Vec<Value> = spec
        .palette
        .colorscale()
        .into_iter()
        .map(|(t, c)| json!([t, c]))
        .collect();
    let mut layout = serde_json::to_value(layout_for(spec))?;
    layout["geo"] = json!({ "showframe": false, "projection": { "type": "natural earth" } });
    Ok(json!({
        "data": [{
            "type": "choropleth",
            "locationmode": "country names",
            "locations": spec.column(&spec.bindings.x),
            "z": field(spec, &spec.bindings.y),
            "colorscale": scale
        }],
        "layout": layout
    }))
}

/// Plotly figure (`{data, layout}`) for one chart description.
pub fn plotly_figure(spec: &ChartSpec) -> Result<Value, serde_json::Error> {
    if spec.kind == ChartKind::Choropleth {
        return choropleth_figure(spec);
    }
    let mut fig: Value = serde_json::from_str(&plot_for(spec).to_json())?;
    match spec.kind {
        ChartKind::Pie => {
            let colors = spec.palette.cycle(spec.rows.len());
            if let Some(trace) = fig["data"].get_mut(0) {
                trace["marker"] = json!({ "colors": colors });
            }
        }
        ChartKind::Polar => {
            fig["layout"]["polar"] = json!({
                "radialaxis": { "visible": true, "tickfont": { "color": "red" } },
                "angularaxis": { "tickfont": { "color": "limegreen" } }
            });
        }
        _ => {}
    }
    Ok(fig)
}

fn chart_markup(number: u8, spec: &ChartSpec) -> Markup {
    let id = format!("chart-{number}");
    match plotly_figure(spec) {
        Ok(fig) => {
            let script = format!(
                "(function(){{var f={};Plotly.newPlot(\"{id}\",f.data,f.layout,{{responsive:true}});}})();",
                script_json(&fig)
            );
            html! {
                div id=(id) {}
                script { (PreEscaped(script)) }
            }
        }
        Err(e) => {
            warn!(section = number, error = %e, "chart could not be encoded");
            html! {
                p class="placeholder" { "This chart could not be drawn: " (e.to_string()) }
            }
        }
    }
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                script src=(PLOTLY_CDN) {}
                style { (PreEscaped(STYLE)) }
            }
            body {
                div class="block-container" { (body) }
            }
        }
    }
    .into_string()
}

/// The full dashboard page.
pub fn render_dashboard(sections: &[Section], config: &ReportConfig) -> String {
    let body = html! {
        h1 { (config.page_title) }
        h3 { (config.subtitle) }
        p class="credit" { strong { (config.credit) } }
        p class="intro" { (config.intro) }
        hr;
        @for s in sections {
            section id=(format!("section-{}", s.number)) {
                h2 { (s.number) ". " (s.heading) }
                @match &s.body {
                    SectionBody::Chart(spec) => {
                        (chart_markup(s.number, spec))
                    },
                    SectionBody::Placeholder { reason } => {
                        p class="placeholder" { "This section has no data: " (reason) }
                    },
                    SectionBody::Narrative { points } => {
                        ul {
                            @for p in points {
                                li { strong { (p.topic) } ": " (p.text) }
                            }
                        }
                    },
                }
            }
        }
    };
    page(&config.page_title, body)
}

/// Shown instead of the dashboard when the data could not be loaded.
pub fn render_error_page(message: &str, config: &ReportConfig) -> String {
    let body = html! {
        h1 { (config.page_title) }
        p class="error" { "The sales data could not be loaded: " (message) }
    };
    page(&config.page_title, body)
}
