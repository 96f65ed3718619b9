// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart lifecycle demos for `trellis_charts`.
//!
//! Writes `trellis_demo.html` with the axis SVG of every pass.

mod html;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::level_filters::LevelFilter;
use trellis_charts::{
    AxisDataType, ChartConfig, ChartContext, ChartInstance, ChartResult, ChartType, ContextStore,
    Dataset, MetadataBus, RenderOutput, Series, TickValue, format_number,
};
use trellis_core::MarkDiff;

use crate::html::Section;

const REPORT: &str = "trellis_demo.html";

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .with_target(false)
        .init();

    let mut bus = MetadataBus::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    bus.subscribe_all(move |chart, m| {
        tracing::info!(
            %chart,
            chart_type = %m.chart_type,
            y_min = m.y_axis_domain[0],
            y_max = m.y_axis_domain[1],
            visible = m.visible_items.len(),
            "metadata delivered"
        );
        sink.borrow_mut().push(format!(
            "{chart}: x={:?} y={:?} visible={:?}",
            m.x_axis_domain, m.y_axis_domain, m.visible_items
        ));
    });

    let demos: [fn(&mut MetadataBus) -> ChartResult<Section>; 5] = [
        annual_line_demo,
        bar_demo,
        monthly_demo,
        gap_demo,
        context_demo,
    ];
    let mut sections = Vec::new();
    for demo in demos {
        match demo(&mut bus) {
            Ok(section) => sections.push(section),
            Err(err) => tracing::error!(%err, "demo failed"),
        }
        bus.flush();
    }

    let mut metadata = Section::new("Delivered metadata");
    for line in log.borrow().iter() {
        metadata.note(line.clone());
    }
    sections.push(metadata);

    let html = html::render_report("Trellis axis demo", &sections);
    match std::fs::write(REPORT, html) {
        Ok(()) => tracing::info!(path = REPORT, "report written"),
        Err(err) => tracing::error!(%err, path = REPORT, "failed to write report"),
    }
}

fn annual(key: &str, from: i32, to: i32, value: impl Fn(i32) -> f64) -> Series {
    (from..=to).fold(Series::new(key), |s, y| s.with_point(y, value(y)))
}

fn summarize(section: &mut Section, pass: &str, chart: &ChartInstance, out: &RenderOutput) {
    let entered = out.diffs.iter().filter(|d| d.is_enter()).count();
    let exited = out.diffs.iter().filter(|d| d.is_exit()).count();
    section.note(format!(
        "{pass}: phase={:?} x_ticks={} y_ticks={} diffs={} (enter {entered}, exit {exited})",
        out.phase,
        out.x_ticks.len(),
        out.y_ticks.len(),
        out.diffs.len(),
    ));
    section.svg(chart.to_svg());
}

/// Twenty years on a time axis, rendered twice, unmounted, and mounted again.
fn annual_line_demo(bus: &mut MetadataBus) -> ChartResult<Section> {
    let mut section = Section::new("Annual time axis");
    let ctx = ChartContext::default();
    let first = Dataset::new()
        .with_series(annual("exports", 2001, 2020, |y| f64::from((y * 37) % 90)))
        .with_series(annual("imports", 2001, 2020, |y| f64::from((y * 13) % 70) - 20.0));
    let second = Dataset::new()
        .with_series(annual("exports", 2001, 2012, |y| f64::from((y * 17) % 120)));

    let config = ChartConfig::default().with_size(640.0, 320.0);
    let mut chart = ChartInstance::mount("annual", config.clone())?;
    let out = chart.render(&first, &ctx, bus)?;
    summarize(&mut section, "first render", &chart, &out);
    let out = chart.render(&second, &ctx, bus)?;
    summarize(&mut section, "new data", &chart, &out);

    let removed = chart.unmount(bus);
    let exits = removed.iter().filter(|d| matches!(d, MarkDiff::Exit { .. })).count();
    section.note(format!("unmount removed {exits} marks"));

    let mut chart = ChartInstance::mount("annual", config)?;
    let out = chart.render(&second, &ctx, bus)?;
    summarize(&mut section, "after remount", &chart, &out);
    Ok(section)
}

/// Bars keep every category that fits and thin the rest.
fn bar_demo(bus: &mut MetadataBus) -> ChartResult<Section> {
    let mut section = Section::new("Band axis thinning");
    let ctx = ChartContext::default();
    for (years, width) in [(3, 560.0), (20, 460.0), (40, 760.0)] {
        let config = ChartConfig::default()
            .with_chart_type(ChartType::Bar)
            .with_size(width, 260.0);
        let mut chart = ChartInstance::mount(format!("bars-{years}"), config)?;
        let data = Dataset::new().with_series(annual("sales", 2001, 2000 + years, |y| {
            f64::from(y - 1990) * 1.5
        }));
        let out = chart.render(&data, &ctx, bus)?;
        summarize(&mut section, &format!("{years} years at {width}px"), &chart, &out);
    }
    Ok(section)
}

/// Monthly keys with an invalid month and measured label density.
fn monthly_demo(bus: &mut MetadataBus) -> ChartResult<Section> {
    let mut section = Section::new("Monthly axis");
    let mut series = Series::new("visits");
    for (i, key) in (2019..=2021)
        .flat_map(|y| (1..=12).map(move |m| format!("{y}{m:02}")))
        .enumerate()
    {
        #[allow(clippy::cast_precision_loss, reason = "small demo index")]
        let v = 200.0 + (i as f64 * 0.7).sin() * 80.0;
        series = series.with_point(key, v);
    }
    series = series.with_point("202013", 9999.0);
    let data = Dataset::new().with_series(series);

    let config = ChartConfig::default()
        .with_axis_data_type(AxisDataType::DateMonthly)
        .with_measured_labels(true)
        .with_grid(true, true)
        .with_size(720.0, 300.0);
    let mut chart = ChartInstance::mount("monthly", config)?;
    let out = chart.render(&data, &ChartContext::default(), bus)?;
    summarize(&mut section, "measured labels", &chart, &out);
    Ok(section)
}

/// Gap charts pad the value axis above the largest value.
fn gap_demo(bus: &mut MetadataBus) -> ChartResult<Section> {
    let mut section = Section::new("Gap chart headroom");
    let config = ChartConfig::default()
        .with_chart_type(ChartType::Gap)
        .with_y_formatter(|t: &TickValue| match t.as_value() {
            Some(v) => format!("{}%", format_number(v)),
            None => String::new(),
        })
        .with_size(520.0, 300.0);
    let mut chart = ChartInstance::mount("gap", config)?;
    let data = Dataset::new()
        .with_series(annual("target", 2010, 2020, |y| f64::from(y - 2000) * 4.0))
        .with_series(annual("actual", 2010, 2020, |y| f64::from(y - 2005) * 3.0));
    let out = chart.render(&data, &ChartContext::default(), bus)?;
    summarize(&mut section, "with headroom", &chart, &out);
    Ok(section)
}

/// A shared context disables a series; every chart reading it rescales.
fn context_demo(bus: &mut MetadataBus) -> ChartResult<Section> {
    let mut section = Section::new("Shared context");
    let mut store = ContextStore::new();
    let data = Dataset::new()
        .with_series(annual("small", 2001, 2010, |y| f64::from(y % 5)))
        .with_series(annual("large", 2001, 2010, |y| f64::from(y % 5) * 100.0));

    let mut chart = ChartInstance::mount("context", ChartConfig::default())?;
    let out = chart.render(&data, &store.snapshot(), bus)?;
    summarize(&mut section, "all series", &chart, &out);

    store.toggle_disabled("large");
    let out = chart.render(&data, &store.snapshot(), bus)?;
    summarize(&mut section, "large disabled", &chart, &out);
    section.note(format!("context version {}", store.version()));
    Ok(section)
}
