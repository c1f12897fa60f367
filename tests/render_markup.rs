use std::fs;
use surveybar::render::html::{escape_html, render_bar, render_group, render_legend, render_report};
use surveybar::render::svg::{render_svg, write_svg};
use surveybar::{BarComposer, GroupSeries, LayoutConfig, RenderOptions, ReportLayout};

fn five_way_report() -> ReportLayout {
    let mut composer = BarComposer::new(LayoutConfig::default()).unwrap();
    let groups = vec![
        GroupSeries::new(
            "Everyone",
            ["A", "B", "C", "D", "E"]
                .iter()
                .map(|l| (l.to_string(), 200))
                .collect(),
        ),
        GroupSeries::new(
            "Nobody",
            vec![("A".to_string(), 0), ("B".to_string(), 0)],
        ),
    ];
    let bars = composer.compose_grouped(&groups).unwrap();
    composer.finish(bars)
}

#[test]
fn inside_only_bar_is_a_plain_row() {
    let mut composer = BarComposer::new(LayoutConfig::default()).unwrap();
    let bar = composer.compose(None, &[("Yes", 6000), ("No", 4000)]).unwrap();
    let opts = RenderOptions {
        unit: "人".into(),
        ..RenderOptions::default()
    };
    let html = render_bar(&bar, &opts);
    assert!(html.starts_with(r#"<div class="bar-row">"#));
    assert!(html.contains(r#"<span class="seg-label">Yes 60.0%</span>"#));
    assert!(html.contains(r#"<div class="bar-right">10,000人</div>"#));
    assert!(!html.contains("outside-label"));
}

#[test]
fn tiered_labels_get_layers_and_leader_lines() {
    let report = five_way_report();
    let html = render_bar(&report.bars[0], &RenderOptions::default());
    assert!(html.starts_with(r#"<div class="bar-container">"#));

    let top = html.find("outside-labels-top").unwrap();
    let bar = html.find("stacked-bar").unwrap();
    let bottom = html.find("outside-labels-bottom").unwrap();
    assert!(top < bar && bar < bottom);

    // Above the bar: rows 3, 2, 1 from the outside in.
    let l3 = html.find("label-layer-3").unwrap();
    let l2 = html.find("label-layer-2").unwrap();
    let l1 = html.find("label-layer-1").unwrap();
    assert!(l3 < l2 && l2 < l1 && l1 < bar);

    // C (tier 1) and E (tier 2) above cross 2 + 3 rows; D below crosses 2.
    assert_eq!(html.matches("leader-line to-bottom").count(), 5);
    assert_eq!(html.matches("leader-line to-top").count(), 2);
    assert_eq!(html.matches(r#"class="outside-label""#).count(), 5);
    assert_eq!(html.matches(r#"<span class="seg-label">20.0%</span>"#).count(), 5);
}

#[test]
fn groups_skip_empty_bars_and_show_headings() {
    let report = five_way_report();
    let opts = RenderOptions::default();
    let html = render_group("By grade", &report.bars, &opts);
    assert!(html.starts_with(r#"<div class="q-subheading">By grade</div>"#));
    assert!(html.contains("Everyone = 1,000"));
    assert!(!html.contains("Nobody"));

    let html = render_group("Empty", &report.bars[1..], &opts);
    assert!(html.contains(r#"<div class="muted">No data</div>"#));
}

#[test]
fn legend_and_text_are_escaped() {
    let mut composer = BarComposer::new(LayoutConfig::default()).unwrap();
    let bar = composer
        .compose(Some("<Q1>"), &[("A & B", 90), ("\"C\"", 10)])
        .unwrap();
    let report = composer.finish(vec![bar]);
    let legend = render_legend(&report.legend);
    assert!(legend.contains("A &amp; B"));
    assert!(legend.contains("&quot;C&quot;"));
    let html = render_report(&report, &RenderOptions::default());
    assert!(html.contains("&lt;Q1&gt; = 100"));
    assert!(!html.contains("<Q1>"));
    assert_eq!(escape_html("it's"), "it&#39;s");
}

#[test]
fn svg_preview_contains_every_label() {
    let report = five_way_report();
    let cfg = LayoutConfig::default();
    let svg = render_svg(&report, &cfg, &RenderOptions::default()).unwrap();
    assert!(svg.contains("<svg"));
    for label in ["Everyone", "Nobody", "No data", "20.0%"] {
        assert!(svg.contains(label), "missing {label}");
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.svg");
    write_svg(&report, &cfg, &RenderOptions::default(), &path).unwrap();
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "svg has content");
}
