//! Integration tests: the scheduler driving a terminal surface, and static
//! rendering of whole documents.

use kvlist::{
    GrammarStore, LineRange, PaintSurface, RenderScheduler, RepaintReason, Settings, TextDocument,
    Update,
};
use kvlist_render::{display_width, StaticRenderer, TextSurface};

// ============================================================================
// Incremental rendering
// ============================================================================

fn tick(
    scheduler: &mut RenderScheduler<usize>,
    doc: &TextDocument,
    surface: &mut TextSurface,
    store: &GrammarStore,
    update: Update,
) -> Option<RepaintReason> {
    let outcome = scheduler.update(doc, surface, store.grammar(), update);
    scheduler.after_paint(&*surface);
    outcome.repaint
}

fn value_column(line: &str, value: &str) -> usize {
    display_width(&line[..line.find(value).unwrap()])
}

#[test]
fn columns_align_after_first_measurement() {
    let store = GrammarStore::default();
    let doc = TextDocument::from_text("# Profile\n\n- Name: Ada\n- Born: 1815\n- Occupation: Mathematician");
    let mut surface = TextSurface::new(100);
    let mut scheduler = RenderScheduler::new();

    tick(&mut scheduler, &doc, &mut surface, &store, Update::doc_changed());
    tick(&mut scheduler, &doc, &mut surface, &store, Update::doc_changed());

    let rendered = surface.render(&doc);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "# Profile");
    let column = value_column(lines[2], "Ada");
    assert_eq!(value_column(lines[3], "1815"), column);
    assert_eq!(value_column(lines[4], "Mathematician"), column);
    // "Occupation:" plus 20px of key padding at 8px per cell.
    assert_eq!(column, 15);
}

#[test]
fn cursor_line_is_left_as_source() {
    let store = GrammarStore::default();
    let doc = TextDocument::from_text("- a: 1\n- b\n- c: 3").with_cursor(1);
    let mut surface = TextSurface::new(80);
    let mut scheduler = RenderScheduler::new();
    tick(&mut scheduler, &doc, &mut surface, &store, Update::idle());

    let rendered = surface.render(&doc);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[1], "- b");
    assert!(!lines[0].starts_with('-'));
    assert!(!lines[2].starts_with('-'));
}

#[test]
fn narrow_surface_caps_key_column() {
    let store = GrammarStore::new(Settings {
        max_key_width: 25,
        ..Settings::default()
    });
    let doc = TextDocument::from_text("- A rather long key: v\n- k: w");
    let mut surface = TextSurface::new(40);
    let mut scheduler = RenderScheduler::new();
    tick(&mut scheduler, &doc, &mut surface, &store, Update::idle());
    tick(&mut scheduler, &doc, &mut surface, &store, Update::doc_changed());

    // 25% of 40 columns is 10.
    let rendered = surface.render(&doc);
    let first = rendered.lines().next().unwrap();
    assert_eq!(first, "A rather … v");
}

#[test]
fn styled_rows_share_the_cached_row_width() {
    let store = GrammarStore::default();
    let doc = TextDocument::from_text("- a: 1\n- bbb: 22");
    let mut surface = TextSurface::new(80).with_styling(true);
    let mut scheduler = RenderScheduler::new();
    for _ in 0..3 {
        tick(&mut scheduler, &doc, &mut surface, &store, Update::doc_changed());
    }

    // Key cell 7 cells, widest row 7 + 2 cells of value plus 24px of
    // horizontal padding: 96px, 12 cells.
    assert_eq!(scheduler.cache().get(0).row_width, 96.0);
    let rendered = surface.render(&doc);
    let widths: Vec<usize> = rendered.lines().map(display_width).collect();
    assert_eq!(widths, vec![12, 12]);
}

#[test]
fn scrolling_only_paints_visible_blocks() {
    let store = GrammarStore::default();
    let doc = TextDocument::from_text("- a: 1\n\ntext\n\n- b: 2")
        .with_viewport(Some(LineRange::new(3, 4)));
    let mut surface = TextSurface::new(80);
    let mut scheduler = RenderScheduler::new();
    tick(&mut scheduler, &doc, &mut surface, &store, Update::viewport_changed());

    let lines: Vec<usize> = surface.widgets().map(|(line, _)| line).collect();
    assert_eq!(lines, vec![4]);
}

#[test]
fn surface_width_feeds_style_cap() {
    let store = GrammarStore::default();
    let doc = TextDocument::from_text("- k: v");
    let mut surface = TextSurface::new(50);
    let mut scheduler = RenderScheduler::new();
    tick(&mut scheduler, &doc, &mut surface, &store, Update::idle());

    let (_, widget) = surface.widgets().next().unwrap();
    assert_eq!(widget.style.max_key_width, Some(surface.width() / 2.0));
}

// ============================================================================
// Static rendering
// ============================================================================

#[test]
fn static_render_whole_document() {
    let text = "\
# Server

- host: db01
- port: 5432

Notes:
- first
- second
";
    let out = StaticRenderer::new(kvlist::Grammar::default()).render(text, 60);
    assert_eq!(
        out,
        "\
# Server

host:  db01
port:  5432

Notes:
- first
- second
"
    );
}

#[test]
fn static_render_with_bullet_and_custom_delimiter() {
    let settings = Settings::from_yaml(
        "
bullet_marker: '+'
delimiters: ['->']
display_bullet: true
display_delimiter: false
",
    )
    .unwrap();
    let out = StaticRenderer::from_settings(&settings).render("+ in -> out\n+ up -> down", 40);
    assert_eq!(out, "+ in  out\n+ up  down");
}

#[test]
fn static_tables_are_structured() {
    let renderer = StaticRenderer::new(kvlist::Grammar::default());
    let tables = renderer.tables("- a: 1\n\n  - b: 2\n  - c: 3");
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].indent, "  ");
    assert_eq!(tables[1].rows.len(), 2);
    assert_eq!(tables[1].rows[1].bullet_text, "-");
}

#[test]
fn static_render_styled_bolds_keys() {
    let renderer = StaticRenderer::new(kvlist::Grammar::default()).with_styling(true);
    let out = renderer.render("- a: 1", 40);
    assert!(out.contains("\x1b[1m"));
    assert_eq!(console::strip_ansi_codes(&out), "a:  1");
}
