//! Drives a "before" and an "after" page through the harness and compares them.

use probe_dom::Document;
use probe_harness::{Harness, HarnessConfig, PointerEvent};
use probe_metrics::{LayoutMetrics, Thresholds, compare, evaluate, summarize};

const BEFORE: &str = r#"<html><head><style>
  .task { height: 40px; margin-bottom: 4px; }
  .task.wide { margin-bottom: 12px; }
  .task { height: 40px; margin-bottom: 4px; }
  .task-actions button { height: 22px; }
  .task-actions .danger { height: 30px; }
  .task-actions button { color: black; }
</style>
<script id="case-data" type="application/json">{"initial_dom":{"items":[],"mutation":"reorder_on_priority"}}</script>
</head><body><ul data-task-list>
  <li class="task wide" data-task-item data-task-id="1"><span class="task-priority" data-priority="low"></span>
    <span data-icon>o</span><div class="task-title">One</div>
    <div class="task-actions"><button>Edit</button><button class="danger">Delete</button></div></li>
  <li class="task" data-task-item data-task-id="2"><span class="task-priority" data-priority="high"></span>
    <span data-icon>o</span><div class="task-title">Two</div>
    <div class="task-actions"><button>Edit</button><button class="danger">Delete</button></div></li>
  <li class="task" data-task-item data-task-id="3"><span class="task-priority" data-priority="medium"></span>
    <span data-icon>o</span><div class="task-title">Three</div></li>
</ul></body></html>"#;

const AFTER: &str = r#"<html><head><style>
  .task { display: flex; align-items: center; height: 40px; margin-bottom: 8px; }
  [data-task-actions] .btn { height: 28px; }
</style>
<script id="case-data" type="application/json">{"initial_dom":{"items":[],"mutation":"reorder_on_priority"}}</script>
</head><body><ul data-task-list>
  <li class="task" data-task-item data-task-id="1"><span class="task-priority" data-priority="low"></span>
    <span data-icon>o</span><span class="task-title">One</span>
    <div data-task-actions><button class="btn">Edit</button><button class="btn">Delete</button></div></li>
  <li class="task" data-task-item data-task-id="2"><span class="task-priority" data-priority="high"></span>
    <span data-icon>o</span><span class="task-title">Two</span>
    <div data-task-actions><button class="btn">Edit</button><button class="btn">Delete</button></div></li>
  <li class="task" data-task-item data-task-id="3"><span class="task-priority" data-priority="medium"></span>
    <span data-icon>o</span><span class="task-title">Three</span></li>
</ul></body></html>"#;

async fn measure(html: &str, config: HarnessConfig) -> LayoutMetrics {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut harness = Harness::boot(Document::parse_html(html).unwrap(), config).await;
    let doc = harness.document();
    let first_row = doc.query_selector(doc.root(), "[data-task-item]").unwrap();
    harness.dispatch(PointerEvent::Enter(first_row)).await;
    summarize(&harness.capture_layout(), &harness.measure_global())
}

#[tokio::test(start_paused = true)]
async fn after_page_passes_where_before_page_fails() {
    let before = measure(BEFORE, HarnessConfig::delayed_hover()).await;
    let after = measure(AFTER, HarnessConfig::default()).await;
    let thresholds = Thresholds::default();

    // Stacked icon/title blocks and mixed button heights.
    assert_eq!(before.misaligned_icons, 3);
    assert_eq!(before.button_height_range, 8.0);
    assert_eq!(before.css_collisions, 2);
    assert!((before.hover_latency - 48.0).abs() < 1.0);
    // Rows are 2, 3, 1 after reordering; only row 1 has the wide margin, and it is last.
    assert_eq!(before.spacing_values, [4.0, 4.0]);
    let before_verdict = evaluate(&before, &thresholds);
    assert!(!before_verdict.overall);
    assert!(before_verdict.spacing && before_verdict.dom);

    assert_eq!(after.misaligned_icons, 0);
    assert_eq!(after.button_height_range, 0.0);
    assert_eq!(after.css_collisions, 0);
    assert_eq!(after.hover_latency, 0.0);
    assert!(evaluate(&after, &thresholds).overall);

    let report = compare(&before, &after, &thresholds).to_markdown();
    assert!(report.contains("|Misaligned Icons|3.000|0.000|-3.000|"));
    assert!(report.contains("|overall|fail|pass|"));
    assert!(report.contains("- Hover feedback is faster."));
}
