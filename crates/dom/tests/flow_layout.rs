use probe_dom::{Document, NodeId};

const TASK_PAGE: &str = r#"<!doctype html>
<html>
<head>
  <style>
    body { margin: 0; }
    .task-row { display: flex; align-items: center; height: 40px; margin-bottom: 8px; }
    .task-row.tall { height: 60px; }
    .hidden { display: none; }
    .task-actions button { height: 28px; }
  </style>
</head>
<body>
  <ul data-task-list>
    <li class="task-row" data-task-item data-task-id="a">
      <span data-icon>*</span><span class="task-title">Write report</span>
      <div class="task-actions"><button>Edit</button><button>Delete</button></div>
    </li>
    <li class="task-row tall" data-task-item data-task-id="b">
      <span data-icon>*</span><span class="task-title">Review</span>
    </li>
    <li class="task-row hidden" data-task-item data-task-id="c"></li>
  </ul>
</body>
</html>"#;

fn row(doc: &Document, id: &str) -> NodeId {
    doc.query_selector(doc.root(), &format!("[data-task-id={id}]"))
        .unwrap()
}

fn parsed() -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    Document::parse_html(TASK_PAGE).unwrap()
}

/// Rows stack vertically with their margins; the cascade picks the more specific height.
#[test]
fn rows_stack_with_cascaded_heights() {
    let doc = parsed();
    let layout = doc.compute_layout(800.0);
    let first = layout.bounding_client_rect(row(&doc, "a"));
    let second = layout.bounding_client_rect(row(&doc, "b"));
    assert_eq!(first.top(), 0.0);
    assert_eq!(first.height, 40.0);
    assert_eq!(second.top(), 48.0);
    assert_eq!(second.height, 60.0);
    assert_eq!(first.width, 800.0);
}

/// `display: none` rows get no box, which reads as an all-zero rect.
#[test]
fn hidden_rows_report_zero_rect() {
    let doc = parsed();
    let layout = doc.compute_layout(800.0);
    let hidden = row(&doc, "c");
    assert!(layout.layout_box(hidden).is_none());
    let rect = layout.bounding_client_rect(hidden);
    assert_eq!((rect.top(), rect.bottom(), rect.height), (0.0, 0.0, 0.0));
}

/// Flex children share one line and are centred inside the explicit row height.
#[test]
fn flex_children_are_centred_on_one_line() {
    let doc = parsed();
    let layout = doc.compute_layout(800.0);
    let first = row(&doc, "a");
    let icon = doc.query_selector(first, "[data-icon]").unwrap();
    let title = doc.query_selector(first, ".task-title").unwrap();
    let icon_rect = layout.bounding_client_rect(icon);
    let title_rect = layout.bounding_client_rect(title);
    assert_eq!(icon_rect.top(), title_rect.top());
    assert!(icon_rect.left() < title_rect.left());
    // The tallest item is the 28px action group, so the line is 28px inside a 40px row.
    assert_eq!(icon_rect.top(), 10.0);

    let buttons = doc.query_selector_all(first, ".task-actions button");
    assert_eq!(buttons.len(), 2);
    for button in buttons {
        assert_eq!(layout.bounding_client_rect(button).height, 28.0);
    }
}

/// Inline style overrides rules from the sheet.
#[test]
fn inline_style_wins_over_sheet() {
    let mut doc = parsed();
    let first = row(&doc, "a");
    doc.set_style_property(first, "height", "30px").unwrap();
    let layout = doc.compute_layout(800.0);
    assert_eq!(layout.bounding_client_rect(first).height, 30.0);
    assert_eq!(layout.bounding_client_rect(row(&doc, "b")).top(), 38.0);
}

/// A layout taken before a change keeps the old geometry; a new pass sees the change.
#[test]
fn reordering_moves_boxes_in_the_next_pass() {
    let mut doc = parsed();
    let list = doc.query_selector(doc.root(), "[data-task-list]").unwrap();
    let first = row(&doc, "a");
    let before = doc.compute_layout(800.0);
    doc.append_child(list, first).unwrap();
    let after = doc.compute_layout(800.0);
    assert_eq!(before.bounding_client_rect(first).top(), 0.0);
    assert_eq!(after.bounding_client_rect(row(&doc, "b")).top(), 0.0);
    assert_eq!(after.bounding_client_rect(first).top(), 68.0);
}
