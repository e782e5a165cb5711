//! Shadow-tree markup for each view.
//!
//! Parts carry the classes [`selector`] resolves, so measuring and
//! animating find the same nodes the markup produced. Clickable nodes carry
//! a `data-action` the delegated listener in [`crate::dom`] dispatches.
//!
//! Sizes that follow the layout (widths, aspect padding, cursor offset) are
//! kept out of the markup and returned by [`styles`] instead, so a resize
//! patches inline styles and never rebuilds the tree under a playing frame.

use videobox_core::{
    geometry::{percent, px},
    icon::IconShape,
    view::{ButtonSlot, ButtonView, PaginationView, PlayerView, SliderView, TriggerView},
    Part, PlayerKind, View,
};

/// CSS selector of a part inside the shadow root
pub fn selector(part: Part) -> String {
    match part {
        Part::Host => ":host".to_string(),
        Part::Background => ".vbx-background".to_string(),
        Part::Wrap => ".vbx-wrap".to_string(),
        Part::Sizer => ".vbx-sizer".to_string(),
        Part::Content => ".vbx-content".to_string(),
        Part::Video => ".vbx-video".to_string(),
        Part::Bottom => ".vbx-bottom".to_string(),
        Part::Item(i) => format!("[data-item=\"{}\"]", i),
    }
}

/// Slot name a light-DOM child is projected through
pub fn item_slot(index: usize) -> String {
    format!("vbx-item-{}", index)
}

/// An inline style applied to every node matching `selector`
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: &'static str,
    pub property: &'static str,
    /// `None` removes the property
    pub value: Option<String>,
}

impl StyleRule {
    fn new(selector: &'static str, property: &'static str, value: Option<String>) -> Self {
        Self {
            selector,
            property,
            value,
        }
    }
}

/// Layout-dependent styles of `view`
pub fn styles(view: &View) -> Vec<StyleRule> {
    match view {
        View::Player(v) => vec![
            StyleRule::new(".vbx-wrap", "max-width", v.width.map(px)),
            StyleRule::new(".vbx-sizer", "padding-bottom", Some(percent(v.aspect_percent))),
        ],
        View::Slider(v) => vec![
            StyleRule::new(".vbx-cursor", "top", Some(px(v.cursor_offset))),
            StyleRule::new(".vbx-content", "width", Some(percent(v.track_width_percent))),
            StyleRule::new(".vbx-item", "flex-basis", Some(px(v.item_basis))),
            StyleRule::new(
                ".vbx-item",
                "max-width",
                Some(format!("calc({} - 24px)", percent(v.item_max_percent))),
            ),
        ],
        View::Pagination(v) => vec![
            StyleRule::new(".vbx-item", "flex-basis", Some(px(v.item_basis))),
            StyleRule::new(
                ".vbx-item",
                "max-width",
                Some(format!("calc({} - 24px)", percent(v.column_percent))),
            ),
        ],
        View::Button(_) | View::Trigger(_) => Vec::new(),
    }
}

pub fn render(view: &View) -> String {
    match view {
        View::Player(v) => player(v),
        View::Slider(v) => slider(v),
        View::Pagination(v) => pagination(v),
        View::Button(v) => button(v),
        View::Trigger(v) => trigger(v),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn icon(shape: IconShape) -> String {
    let flip = if shape == IconShape::AngleRight {
        " vbx-icon--flip"
    } else {
        ""
    };
    format!(
        "<svg class=\"vbx-icon vbx-icon--{symbol}{flip}\" aria-hidden=\"true\"><use href=\"#vbx-{symbol}\"></use></svg>",
        symbol = shape.symbol(),
        flip = flip
    )
}

fn player(v: &PlayerView) -> String {
    let class = match v.kind {
        PlayerKind::Overlay => "vbx-overlay",
        PlayerKind::Inline => "vbx-inline",
    };
    let hidden = if v.open { "" } else { " hidden" };
    let mut out = format!("<div class=\"vbx-player {}\"{}>", class, hidden);

    if v.kind == PlayerKind::Overlay {
        out.push_str("<div class=\"vbx-background\" data-action=\"close\"></div>");
    }

    out.push_str("<div class=\"vbx-wrap\"><div class=\"vbx-sizer\"></div>");

    if v.content_open {
        out.push_str("<div class=\"vbx-content\">");
        if v.frame {
            let src = v
                .src
                .as_deref()
                .map(|src| format!(" src=\"{}\"", escape(src)))
                .unwrap_or_default();
            out.push_str(&format!(
                "<iframe class=\"vbx-video\" tabindex=\"0\"{} allow=\"autoplay\" allowfullscreen></iframe>",
                src
            ));
        }
        out.push_str("</div>");
    }

    let close = format!(
        "<button class=\"vbx-close\" data-action=\"close\" aria-label=\"{}\">{}</button>",
        escape(&v.close_label),
        v.close_icons.iter().map(|s| icon(*s)).collect::<String>()
    );
    if v.info_bar {
        let description = v
            .description
            .as_deref()
            .map(|d| format!("<p class=\"vbx-description\">{}</p>", escape(d)))
            .unwrap_or_default();
        out.push_str(&format!(
            "<div class=\"vbx-bottom\">{}{}</div>",
            description, close
        ));
    } else if v.kind == PlayerKind::Inline && v.content_open {
        out.push_str(&close);
    }

    out.push_str("</div></div>");
    out
}

fn cursor(action: &str, label: &str, shape: IconShape) -> String {
    format!(
        "<button class=\"vbx-cursor vbx-cursor--{action}\" data-action=\"{action}\" aria-label=\"{label}\">{icon}</button>",
        action = action,
        label = escape(label),
        icon = icon(shape)
    )
}

fn slider(v: &SliderView) -> String {
    let mut out = String::from("<div class=\"vbx-slider\">");
    if v.cursors {
        out.push_str(&cursor("prev", &v.prev_label, IconShape::AngleLeft));
    }
    out.push_str("<div class=\"vbx-wrap\"><ul class=\"vbx-content\">");
    for &i in &v.items {
        out.push_str(&format!(
            "<li class=\"vbx-item\" data-item=\"{}\"><slot name=\"{}\"></slot></li>",
            i,
            item_slot(i)
        ));
    }
    out.push_str("</ul></div>");
    if v.cursors {
        out.push_str(&cursor("next", &v.next_label, IconShape::AngleRight));
    }
    out.push_str("</div>");
    out
}

fn pagination(v: &PaginationView) -> String {
    let mut out = String::from("<div class=\"vbx-pagination\"><ul class=\"vbx-wrap\">");
    for slot in &v.slots {
        match slot {
            Some(i) => out.push_str(&format!(
                "<li class=\"vbx-item\" data-item=\"{}\"><slot name=\"{}\"></slot></li>",
                i,
                item_slot(*i)
            )),
            None => out.push_str("<li class=\"vbx-item vbx-item--empty\"></li>"),
        }
    }
    out.push_str("</ul>");
    if !v.pages.is_empty() {
        out.push_str("<nav class=\"vbx-pages\"><ol>");
        for page in &v.pages {
            let current = if page.current {
                " aria-current=\"page\""
            } else {
                ""
            };
            out.push_str(&format!(
                "<li><a class=\"vbx-page\" role=\"button\" tabindex=\"0\" data-action=\"page\" data-index=\"{}\" aria-label=\"{}\"{}>{}</a></li>",
                page.index,
                escape(&page.aria_label),
                current,
                escape(&page.label)
            ));
        }
        out.push_str("</ol></nav>");
    }
    out.push_str("</div>");
    out
}

fn button(v: &ButtonView) -> String {
    match v.slot {
        ButtonSlot::Trigger => {
            let title = v
                .title
                .as_deref()
                .map(|t| format!(" title=\"{}\"", escape(t)))
                .unwrap_or_default();
            format!(
                "<div class=\"vbx-button\" role=\"button\" tabindex=\"0\" data-action=\"open\"{}><slot></slot></div>",
                title
            )
        }
        ButtonSlot::Player => "<slot name=\"player\"></slot>".to_string(),
        ButtonSlot::Default => "<slot></slot><slot name=\"player\"></slot>".to_string(),
    }
}

fn trigger(v: &TriggerView) -> String {
    format!(
        "<div class=\"vbx-trigger\"><slot></slot>{}</div>",
        icon(v.icon)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use videobox_core::view::PageLink;

    fn player_view(ready: bool) -> PlayerView {
        PlayerView {
            kind: PlayerKind::Overlay,
            open: true,
            width: Some(720.0),
            aspect_percent: 56.25,
            content_open: true,
            frame: true,
            src: ready.then(|| "https://example.com/embed?a=1&b=2".to_string()),
            description: Some("<b>Intro</b>".to_string()),
            close_label: "Close".to_string(),
            info_bar: ready,
            close_icons: vec![IconShape::Close],
        }
    }

    #[test]
    fn test_frame_src_only_once_ready() {
        let settling = player(&player_view(false));
        assert!(settling.contains("class=\"vbx-video\""));
        assert!(!settling.contains("src="));
        assert!(!settling.contains("vbx-bottom"));

        let ready = player(&player_view(true));
        assert!(ready.contains("src=\"https://example.com/embed?a=1&amp;b=2\""));
        assert!(ready.contains("&lt;b&gt;Intro&lt;/b&gt;"));
    }

    #[test]
    fn test_width_change_keeps_markup() {
        let narrow = player_view(true);
        let mut wide = narrow.clone();
        wide.width = Some(1280.0);
        assert_eq!(player(&narrow), player(&wide));

        let rules = styles(&View::Player(wide));
        assert_eq!(
            rules[0],
            StyleRule::new(".vbx-wrap", "max-width", Some("1280px".to_string()))
        );
        assert_eq!(rules[1].value.as_deref(), Some("56.25%"));
    }

    #[test]
    fn test_unsized_player_clears_max_width() {
        let mut view = player_view(false);
        view.width = None;
        assert_eq!(styles(&View::Player(view))[0].value, None);
    }

    #[test]
    fn test_closed_player_is_hidden() {
        let mut view = player_view(false);
        view.open = false;
        view.content_open = false;
        let html = player(&view);
        assert!(html.starts_with("<div class=\"vbx-player vbx-overlay\" hidden>"));
        assert!(!html.contains("vbx-content"));
    }

    #[test]
    fn test_slider_projects_window_items() {
        let html = slider(&SliderView {
            items: vec![8, 9, 0, 1],
            track_width_percent: 133.33,
            item_basis: 240.0,
            item_max_percent: 25.0,
            cursors: true,
            cursor_offset: 90.0,
            prev_label: "Previous".to_string(),
            next_label: "Next".to_string(),
        });
        let first = html.find(&item_slot(8)).unwrap();
        let last = html.find(&item_slot(1)).unwrap();
        assert!(first < last);
        assert!(html.contains("data-action=\"prev\""));
        assert!(!html.contains("style="));
    }

    #[test]
    fn test_slider_styles_follow_layout() {
        let rules = styles(&View::Slider(SliderView {
            items: vec![0, 1],
            track_width_percent: 150.0,
            item_basis: 240.0,
            item_max_percent: 50.0,
            cursors: true,
            cursor_offset: 90.0,
            prev_label: "Previous".to_string(),
            next_label: "Next".to_string(),
        }));
        assert!(rules.contains(&StyleRule::new(".vbx-cursor", "top", Some("90px".to_string()))));
        assert!(rules.contains(&StyleRule::new(
            ".vbx-item",
            "max-width",
            Some("calc(50% - 24px)".to_string())
        )));
    }

    #[test]
    fn test_pagination_marks_current_page() {
        let html = pagination(&PaginationView {
            slots: vec![Some(12), None],
            item_basis: 240.0,
            column_percent: 50.0,
            pages: vec![
                PageLink {
                    index: 0,
                    label: "1".to_string(),
                    current: false,
                    aria_label: "Page 1".to_string(),
                },
                PageLink {
                    index: 1,
                    label: "2".to_string(),
                    current: true,
                    aria_label: "Page 2, Current Page".to_string(),
                },
            ],
        });
        assert!(html.contains("data-item=\"12\""));
        assert!(html.contains("vbx-item--empty"));
        assert_eq!(html.matches("aria-current").count(), 1);
        assert!(html.contains("data-index=\"1\" aria-label=\"Page 2, Current Page\" aria-current=\"page\""));
    }

    #[test]
    fn test_selectors() {
        assert_eq!(selector(Part::Item(3)), "[data-item=\"3\"]");
        assert_eq!(selector(Part::Wrap), ".vbx-wrap");
    }
}
