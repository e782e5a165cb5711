//! `display: none` toggling that remembers the element's previous inline
//! display value.

use crate::surface::Element;

const SAVED_DISPLAY: &str = "vbx-display";

/// Hide an element, remembering its inline display value
pub fn hide(el: &dyn Element) {
    let current = el.display();
    if current.as_deref() == Some("none") {
        return;
    }
    el.set_data(SAVED_DISPLAY, Some(current.as_deref().unwrap_or("")));
    el.set_display(Some("none"));
}

/// Show an element hidden by [`hide`], restoring its previous display value
pub fn show(el: &dyn Element) {
    if el.display().as_deref() != Some("none") {
        return;
    }
    let saved = el.data(SAVED_DISPLAY).filter(|d| !d.is_empty());
    el.set_display(saved.as_deref());
    el.set_data(SAVED_DISPLAY, None);
}

pub fn is_hidden(el: &dyn Element) -> bool {
    el.display().as_deref() == Some("none")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessElement;

    #[test]
    fn test_hide_and_restore() {
        let el = HeadlessElement::new();
        el.set_display(Some("inline-block"));

        hide(&el);
        assert!(is_hidden(&el));
        hide(&el);

        show(&el);
        assert_eq!(el.display().as_deref(), Some("inline-block"));
        assert_eq!(el.data("vbx-display"), None);
    }

    #[test]
    fn test_restore_unset_display() {
        let el = HeadlessElement::new();
        hide(&el);
        assert_eq!(el.display().as_deref(), Some("none"));
        show(&el);
        assert_eq!(el.display(), None);
    }

    #[test]
    fn test_show_visible_is_noop() {
        let el = HeadlessElement::new();
        el.set_display(Some("flex"));
        show(&el);
        assert_eq!(el.display().as_deref(), Some("flex"));
    }
}
