//! Stateless helpers consumed by dialogs and mode controllers.

use chrono::{DateTime, Utc};

use crate::constants::{ATTR_DATA_TYPE, AVATAR_COLOR_COUNT, CARET_EDGE_INSET};
use crate::model::{Annotation, AnnotationType, Dimensions, Location, Rect, Size, ThreadState};
use crate::surface::{DomEvent, ElementId, ElementInfo, KeyInput, Propagation};

// ============================================================================
// Element queries
// ============================================================================

/// Value of `name` on the nearest element of `path` (target first) carrying it.
pub fn find_closest_attribute<'a>(path: &'a [ElementInfo], name: &str) -> Option<&'a str> {
    path.iter().find_map(|element| element.attr(name))
}

/// Nearest `data-type` command on an event path.
pub fn find_closest_data_type(path: &[ElementInfo]) -> Option<&str> {
    find_closest_attribute(path, ATTR_DATA_TYPE)
}

/// Whether `rect` lies fully inside a viewport of the given size.
pub fn is_rect_in_viewport(rect: Rect, viewport: Size) -> bool {
    rect.y >= 0.0 && rect.x >= 0.0 && rect.bottom() <= viewport.height && rect.right() <= viewport.width
}

// ============================================================================
// Text and avatars
// ============================================================================

/// Escape text for insertion into markup.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '>' => out.push_str("&gt;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Up to three upper-case initials, one per word.
pub fn user_initials(name: &str) -> String {
    name.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(3)
        .collect()
}

/// Avatar colour bucket for a user id; non-numeric ids share bucket 0.
pub fn avatar_color_index(user_id: &str) -> u64 {
    user_id.parse::<u64>().unwrap_or(0) % AVATAR_COLOR_COUNT
}

/// Avatar markup: the image when a URL is known, initials otherwise.
///
/// Arguments are expected to be escaped already.
pub fn avatar_html(avatar_url: &str, user_id: &str, user_name: &str, alt: &str) -> String {
    if !avatar_url.is_empty() {
        return format!(r#"<img src="{avatar_url}" alt="{alt}">"#);
    }

    let initials = if user_id == "0" {
        String::new()
    } else {
        user_initials(user_name)
    };

    format!(
        r#"<div class="bp-annotation-profile avatar-color-{}">{}</div>"#,
        avatar_color_index(user_id),
        initials
    )
}

/// Comment timestamp in the locale's short date-time form.
pub fn format_comment_date(created: &DateTime<Utc>, locale: &str) -> String {
    let pattern = if locale.eq_ignore_ascii_case("en-US") || locale.eq_ignore_ascii_case("en") {
        "%m/%d/%Y, %I:%M %p"
    } else if locale.starts_with("ja") || locale.starts_with("zh") || locale.starts_with("ko") {
        "%Y/%m/%d %H:%M"
    } else {
        "%d/%m/%Y, %H:%M"
    };
    created.format(pattern).to_string()
}

// ============================================================================
// Keyboard
// ============================================================================

/// Decode a keydown into a normalized key name such as `Escape`,
/// `Shift+ArrowUp` or `Control+z`.
pub fn decode_keydown(input: &KeyInput) -> String {
    let modifier = if input.ctrl {
        "Control"
    } else if input.shift {
        "Shift"
    } else if input.meta {
        "Meta"
    } else {
        ""
    };

    let mut key = input.key.clone();
    if key == modifier {
        key.clear();
    }

    if let Some(code) = key.strip_prefix("U+") {
        key = if code == "001B" {
            "Escape".to_string()
        } else {
            u32::from_str_radix(code, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        };
    }

    if key.is_empty() {
        return String::new();
    }

    match key.as_str() {
        " " => key = "Space".to_string(),
        "Esc" => key = "Escape".to_string(),
        "Right" | "Left" | "Down" | "Up" => key = format!("Arrow{key}"),
        _ => {}
    }

    if modifier.is_empty() {
        key
    } else {
        format!("{modifier}+{key}")
    }
}

// ============================================================================
// Positioning
// ============================================================================

/// Horizontal caret placement inside a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CaretPosition {
    #[default]
    Center,
    /// Offset from the dialog's left edge
    Left(f32),
}

/// Clamp a dialog's left edge to the page and move its caret so it keeps
/// pointing at `browser_x`.
///
/// Only one overflowing side is corrected; a dialog wider than the page stays
/// centered and overflows.
pub fn reposition_caret(
    dialog_x: f32,
    dialog_width: f32,
    browser_x: f32,
    page_width: f32,
) -> (f32, CaretPosition) {
    let past_left = dialog_x < 0.0;
    let past_right = dialog_x + dialog_width > page_width;

    if past_left && !past_right {
        let caret_left = browser_x.max(CARET_EDGE_INSET);
        (0.0, CaretPosition::Left(caret_left))
    } else if past_right && !past_left {
        let caret_right = (page_width - browser_x).max(CARET_EDGE_INSET);
        (
            page_width - dialog_width,
            CaretPosition::Left(dialog_width - caret_right),
        )
    } else {
        (dialog_x, CaretPosition::Center)
    }
}

/// Scale between the page size an annotation was created at and the current
/// unzoomed page size, or `None` when they agree within a pixel.
pub fn dimension_scale(
    dimensions: Option<Dimensions>,
    file_size: Size,
    zoom_scale: f32,
    height_padding: f32,
) -> Option<(f32, f32)> {
    let dimensions = dimensions?;
    let width = file_size.width / zoom_scale;
    let height = (file_size.height - height_padding) / zoom_scale;

    if (width - dimensions.x).abs() > 1.0 || (height - dimensions.y).abs() > 1.0 {
        Some((width / dimensions.x, height / dimensions.y))
    } else {
        None
    }
}

/// Build a location, attaching page dimensions when known.
pub fn create_location(x: f32, y: f32, dimensions: Option<Dimensions>) -> Location {
    Location {
        dimensions,
        ..Location::new(x, y)
    }
}

// ============================================================================
// Threads
// ============================================================================

/// Whether a thread state is one of the unsaved states.
pub fn is_pending(state: ThreadState) -> bool {
    state.is_pending()
}

/// Construction parameters of a thread, as handed over by a viewer.
#[derive(Debug, Clone, Default)]
pub struct ThreadParams {
    pub annotated_element: Option<ElementId>,
    pub annotations: Option<Vec<Annotation>>,
    pub annotation_service: Option<String>,
    pub file_version_id: Option<String>,
    pub locale: Option<String>,
    pub location: Option<Location>,
    pub kind: Option<AnnotationType>,
}

/// Presence check over every required construction parameter.
pub fn validate_thread_params(params: Option<&ThreadParams>) -> bool {
    let Some(p) = params else {
        return false;
    };

    p.annotated_element.is_some()
        && p.annotations.is_some()
        && p.annotation_service.is_some()
        && p.file_version_id.is_some()
        && p.locale.is_some()
        && p.location.is_some()
        && p.kind.is_some()
}

/// Convert a pointer event into a location and hand it to `callback`.
///
/// Events targeting buttons are left alone so the button's own handler wins.
pub fn event_to_location<L, C>(event: Option<&DomEvent>, locate: L, callback: C) -> Propagation
where
    L: FnOnce(&DomEvent) -> Option<Location>,
    C: FnOnce(Option<Location>),
{
    let Some(event) = event else {
        return Propagation::Continue;
    };
    if event.targets_button() {
        return Propagation::Continue;
    }

    callback(locate(event));
    Propagation::Stop
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_closest_data_type_walks_ancestors() {
        let path = vec![
            ElementInfo::new("span"),
            ElementInfo::new("button").with_attr("data-type", "post-reply-btn"),
            ElementInfo::new("div").with_attr("data-type", "annotation-dialog"),
        ];
        assert_eq!(find_closest_data_type(&path), Some("post-reply-btn"));
        assert_eq!(find_closest_attribute(&path, "data-annotation-id"), None);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'`</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&#96;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_avatar_initials_and_color() {
        assert_eq!(user_initials("ada lovelace"), "AL");
        assert_eq!(user_initials("  mary-jane o'neil smith"), "MJO");
        let html = avatar_html("", "10", "Grace Hopper", "alt");
        assert!(html.contains("avatar-color-1"));
        assert!(html.contains(">GH<"));
        let posting = avatar_html("", "0", "Posting...", "alt");
        assert!(posting.contains("avatar-color-0\"></div>"));
        let image = avatar_html("https://a/b.png", "10", "Grace", "Profile");
        assert_eq!(image, r#"<img src="https://a/b.png" alt="Profile">"#);
    }

    #[test]
    fn test_decode_keydown() {
        assert_eq!(decode_keydown(&KeyInput::new("Esc")), "Escape");
        assert_eq!(decode_keydown(&KeyInput::new("U+001B")), "Escape");
        assert_eq!(decode_keydown(&KeyInput::new("U+0041")), "A");
        assert_eq!(decode_keydown(&KeyInput::new(" ")), "Space");
        assert_eq!(decode_keydown(&KeyInput::new("Up")), "ArrowUp");
        let shift = KeyInput {
            shift: true,
            ..KeyInput::new("Shift")
        };
        assert_eq!(decode_keydown(&shift), "");
        let ctrl_z = KeyInput {
            ctrl: true,
            ..KeyInput::new("z")
        };
        assert_eq!(decode_keydown(&ctrl_z), "Control+z");
    }

    #[test]
    fn test_reposition_caret() {
        // Fits: unchanged and centered
        assert_eq!(
            reposition_caret(100.0, 200.0, 200.0, 800.0),
            (100.0, CaretPosition::Center)
        );
        // Past the left edge only
        assert_eq!(
            reposition_caret(-50.0, 200.0, 4.0, 800.0),
            (0.0, CaretPosition::Left(10.0))
        );
        // Past the right edge only
        assert_eq!(
            reposition_caret(700.0, 200.0, 780.0, 800.0),
            (600.0, CaretPosition::Left(180.0))
        );
        // Wider than the page: centered, overflowing
        assert_eq!(
            reposition_caret(-100.0, 1000.0, 400.0, 800.0),
            (-100.0, CaretPosition::Center)
        );
    }

    #[test]
    fn test_dimension_scale() {
        let dims = Some(Dimensions { x: 100.0, y: 200.0 });
        assert_eq!(dimension_scale(dims, Size::new(200.0, 430.0), 2.0, 30.0), None);
        assert_eq!(
            dimension_scale(dims, Size::new(400.0, 830.0), 2.0, 30.0),
            Some((2.0, 2.0))
        );
        assert_eq!(dimension_scale(None, Size::new(1.0, 1.0), 1.0, 0.0), None);
    }

    #[test]
    fn test_validate_thread_params() {
        assert!(!validate_thread_params(None));
        let mut params = ThreadParams {
            annotated_element: Some(ElementId(1)),
            annotations: Some(Vec::new()),
            annotation_service: Some("svc".into()),
            file_version_id: Some("fv".into()),
            locale: Some("en-US".into()),
            location: Some(Location::new(1.0, 1.0)),
            kind: Some(AnnotationType::Point),
        };
        assert!(validate_thread_params(Some(&params)));
        params.file_version_id = None;
        assert!(!validate_thread_params(Some(&params)));
    }

    #[test]
    fn test_format_comment_date() {
        let created = Utc.with_ymd_and_hms(2017, 3, 4, 15, 7, 0).unwrap();
        assert_eq!(format_comment_date(&created, "en-US"), "03/04/2017, 03:07 PM");
        assert_eq!(format_comment_date(&created, "fr-FR"), "04/03/2017, 15:07");
    }

    #[test]
    fn test_event_to_location_skips_buttons() {
        let button = DomEvent::default().with_target(ElementInfo::new("button"));
        let mut called = false;
        let result = event_to_location(Some(&button), |_| None, |_| called = true);
        assert_eq!(result, Propagation::Continue);
        assert!(!called);

        let canvas = DomEvent::default().with_target(ElementInfo::new("canvas"));
        let mut seen = None;
        let result = event_to_location(
            Some(&canvas),
            |_| Some(Location::new(3.0, 4.0)),
            |loc| seen = loc,
        );
        assert_eq!(result, Propagation::Stop);
        assert_eq!(seen, Some(Location::new(3.0, 4.0)));
    }
}
