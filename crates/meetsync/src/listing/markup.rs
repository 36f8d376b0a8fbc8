//! Rich-text conversions for the listing platform.
//!
//! The platform renders descriptions as a small HTML subset. Submissions go
//! through [`to_listing_html`]; change detection converts fetched
//! descriptions back with [`from_listing_html`]. The two are inverses for
//! the text this engine produces, so a freshly created listing compares
//! clean on the next pass.

use regex::Regex;
use std::sync::LazyLock;

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((http|https)://([\w_-]+(?:(?:\.[\w_-]+)+))([\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-])?)")
        .unwrap()
});

static RE_ANCHOR_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<a[^>]*>").unwrap());

/// Converts plain text to the platform's HTML form: bare URLs become
/// anchors, newlines become break tags, the whole body is one paragraph.
pub fn to_listing_html(text: &str) -> String {
    let linked = RE_URL.replace_all(text, r#"<a href="${1}" class="embedded">${1}</a>"#);
    let broken = linked.replace('\n', "</br>");
    format!("<p>{}</p>", broken)
}

/// Converts the platform's HTML form back to plain text. Accepts every break
/// tag spelling the platform has been seen to echo.
pub fn from_listing_html(html: &str) -> String {
    let text = html
        .replace("</p> <p>", "\n\n")
        .replace("</br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("</a>", "");
    let text = RE_ANCHOR_OPEN.replace_all(&text, "");
    let text = text.replace("<p>", "").replace("</p>", "");

    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The canonical "watch live" suffix. Submission and change detection both
/// go through here; if the two ever diverge, every pass rewrites every
/// listing.
pub fn append_video_link(description: &str, link: &str) -> String {
    format!(
        "{}\nYou can watch the live video via the following link:\n{}",
        description, link
    )
}
