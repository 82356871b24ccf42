//! Channel announcement caption (Telegram HTML).

use crate::domains::blog::BlogPost;

/// Captions longer than this switch to the short layout.
pub const CAPTION_BUDGET: usize = 1000;

const EXCERPT_CHARS: usize = 150;
const SHORT_EXCERPT_CHARS: usize = 100;
const SHORT_TITLE_CHARS: usize = 200;

const TAGLINE: &str =
    "\"Biznes dunyosidagi eng so'nggi tendensiyalar va texnologiyalar haqida bilib oling.\"";
const READ_MORE: &str = "To'liq o'qish";

/// Build the announcement for `post`, linking to `{site_url}/blog/{slug}`.
pub fn build_caption(post: &BlogPost, site_url: &str) -> String {
    let link = format!("{}/blog/{}", site_url.trim_end_matches('/'), post.slug);
    let hashtag = category_hashtag(&post.category);

    let caption = format!(
        "📖 <b>{title}</b>\n\n{excerpt}\n\n<i>{TAGLINE}</i>\n\n🔗 <a href=\"{link}\">{READ_MORE}</a>\n\n{hashtag} #EvolvoBlog",
        title = escape_html(&post.title),
        excerpt = escape_html(&truncate_chars(&post.excerpt, EXCERPT_CHARS)),
    );

    if caption.chars().count() <= CAPTION_BUDGET {
        return caption;
    }

    format!(
        "📖 <b>{title}</b>\n\n{excerpt}\n\n🔗 <a href=\"{link}\">{READ_MORE}</a>\n\n{hashtag} #EvolvoBlog",
        title = escape_html(&truncate_chars(&post.title, SHORT_TITLE_CHARS)),
        excerpt = escape_html(&truncate_chars(&post.excerpt, SHORT_EXCERPT_CHARS)),
    )
}

/// `#` plus the category with all whitespace removed.
fn category_hashtag(category: &str) -> String {
    let tag: String = category.chars().filter(|c| !c.is_whitespace()).collect();
    format!("#{}", escape_html(&tag))
}

/// First `max` characters plus "..." when longer.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
