use interfaces_feishu_webhook::index::{Card, CardElement, PlainText};
use interfaces_github_trending::index::{Since, TrendingRecord};

pub const TRENDING_PAGE_URL: &str = "https://github.com/trending";

const DESCRIPTION_WIDTH: usize = 120;
const ELLIPSIS: &str = "…";
const HEADER_TEMPLATE: &str = "blue";

pub fn build_card(
    records: &[TrendingRecord],
    language: Option<&str>,
    since: Since,
    limit: usize,
) -> Card {
    let since_label = since.label();
    let lang_label = language
        .filter(|lang| !lang.is_empty())
        .unwrap_or("All Languages");

    let mut elements = vec![
        CardElement::markdown(format!(
            "**Language**: {lang_label}  \n**Period**: {since_label}  \n**Source**: {TRENDING_PAGE_URL}"
        )),
        CardElement::Hr,
        CardElement::markdown(format!("**Top {limit} Repositories**")),
    ];

    elements.extend(
        records
            .iter()
            .take(limit)
            .enumerate()
            .map(|(idx, record)| CardElement::markdown(record_line(idx + 1, record))),
    );

    elements.push(CardElement::Hr);
    elements.push(CardElement::Button {
        text: PlainText::new("🔍 Open GitHub Trending"),
        kind: "primary".to_string(),
        url: TRENDING_PAGE_URL.to_string(),
    });

    Card::new(
        format!("📈 GitHub Trending · {since_label}"),
        HEADER_TEMPLATE,
        elements,
    )
}

fn record_line(rank: usize, record: &TrendingRecord) -> String {
    let language = if record.language.is_empty() {
        "Unknown"
    } else {
        record.language.as_str()
    };
    let description = if record.description.is_empty() {
        "(no description)"
    } else {
        record.description.as_str()
    };

    format!(
        "{rank}. **{name}**  \n{stars} · {language}  \n{desc}  \n{url}",
        name = record.name,
        stars = stars_summary(record),
        desc = shorten(description, DESCRIPTION_WIDTH, ELLIPSIS),
        url = record.url,
    )
}

/// `⭐ 1200 · +35 today`, either half omitted when unknown.
fn stars_summary(record: &TrendingRecord) -> String {
    let parts: Vec<String> = [
        record.stars.map(|n| format!("⭐ {n}")),
        record.stars_today.map(|n| format!("+{n} today")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        "stars: N/A".to_string()
    } else {
        parts.join(" · ")
    }
}

/// Collapses whitespace and, when the text is wider than `width` chars, keeps the
/// longest run of words that fits alongside `placeholder`. A word may also be cut
/// right after one of its inner hyphens.
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(placeholder.chars().count());
    let mut out = String::new();
    let mut len = 0;
    'words: for word in words {
        for (idx, chunk) in hyphen_chunks(word).into_iter().enumerate() {
            let sep = if idx == 0 && !out.is_empty() { 1 } else { 0 };
            let next_len = len + sep + chunk.chars().count();
            if next_len > budget {
                break 'words;
            }
            if sep == 1 {
                out.push(' ');
            }
            out.push_str(chunk);
            len = next_len;
        }
    }

    out.push_str(placeholder);
    out
}

/// Splits after every hyphen that has two letters on each side:
/// `cross-platform` becomes `cross-` and `platform`, `x-ray` stays whole.
fn hyphen_chunks(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let letter = |i: usize| chars[i].1.is_alphabetic();

    let mut chunks = Vec::new();
    let mut start = 0;
    for i in 2..chars.len().saturating_sub(2) {
        if chars[i].1 == '-' && letter(i - 2) && letter(i - 1) && letter(i + 1) && letter(i + 2) {
            let end = chars[i].0 + 1;
            chunks.push(&word[start..end]);
            start = end;
        }
    }
    chunks.push(&word[start..]);
    chunks
}
