use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::db::Contact;

static MEMBER_BLOCK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.member_name, div.member_info_area").expect("invalid member block selector")
});
static INFO_CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.member_info_content").expect("invalid info content selector")
});
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid anchor selector"));

static WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Extract contact records from a faculty page.
///
/// The page lays members out as a `div.member_name` block followed by a run of
/// `div.member_info_area` blocks (title, then usually a phone row, then the
/// email row). Each name block and the info areas up to the next name block
/// form one candidate; a record is emitted only when the name, title, and
/// email slots all resolve. Candidates with missing structure are skipped and
/// the scan continues, in document order.
pub fn extract_contacts(html: &str) -> Vec<Contact> {
    let doc = Html::parse_document(html);
    let blocks: Vec<ElementRef> = doc.select(&MEMBER_BLOCK_SELECTOR).collect();

    let mut contacts = Vec::new();
    let mut i = 0;
    while i < blocks.len() {
        if !has_class(blocks[i], "member_name") {
            // Info area with no preceding name block; nothing to attach it to.
            i += 1;
            continue;
        }

        let group_end = blocks[i + 1..]
            .iter()
            .position(|b| has_class(*b, "member_name"))
            .map(|p| i + 1 + p)
            .unwrap_or(blocks.len());

        match resolve_slots(blocks[i], &blocks[i + 1..group_end]) {
            Some(contact) => contacts.push(contact),
            None => debug!("Skipping member block with unresolved fields"),
        }
        i = group_end;
    }

    contacts
}

/// Resolve the name/title/email slots for one candidate group. Returns None
/// as soon as any slot fails, dropping the whole candidate.
fn resolve_slots(name_block: ElementRef, info_areas: &[ElementRef]) -> Option<Contact> {
    let name = clean_text(name_block.select(&ANCHOR_SELECTOR).next()?);

    // Title is the content of the first info area; the email anchor sits in
    // one of the later areas (after the phone row on the real layout, or
    // directly next when there is no phone row).
    let (first, rest) = info_areas.split_first()?;
    let title = clean_text(first.select(&INFO_CONTENT_SELECTOR).next()?);
    let email = rest.iter().find_map(|area| mailto_target(*area))?;

    if name.is_empty() || title.is_empty() {
        return None;
    }

    Some(Contact { name, title, email })
}

/// First mailto: anchor target inside an info area, prefix stripped.
fn mailto_target(area: ElementRef) -> Option<String> {
    area.select(&ANCHOR_SELECTOR).find_map(|a| {
        let href = a.value().attr("href")?.trim();
        let addr = href.strip_prefix("mailto:")?.trim();
        (!addr.is_empty()).then(|| addr.to_string())
    })
}

fn has_class(el: ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Visible text with whitespace runs collapsed.
fn clean_text(el: ElementRef) -> String {
    let joined: String = el.text().collect();
    WS_RE.replace_all(&joined, " ").trim().to_string()
}

// ── Tests ──
