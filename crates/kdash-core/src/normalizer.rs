//! Normalizer: turns raw feed payloads into uniform [`Record`] values.
//!
//! XML feeds arrive as Windows-1252 bytes whose declaration may claim another
//! charset. They are decoded with [`decode_legacy`], the declaration is
//! rewritten by [`rewrite_encoding_decl`], and [`items`] then walks the
//! document lazily, yielding one [`RawItem`] per `<item>` element. The
//! per-category constructors map raw items onto records.
//!
//! JSON news payloads go through [`news_records`], which validates each
//! object's shape and skips the ones that do not fit.

use crate::error::{FeedError, Result};
use crate::title::{self, parse_news_date, parse_pub_date, split_issuer, strip_date};
use crate::types::{Category, Record};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static ENCODING_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)encoding=(?:"[^"]+"|'[^']+')"#).expect("encoding declaration pattern is valid")
});

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a payload as Windows-1252 regardless of what it claims to be.
///
/// Every byte maps to a character in this charset, so decoding cannot fail.
/// A leading byte-order mark is not honoured.
pub fn decode_legacy(bytes: &[u8]) -> String {
    let (text, _had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Replace the first `encoding="..."` declaration with `encoding="utf-8"`.
pub fn rewrite_encoding_decl(text: &str) -> String {
    ENCODING_DECL
        .replacen(text, 1, r#"encoding="utf-8""#)
        .into_owned()
}

/// Decode and fix up a legacy XML payload in one step.
pub fn prepare_xml(bytes: &[u8]) -> String {
    rewrite_encoding_decl(&decode_legacy(bytes))
}

// ---------------------------------------------------------------------------
// XML items
// ---------------------------------------------------------------------------

/// The four `<item>` children the dashboard cares about. Missing children are
/// empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
}

impl RawItem {
    fn finish(mut self) -> Self {
        for value in [
            &mut self.title,
            &mut self.description,
            &mut self.link,
            &mut self.pub_date,
        ] {
            *value = unwrap_cdata_markers(value).trim().to_string();
        }
        self
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Link,
    PubDate,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"description" => Some(Field::Description),
            b"link" => Some(Field::Link),
            b"pubDate" => Some(Field::PubDate),
            _ => None,
        }
    }
}

/// Some upstream feeds double-escape their CDATA sections, leaving the
/// markers in the text content.
fn unwrap_cdata_markers(s: &str) -> String {
    s.replace("<![CDATA[", "").replace("]]>", "")
}

/// Lazy iterator over the `<item>` elements of a feed document.
///
/// Finite and not restartable: once it has returned `None` (or an error) it
/// stays exhausted. Re-fetch the payload to walk it again.
pub struct Items<'a> {
    reader: Reader<&'a [u8]>,
    done: bool,
}

/// Walk the `<item>` elements of `xml`.
pub fn items(xml: &str) -> Items<'_> {
    Items {
        reader: Reader::from_str(xml),
        done: false,
    }
}

impl Iterator for Items<'_> {
    type Item = Result<RawItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut current: Option<RawItem> = None;
        let mut field: Option<Field> = None;
        // Fields already closed; a repeated child is ignored.
        let mut seen: Vec<Field> = Vec::new();
        // Element depth below the open <item>.
        let mut depth = 0usize;

        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    self.done = true;
                    return Some(Err(FeedError::from(e)));
                }
            };

            match event {
                Event::Start(e) => match current {
                    None if e.name().as_ref() == b"item" => {
                        current = Some(RawItem::default());
                        depth = 0;
                        field = None;
                        seen.clear();
                    }
                    None => {}
                    Some(_) => {
                        depth += 1;
                        if depth == 1 {
                            field = Field::from_name(e.name().as_ref())
                                .filter(|f| !seen.contains(f));
                        }
                    }
                },
                Event::Empty(e) if current.is_none() && e.name().as_ref() == b"item" => {
                    return Some(Ok(RawItem::default().finish()));
                }
                Event::End(_) => {
                    if current.is_some() {
                        if depth == 0 {
                            return current.take().map(|item| Ok(item.finish()));
                        }
                        if depth == 1 {
                            seen.extend(field.take());
                        }
                        depth -= 1;
                    }
                }
                Event::Text(t) => {
                    if let (Some(item), Some(f)) = (current.as_mut(), field) {
                        let text = t
                            .unescape()
                            .map(|c| c.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                        item.field_mut(f).push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if let (Some(item), Some(f)) = (current.as_mut(), field) {
                        item.field_mut(f).push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::Eof => {
                    self.done = true;
                    if current.is_some() {
                        return Some(Err(FeedError::Decode(
                            "document ended inside <item>".to_string(),
                        )));
                    }
                    return None;
                }
                _ => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Record constructors
// ---------------------------------------------------------------------------

/// A published decision. Its date is the publication date.
pub fn decision_record(raw: RawItem, organization: &str) -> Record {
    let (issuer, title) = split_issuer(&raw.title, organization);
    let published_at = parse_pub_date(&raw.pub_date);
    Record::new(Category::Decision, &raw.title, title, raw.description, issuer)
        .with_link(raw.link)
        .with_published(raw.pub_date, published_at)
        .with_date(published_at)
}

/// A meeting item. Its date is the meeting day embedded in the title; the
/// title itself is kept intact apart from the issuer prefix.
pub fn meeting_record(raw: RawItem, organization: &str) -> Record {
    let (issuer, title) = split_issuer(&raw.title, organization);
    let meeting_day = title::extract_date(&raw.title).map(|m| title::start_of_day(m.date));
    let published_at = parse_pub_date(&raw.pub_date);
    Record::new(Category::Meeting, &raw.title, title, raw.description, issuer)
        .with_link(raw.link)
        .with_published(raw.pub_date, published_at)
        .with_date(meeting_day)
}

/// An agenda entry. The embedded date is removed from the display title.
pub fn agenda_record(raw: RawItem, organization: &str) -> Record {
    let (title, day) = strip_date(&raw.title);
    let published_at = parse_pub_date(&raw.pub_date);
    Record::new(Category::Agenda, &raw.title, title, raw.description, organization)
        .with_link(raw.link)
        .with_published(raw.pub_date, published_at)
        .with_date(day.map(title::start_of_day))
}

/// Parse a whole XML payload into records of `category`.
///
/// Fails on the first malformed part of the document; a feed either loads
/// completely or not at all.
pub fn xml_records(xml: &str, category: Category, organization: &str) -> Result<Vec<Record>> {
    let build: fn(RawItem, &str) -> Record = match category {
        Category::Decision => decision_record,
        Category::Meeting => meeting_record,
        Category::Agenda => agenda_record,
        Category::News => {
            return Err(FeedError::Parse(
                "news feeds are JSON, not XML".to_string(),
            ))
        }
    };
    items(xml)
        .map(|item| item.map(|raw| build(raw, organization)))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON news
// ---------------------------------------------------------------------------

/// Shape of one news object served by `/news/{topic}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    pub otsikko: String,
    #[serde(default)]
    pub kuvaus: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub julkaistu: Option<String>,
}

impl NewsItem {
    pub fn into_record(self, topic: &str) -> Record {
        let published = self.julkaistu.unwrap_or_default();
        let published_at = parse_pub_date(&published);
        let sort_date = parse_news_date(&published);
        Record::new(
            Category::News,
            &self.otsikko,
            self.otsikko.clone(),
            self.kuvaus.unwrap_or_default(),
            topic,
        )
        .with_link(self.url.unwrap_or_default())
        .with_published(published, published_at)
        .with_date(Some(sort_date))
    }
}

/// Parse a JSON news array. Objects that do not match [`NewsItem`] are
/// skipped; anything other than an array is a parse failure.
pub fn news_records(json: &str, topic: &str) -> Result<Vec<Record>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let records = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<NewsItem>(value) {
            Ok(item) => Some(item.into_record(topic)),
            Err(e) => {
                tracing::warn!(topic, idx, error = %e, "skipping malformed news item");
                None
            }
        })
        .collect();
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0"><channel>
  <title>Kokkola</title>
  <item>
    <title>Kaupunginhallitus / Talousarvio 2025</title>
    <description><![CDATA[Hyväksyttiin <b>talousarvio</b>.]]></description>
    <link>https://example.test/1</link>
    <pubDate>Mon, 12 May 2025 12:00:00 +0000</pubDate>
  </item>
  <item>
    <title>Tiedote ilman kuvausta</title>
  </item>
</channel></rss>"#;

    #[test]
    fn decode_windows_1252_bytes() {
        // "Päätös" with ä = 0xE4, ö = 0xF6; 0x80 is the euro sign.
        let bytes = b"P\xe4\xe4t\xf6s \x80";
        assert_eq!(decode_legacy(bytes), "Päätös €");
    }

    #[test]
    fn rewrites_first_encoding_declaration_only() {
        let text = r#"<?xml version="1.0" ENCODING="ISO-8859-1"?><a encoding="x"/>"#;
        assert_eq!(
            rewrite_encoding_decl(text),
            r#"<?xml version="1.0" encoding="utf-8"?><a encoding="x"/>"#
        );
    }

    #[test]
    fn items_default_missing_children_to_empty() {
        let all: Vec<RawItem> = items(FEED).collect::<Result<_>>().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].description, "Hyväksyttiin <b>talousarvio</b>.");
        assert_eq!(all[1].title, "Tiedote ilman kuvausta");
        assert_eq!(all[1].description, "");
        assert_eq!(all[1].link, "");
        assert_eq!(all[1].pub_date, "");
    }

    #[test]
    fn self_closing_item_is_an_empty_item() {
        let xml = "<rss><channel><item/><item><title>B</title></item></channel></rss>";
        let all: Vec<RawItem> = items(xml).collect::<Result<_>>().unwrap();
        let titles: Vec<&str> = all.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["", "B"]);
        assert_eq!(all[0].description, "");
    }

    #[test]
    fn namespaced_and_repeated_children_are_ignored() {
        let xml = r#"<rss xmlns:media="m" xmlns:dc="d"><channel><item>
            <title>Kokous</title>
            <media:title>Kuva</media:title>
            <description>Kuvaus</description>
            <dc:description>Toinen</dc:description>
            <title>Toistettu</title>
        </item></channel></rss>"#;
        let all: Vec<RawItem> = items(xml).collect::<Result<_>>().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Kokous");
        assert_eq!(all[0].description, "Kuvaus");
    }

    #[test]
    fn channel_title_is_not_an_item() {
        let first = items(FEED).next().unwrap().unwrap();
        assert_eq!(first.title, "Kaupunginhallitus / Talousarvio 2025");
    }

    #[test]
    fn escaped_cdata_markers_are_stripped() {
        let xml = "<rss><item><title>&lt;![CDATA[Kokous]]&gt;</title></item></rss>";
        let item = items(xml).next().unwrap().unwrap();
        assert_eq!(item.title, "Kokous");
    }

    #[test]
    fn iterator_is_exhausted_after_end() {
        let mut it = items(FEED);
        assert!(it.next().is_some());
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn malformed_xml_is_a_decode_failure() {
        let xml = "<rss><item><title>Auki</item></rss>";
        let err = xml_records(xml, Category::Decision, "Kokkola").unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn decision_record_splits_issuer_and_uses_pub_date() {
        let records = xml_records(FEED, Category::Decision, "Kokkola").unwrap();
        let first = &records[0];
        assert_eq!(first.issuer, "Kaupunginhallitus");
        assert_eq!(first.title, "Talousarvio 2025");
        assert!(first.date.is_some());
        assert_eq!(first.date, first.published_at);

        let second = &records[1];
        assert_eq!(second.issuer, "Kokkola");
        assert_eq!(second.date, None);
    }

    #[test]
    fn meeting_record_takes_date_from_title() {
        let raw = RawItem {
            title: "Kaupunginhallitus / Kokous 2.6.2026".to_string(),
            pub_date: "Mon, 25 May 2026 08:00:00 +0000".to_string(),
            ..RawItem::default()
        };
        let r = meeting_record(raw, "Kokkola");
        assert_eq!(r.title, "Kokous 2.6.2026");
        assert_eq!(
            r.date.map(|d| d.to_string()),
            Some("2026-06-02 00:00:00".to_string())
        );
    }

    #[test]
    fn agenda_record_strips_date() {
        let raw = RawItem {
            title: "Kaupunginhallitus 12.5.2025 esityslista".to_string(),
            ..RawItem::default()
        };
        let r = agenda_record(raw, "Kokkola");
        assert_eq!(r.title, "Kaupunginhallitus esityslista");
        assert!(r.raw_text().contains("12.5.2025"));
    }

    #[test]
    fn news_skips_items_without_title() {
        let json = r#"[
            {"otsikko": "Satama laajenee", "kuvaus": "Uusi laituri", "url": "https://n/1", "julkaistu": "3.3.2026"},
            {"kuvaus": "ei otsikkoa"},
            {"otsikko": "Toinen"}
        ]"#;
        let records = news_records(json, "kokkola").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].issuer, "kokkola");
        assert_eq!(records[1].link, "");
    }

    #[test]
    fn news_payload_must_be_an_array() {
        let err = news_records(r#"{"otsikko": "x"}"#, "kokkola").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }
}
