//! Static feed payloads used across harnesses.
//!
//! XML fixtures are plain UTF-8 text; [`to_windows_1252`] turns them into the
//! legacy bytes the proxy actually serves.

use serde_json::json;

/// Two decisions: one with an issuer prefix and CDATA description, one
/// without a prefix, description or pubDate.
pub const DECISIONS_XML: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<rss version="2.0"><channel>
  <title>Kokkolan päätökset</title>
  <item>
    <title>Kaupunginhallitus / Talousarvio 2026 / muutos</title>
    <description><![CDATA[Hyväksyttiin <b>muutos</b> talousarvioon.]]></description>
    <link>https://kokkola.example/paatos/1</link>
    <pubDate>Mon, 12 Jan 2026 10:00:00 +0200</pubDate>
  </item>
  <item>
    <title>Viranhaltijapäätös: hankinta</title>
    <link>https://kokkola.example/paatos/2</link>
  </item>
</channel></rss>
"#;

/// Meeting items with dates in their titles, one past and one upcoming
/// relative to [`super::builders::now`].
pub const MEETINGS_XML: &str = r#"<?xml version="1.0" encoding="windows-1252"?>
<rss version="2.0"><channel>
  <item>
    <title>Tekninen lautakunta / Kokous 10.2.2026 § 5 Katusuunnitelma</title>
    <description>Esitys</description>
    <pubDate>Tue, 03 Feb 2026 08:00:00 +0200</pubDate>
  </item>
  <item>
    <title>Sivistyslautakunta / Kokous 15.4.2026 § 2 Kouluverkko</title>
    <description>Esitys</description>
  </item>
</channel></rss>
"#;

/// Agendas: two upcoming (out of order), two past, one undated.
pub const AGENDAS_XML: &str = r#"<?xml version="1.0" encoding="windows-1252"?>
<rss version="2.0"><channel>
  <item><title>Kaupunginhallitus 20.4.2026 esityslista</title></item>
  <item><title>Kaupunginvaltuusto 9.3.2026 esityslista</title></item>
  <item><title>Kaupunginhallitus 2.2.2026 pöytäkirja</title></item>
  <item><title>Ympäristölautakunta 15.1.2026 pöytäkirja</title></item>
  <item><title>Yleisötilaisuus, aika avoinna</title></item>
</channel></rss>
"#;

/// Encode UTF-8 text as Windows-1252 bytes. Panics on unmappable characters.
pub fn to_windows_1252(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(!had_errors, "fixture must be representable in windows-1252");
    bytes.into_owned()
}

/// `n` news items for `topic`, newest first by `julkaistu`, one per day
/// counting back from 28.2.2026.
pub fn news_items(topic: &str, n: usize) -> serde_json::Value {
    let items: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            let day = chrono::NaiveDate::from_ymd_opt(2026, 2, 28)
                .expect("valid date")
                - chrono::Duration::days(i as i64);
            json!({
                "otsikko": format!("{topic} uutinen {i}"),
                "kuvaus": "Lyhyt kuvaus",
                "url": format!("https://news.example/{topic}/{i}"),
                "julkaistu": day.format("%-d.%-m.%Y").to_string(),
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

/// Proxy `/stats` payload with every value present.
pub fn stats_payload() -> serde_json::Value {
    json!({
        "vaesto": 48_012.0,
        "vaestoPrev": 47_909.0,
        "nuoret": 21.4,
        "nuoretPrev": 21.7,
        "tyottomyys": 9.8,
        "tyottomyysPrev": 10.1,
        "tyottomyysKk": "kesäkuu"
    })
}
