//! CycloneDX manifest generation.
//!
//! Each hash entry becomes a `file` component named after its location and
//! carrying a single `SHA-1` hash. The XML flavor targets CycloneDX 1.1 (what
//! the third-party scan endpoint has accepted the longest); the JSON flavor
//! targets 1.4 and adds a metadata block.

use std::fmt;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{SbomError, SbomResult};
use crate::parse::HashEntry;

const CYCLONEDX_XML_NAMESPACE: &str = "http://cyclonedx.org/schema/bom/1.1";
const CYCLONEDX_JSON_SPEC_VERSION: &str = "1.4";
const COMPONENT_VERSION: &str = "0";

/// Serialization of the audit manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    #[default]
    Xml,
    Json,
}

impl ManifestFormat {
    /// `Content-Type` to submit this format with.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManifestFormat {
    type Err = SbomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            other => Err(SbomError::UnknownFormat(other.to_string())),
        }
    }
}

/// Serialized manifest, treated as opaque by the audit client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub format: ManifestFormat,
    pub body: String,
}

impl Manifest {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Render hash entries as a CycloneDX document in the requested format.
pub fn build_manifest(entries: &[HashEntry], format: ManifestFormat) -> SbomResult<Manifest> {
    let serial = format!("urn:uuid:{}", uuid::Uuid::new_v4());
    debug!(components = entries.len(), %format, %serial, "building manifest");

    let body = match format {
        ManifestFormat::Xml => render_xml(entries, &serial)?,
        ManifestFormat::Json => render_json(entries, &serial)?,
    };

    Ok(Manifest { format, body })
}

fn render_xml(entries: &[HashEntry], serial: &str) -> SbomResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("bom").with_attributes([
            ("xmlns", CYCLONEDX_XML_NAMESPACE),
            ("serialNumber", serial),
            ("version", "1"),
        ])))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("components")))
        .map_err(xml_error)?;

    for entry in entries {
        writer
            .write_event(Event::Start(
                BytesStart::new("component").with_attributes([("type", "file")]),
            ))
            .map_err(xml_error)?;
        write_text_element(&mut writer, BytesStart::new("name"), &entry.location)?;
        write_text_element(&mut writer, BytesStart::new("version"), COMPONENT_VERSION)?;
        writer
            .write_event(Event::Start(BytesStart::new("hashes")))
            .map_err(xml_error)?;
        write_text_element(
            &mut writer,
            BytesStart::new("hash").with_attributes([("alg", "SHA-1")]),
            &entry.sha1,
        )?;
        writer
            .write_event(Event::End(BytesEnd::new("hashes")))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("component")))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("components")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("bom")))
        .map_err(xml_error)?;

    let mut body = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
    body.push('\n');
    Ok(body)
}

/// `<tag attrs>text</tag>`; the text is escaped by the writer.
fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    text: &str,
) -> SbomResult<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer.write_event(Event::End(end)).map_err(xml_error)
}

fn xml_error(err: impl fmt::Display) -> SbomError {
    SbomError::Serialize {
        message: err.to_string(),
    }
}

fn render_json(entries: &[HashEntry], serial: &str) -> SbomResult<String> {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let components: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "type": "file",
                "name": entry.location,
                "version": COMPONENT_VERSION,
                "hashes": [{ "alg": "SHA-1", "content": entry.sha1 }],
            })
        })
        .collect();

    let bom = json!({
        "bomFormat": "CycloneDX",
        "specVersion": CYCLONEDX_JSON_SPEC_VERSION,
        "serialNumber": serial,
        "version": 1,
        "metadata": {
            "timestamp": timestamp,
            "tools": [{ "name": "hashbrowns", "version": env!("CARGO_PKG_VERSION") }],
        },
        "components": components,
    });

    Ok(serde_json::to_string_pretty(&bom)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<HashEntry> {
        vec![
            HashEntry::new("main.go", "9987ca4f73d5ea0e534dfbf19238552df4de507e"),
            HashEntry::new("Makefile", "2a72a07fbc9de22308d12a32f7d33504349e63c9"),
        ]
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("xml".parse::<ManifestFormat>().unwrap(), ManifestFormat::Xml);
        assert_eq!("JSON".parse::<ManifestFormat>().unwrap(), ManifestFormat::Json);
        assert!(matches!(
            "spdx".parse::<ManifestFormat>(),
            Err(SbomError::UnknownFormat(f)) if f == "spdx"
        ));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(ManifestFormat::Xml.content_type(), "application/xml");
        assert_eq!(ManifestFormat::Json.content_type(), "application/json");
        assert_eq!(ManifestFormat::default(), ManifestFormat::Xml);
    }

    #[test]
    fn test_xml_manifest_structure() {
        let manifest = build_manifest(&entries(), ManifestFormat::Xml).unwrap();
        let body = &manifest.body;

        assert_eq!(manifest.content_type(), "application/xml");
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(body.contains("xmlns=\"http://cyclonedx.org/schema/bom/1.1\""));
        assert!(body.contains("serialNumber=\"urn:uuid:"));
        assert_eq!(body.matches("<component type=\"file\">").count(), 2);
        assert!(body.contains("<name>main.go</name>"));
        assert!(body
            .contains("<hash alg=\"SHA-1\">2a72a07fbc9de22308d12a32f7d33504349e63c9</hash>"));
    }

    #[test]
    fn test_xml_manifest_preserves_entry_order() {
        let body = build_manifest(&entries(), ManifestFormat::Xml).unwrap().body;
        let main = body.find("<name>main.go</name>").unwrap();
        let make = body.find("<name>Makefile</name>").unwrap();
        assert!(main < make);
    }

    #[test]
    fn test_xml_escapes_locations() {
        let entries = vec![HashEntry::new(
            "a&b/<odd> \"name\".txt",
            "9987ca4f73d5ea0e534dfbf19238552df4de507e",
        )];
        let body = build_manifest(&entries, ManifestFormat::Xml).unwrap().body;
        assert!(body.contains("<name>a&amp;b/&lt;odd&gt; &quot;name&quot;.txt</name>"));
    }

    #[test]
    fn test_xml_manifest_reads_back() {
        use quick_xml::events::Event;
        use quick_xml::reader::Reader;

        let entries = vec![
            HashEntry::new("a&b/<odd>.txt", "9987ca4f73d5ea0e534dfbf19238552df4de507e"),
            HashEntry::new("Makefile", "2a72a07fbc9de22308d12a32f7d33504349e63c9"),
        ];
        let body = build_manifest(&entries, ManifestFormat::Xml).unwrap().body;

        let mut reader = Reader::from_str(&body);
        let mut current_tag = String::new();
        let mut names = Vec::new();
        let mut hashes = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    current_tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                }
                Event::Text(e) => {
                    let text = e.unescape().unwrap().trim().to_string();
                    match current_tag.as_str() {
                        "name" if !text.is_empty() => names.push(text),
                        "hash" if !text.is_empty() => hashes.push(text),
                        _ => {}
                    }
                }
                Event::End(_) => current_tag.clear(),
                Event::Eof => break,
                _ => {}
            }
        }

        assert_eq!(names, vec!["a&b/<odd>.txt", "Makefile"]);
        assert_eq!(hashes[1], "2a72a07fbc9de22308d12a32f7d33504349e63c9");
    }

    #[test]
    fn test_json_manifest_structure() {
        let manifest = build_manifest(&entries(), ManifestFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&manifest.body).unwrap();

        assert_eq!(parsed["bomFormat"], "CycloneDX");
        assert_eq!(parsed["specVersion"], "1.4");
        assert!(parsed["serialNumber"]
            .as_str()
            .unwrap()
            .starts_with("urn:uuid:"));
        assert_eq!(parsed["metadata"]["tools"][0]["name"], "hashbrowns");

        let components = parsed["components"].as_array().unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0]["type"], "file");
        assert_eq!(components[0]["name"], "main.go");
        assert_eq!(components[0]["hashes"][0]["alg"], "SHA-1");
        assert_eq!(
            components[1]["hashes"][0]["content"],
            "2a72a07fbc9de22308d12a32f7d33504349e63c9"
        );
    }

    #[test]
    fn test_empty_manifest_is_still_a_document() {
        let xml = build_manifest(&[], ManifestFormat::Xml).unwrap().body;
        assert!(xml.contains("<components>"));
        assert!(xml.contains("</components>"));
        assert!(!xml.contains("<component "));

        let json = build_manifest(&[], ManifestFormat::Json).unwrap().body;
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["components"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_serial_numbers_differ_per_manifest() {
        let a = build_manifest(&entries(), ManifestFormat::Xml).unwrap().body;
        let b = build_manifest(&entries(), ManifestFormat::Xml).unwrap().body;
        assert_ne!(a, b);
    }
}
