use crate::domain::{DiaryDocument, EntryRecord};
use anyhow::{Context, Result, anyhow, bail};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::fmt;

const ROOT: &[u8] = b"diary";
const ENTRY: &[u8] = b"entry";

/// How a document came out of [`XmlCodec::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    /// A well-formed `<diary>` document.
    Parsed,
    /// Nothing to parse.
    Blank,
    /// The input was malformed and an empty document was substituted.
    Recovered(String),
}

impl ParseStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, ParseStatus::Recovered(_))
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStatus::Parsed => write!(f, "parsed"),
            ParseStatus::Blank => write!(f, "blank"),
            ParseStatus::Recovered(reason) => write!(f, "recovered from malformed XML: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub document: DiaryDocument,
    pub status: ParseStatus,
}

impl Parsed {
    fn empty(status: ParseStatus) -> Self {
        Self {
            document: DiaryDocument::new(),
            status,
        }
    }
}

/// Text in, document out. Never fails on bad input.
pub struct XmlCodec;

impl XmlCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Parsed {
        if text.trim().is_empty() {
            return Parsed::empty(ParseStatus::Blank);
        }

        match read_document(text) {
            Ok(document) => Parsed {
                document,
                status: ParseStatus::Parsed,
            },
            Err(e) => Parsed::empty(ParseStatus::Recovered(format!("{:#}", e))),
        }
    }

    pub fn serialize(&self, document: &DiaryDocument) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        writer.write_event(Event::Start(BytesStart::new("diary")))?;
        for record in document.records() {
            let mut start = BytesStart::new("entry");
            start.push_attribute(("day", record.day.as_str()));
            start.push_attribute(("month", record.month.as_str()));
            start.push_attribute(("year", record.year.as_str()));

            writer.write_event(Event::Start(start))?;
            if !record.text.is_empty() {
                writer.write_event(Event::Text(BytesText::new(&record.text)))?;
            }
            writer.write_event(Event::End(BytesEnd::new("entry")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("diary")))?;

        String::from_utf8(writer.into_inner()).context("Serialized diary is not UTF-8")
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<String> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(attr.unescape_value()?.into_owned()),
        None => Ok(String::new()),
    }
}

fn record_from(element: &BytesStart<'_>) -> Result<EntryRecord> {
    Ok(EntryRecord::new(
        attribute(element, "day")?,
        attribute(element, "month")?,
        attribute(element, "year")?,
        String::new(),
    ))
}

fn read_document(text: &str) -> Result<DiaryDocument> {
    let mut reader = Reader::from_str(text);

    let mut document = DiaryDocument::new();
    // Open elements, innermost last.
    let mut depth = 0usize;
    let mut seen_root = false;
    // The entry being read and the depth it was opened at. Only direct
    // children of the root are entries; deeper <entry> tags are entry text.
    let mut current: Option<(EntryRecord, usize)> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| anyhow!("{} at byte {}", e, position))?;

        match event {
            Event::Start(element) => {
                if depth == 0 {
                    if seen_root {
                        bail!("more than one root element");
                    }
                    if element.name().as_ref() != ROOT {
                        bail!(
                            "root element is <{}>, not <diary>",
                            String::from_utf8_lossy(element.name().as_ref())
                        );
                    }
                    seen_root = true;
                } else if depth == 1 && element.name().as_ref() == ENTRY {
                    current = Some((record_from(&element)?, depth + 1));
                }
                depth += 1;
            }
            Event::Empty(element) => {
                if depth == 0 {
                    if seen_root {
                        bail!("more than one root element");
                    }
                    if element.name().as_ref() != ROOT {
                        bail!("root element is not <diary>");
                    }
                    seen_root = true;
                } else if depth == 1 && element.name().as_ref() == ENTRY {
                    document.push(record_from(&element)?);
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("unexpected closing tag"))?;
                if current
                    .as_ref()
                    .is_some_and(|(_, opened_at)| *opened_at > depth)
                {
                    if let Some((record, _)) = current.take() {
                        document.push(record);
                    }
                }
            }
            Event::Text(content) => {
                let content = content.unescape()?;
                if depth == 0 {
                    if !content.trim().is_empty() {
                        bail!("text outside the root element");
                    }
                } else if let Some((record, _)) = current.as_mut() {
                    record.text.push_str(&content);
                }
            }
            Event::CData(content) => {
                if depth == 0 {
                    bail!("CDATA outside the root element");
                }
                if let Some((record, _)) = current.as_mut() {
                    let raw = content.into_inner();
                    let decoded =
                        std::str::from_utf8(&raw).context("CDATA section is not UTF-8")?;
                    record.text.push_str(decoded);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if depth != 0 {
        bail!("unexpected end of input inside an element");
    }
    if !seen_root {
        bail!("no <diary> root element");
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Month;

    fn parse(text: &str) -> Parsed {
        XmlCodec::new().parse(text)
    }

    #[test]
    fn serializes_attributes_in_order() {
        let document = DiaryDocument::from_records(vec![
            EntryRecord::canonical(15, Month::Feb, 2024, "old"),
            EntryRecord::canonical(1, Month::Mar, 2024, ""),
        ]);

        let xml = XmlCodec::new().serialize(&document).unwrap();

        assert_eq!(
            xml,
            "<diary><entry day=\"15\" month=\"FEB\" year=\"2024\">old</entry>\
             <entry day=\"1\" month=\"MAR\" year=\"2024\"></entry></diary>"
        );
    }

    #[test]
    fn empty_document_serializes_to_bare_root() {
        let xml = XmlCodec::new().serialize(&DiaryDocument::new()).unwrap();
        assert_eq!(xml, "<diary></diary>");
        assert_eq!(parse(&xml).status, ParseStatus::Parsed);
        assert!(parse(&xml).document.is_empty());
    }

    #[test]
    fn round_trips_awkward_text_exactly() {
        let texts = [
            "",
            "plain",
            "  leading and trailing  ",
            "line one\nline two\n",
            "<tag> & \"quotes\" 'apostrophes' ]]>",
            "emoji 🌧️ and accents é",
        ];
        let document = DiaryDocument::from_records(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| EntryRecord::canonical(i as u32 + 1, Month::Jun, 2022, *text))
                .collect(),
        );

        let codec = XmlCodec::new();
        let parsed = codec.parse(&codec.serialize(&document).unwrap());

        assert_eq!(parsed.status, ParseStatus::Parsed);
        assert_eq!(parsed.document, document);
    }

    #[test]
    fn malformed_input_recovers_to_empty() {
        for text in [
            "not xml at all",
            "<diary><entry day=\"1\" month=\"JAN\" year=\"2024\">x</diary>",
            "<diary><entry day=\"1\">",
            "<notes></notes>",
            "<diary></diary><diary></diary>",
            "<diary>&bogus;</diary>",
            "</diary>",
        ] {
            let parsed = parse(text);
            assert!(parsed.status.is_recovered(), "{text:?} gave {:?}", parsed.status);
            assert!(parsed.document.is_empty());
        }
    }

    #[test]
    fn blank_input_is_not_corruption() {
        assert_eq!(parse("").status, ParseStatus::Blank);
        assert_eq!(parse("  \n").status, ParseStatus::Blank);
    }

    #[test]
    fn accepts_declaration_comments_and_whitespace() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported -->
<diary>
  <entry day="5" month="JAN" year="2024">grocery list</entry>
  <entry day="25" month="DEC" year="2023"/>
</diary>
"#;
        let parsed = parse(text);

        assert_eq!(parsed.status, ParseStatus::Parsed);
        assert_eq!(
            parsed.document.records(),
            &[
                EntryRecord::new("5", "JAN", "2024", "grocery list"),
                EntryRecord::new("25", "DEC", "2023", ""),
            ]
        );
    }

    #[test]
    fn entry_text_collects_nested_text_and_cdata() {
        let parsed = parse(
            "<diary><entry day=\"1\" month=\"MAY\" year=\"2020\">a<b>b</b><![CDATA[<c>]]></entry></diary>",
        );
        assert_eq!(parsed.document.records()[0].text, "ab<c>");
    }

    #[test]
    fn missing_attributes_become_empty_strings() {
        let parsed = parse("<diary><entry month=\"JAN\">x</entry></diary>");
        assert_eq!(parsed.document.records(), &[EntryRecord::new("", "JAN", "", "x")]);
    }

    #[test]
    fn ignores_unknown_elements_under_root() {
        let parsed = parse(
            "<diary><meta>v2</meta><entry day=\"2\" month=\"FEB\" year=\"2022\">y</entry></diary>",
        );
        assert_eq!(parsed.document.len(), 1);
        assert_eq!(parsed.document.records()[0].text, "y");
    }

    #[test]
    fn only_direct_children_of_the_root_are_entries() {
        let parsed = parse(
            "<diary><group><entry day=\"1\" month=\"JAN\" year=\"2020\">hidden</entry></group>\
             <entry day=\"2\" month=\"JAN\" year=\"2020\">outer<entry day=\"3\" month=\"JAN\" year=\"2020\">inner</entry></entry></diary>",
        );
        assert_eq!(parsed.status, ParseStatus::Parsed);
        assert_eq!(
            parsed.document.records(),
            &[EntryRecord::new("2", "JAN", "2020", "outerinner")]
        );
    }

    #[test]
    fn unescapes_attribute_values() {
        let parsed = parse("<diary><entry day=\"1\" month=\"J&amp;N\" year=\"1\">z</entry></diary>");
        assert_eq!(parsed.document.records()[0].month, "J&N");
    }
}
