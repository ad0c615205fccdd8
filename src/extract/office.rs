//! Office Open XML extraction (`.docx`, `.pptx`, `.xlsx`) via `zip` +
//! `quick-xml`. Each format is a zip archive of XML parts; we walk the
//! relevant part(s) and pull out run text, dropping markup entirely rather
//! than attempting full OOXML schema fidelity.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{EngineError, Result};

fn open_zip<'a>(path: &Path, bytes: &'a [u8]) -> Result<ZipArchive<Cursor<&'a [u8]>>> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| EngineError::Extract {
        path: path.to_path_buf(),
        cause: format!("not a valid zip container: {e}"),
    })
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Option<String> {
    let mut file = archive.by_name(name).ok()?;
    let mut buf = String::new();
    file.read_to_string(&mut buf).ok()?;
    Some(buf)
}

/// Extracts paragraph text from `word/document.xml`, joining non-empty
/// paragraphs with blank lines.
pub fn extract_docx(path: &Path, bytes: &[u8]) -> Result<String> {
    let mut archive = open_zip(path, bytes)?;
    let xml = read_entry(&mut archive, "word/document.xml").ok_or_else(|| EngineError::Extract {
        path: path.to_path_buf(),
        cause: "missing word/document.xml".into(),
    })?;

    let mut reader = Reader::from_str(&xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"p" => {
                current.clear();
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => {
                if !current.trim().is_empty() {
                    paragraphs.push(current.trim().to_string());
                }
            }
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => in_text = false,
            Ok(Event::Text(t)) if in_text => {
                current.push_str(&t.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EngineError::Extract {
                    path: path.to_path_buf(),
                    cause: format!("xml parse error: {e}"),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n\n"))
}

/// Extracts per-slide run text from `ppt/slides/slideN.xml`, concatenated in
/// slide order with a blank line between slides.
pub fn extract_pptx(path: &Path, bytes: &[u8]) -> Result<String> {
    let mut archive = open_zip(path, bytes)?;
    let mut slide_names: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .filter(|name| {
            name.starts_with("ppt/slides/slide") && name.ends_with(".xml") && !name.contains("rels")
        })
        .collect();
    slide_names.sort_by_key(|name| slide_index(name));

    let mut slides = Vec::new();
    for name in slide_names {
        let xml = match read_entry(&mut archive, &name) {
            Some(xml) => xml,
            None => continue,
        };
        let text = extract_runs(&xml, path)?;
        if !text.trim().is_empty() {
            slides.push(text.trim().to_string());
        }
    }
    Ok(slides.join("\n\n"))
}

fn slide_index(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

fn extract_runs(xml: &str, path: &Path) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => {
                in_text = false;
                out.push(' ');
            }
            Ok(Event::Text(t)) if in_text => out.push_str(&t.unescape().unwrap_or_default()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EngineError::Extract {
                    path: path.to_path_buf(),
                    cause: format!("xml parse error: {e}"),
                })
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

/// Extracts sheet text from `xl/worksheets/sheetN.xml`, resolving shared
/// strings, emitting `Sheet: <name>` then tab-joined non-blank cell values
/// per row.
pub fn extract_xlsx(path: &Path, bytes: &[u8]) -> Result<String> {
    let mut archive = open_zip(path, bytes)?;

    let shared_strings = read_entry(&mut archive, "xl/sharedStrings.xml")
        .map(|xml| parse_shared_strings(&xml))
        .unwrap_or_default();

    let workbook_xml = read_entry(&mut archive, "xl/workbook.xml").ok_or_else(|| EngineError::Extract {
        path: path.to_path_buf(),
        cause: "missing xl/workbook.xml".into(),
    })?;
    let sheet_names = parse_sheet_names(&workbook_xml);

    let mut sheet_paths: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .filter(|name| name.starts_with("xl/worksheets/sheet") && name.ends_with(".xml"))
        .collect();
    sheet_paths.sort_by_key(|name| sheet_index(name));

    let mut out = Vec::new();
    for (i, sheet_path) in sheet_paths.iter().enumerate() {
        let xml = match read_entry(&mut archive, sheet_path) {
            Some(xml) => xml,
            None => continue,
        };
        let name = sheet_names.get(i).cloned().unwrap_or_else(|| format!("Sheet{}", i + 1));
        let rows = parse_sheet_rows(&xml, &shared_strings);
        if rows.is_empty() {
            continue;
        }
        out.push(format!("Sheet: {name}\n{}", rows.join("\n")));
    }
    Ok(out.join("\n\n"))
}

fn sheet_index(name: &str) -> u32 {
    name.trim_start_matches("xl/worksheets/sheet")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

fn parse_shared_strings(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"si" => {
                in_si = true;
                current.clear();
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"si" => {
                in_si = false;
                strings.push(current.clone());
            }
            Ok(Event::Start(e)) if in_si && e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => in_text = false,
            Ok(Event::Text(t)) if in_text => current.push_str(&t.unescape().unwrap_or_default()),
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    strings
}

fn parse_sheet_names(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut names = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"name" {
                        names.push(String::from_utf8_lossy(&attr.value).into_owned());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    names
}

fn parse_sheet_rows(xml: &str, shared_strings: &[String]) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut current_cell_type: Option<String> = None;
    let mut current_value = String::new();
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"row" => current_row.clear(),
            Ok(Event::End(e)) if e.local_name().as_ref() == b"row" => {
                rows.push(std::mem::take(&mut current_row));
            }
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"c" => {
                current_cell_type = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.local_name().as_ref() == b"t")
                    .map(|a| String::from_utf8_lossy(&a.value).into_owned());
            }
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"v" => {
                in_value = true;
                current_value.clear();
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"v" => {
                in_value = false;
                let resolved = if current_cell_type.as_deref() == Some("s") {
                    current_value
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| shared_strings.get(i))
                        .cloned()
                        .unwrap_or_default()
                } else {
                    current_value.clone()
                };
                current_row.push(resolved);
            }
            Ok(Event::Text(t)) if in_value => current_value.push_str(&t.unescape().unwrap_or_default()),
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rows.into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| row.join("\t"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            for (name, content) in entries {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn extracts_docx_paragraphs() {
        let document_xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="ns"><w:body>
<w:p><w:r><w:t>Hello</w:t></w:r></w:p>
<w:p><w:r><w:t>World</w:t></w:r></w:p>
</w:body></w:document>"#;
        let zip = build_zip(&[("word/document.xml", document_xml)]);
        let text = extract_docx(Path::new("doc.docx"), &zip).unwrap();
        assert_eq!(text, "Hello\n\nWorld");
    }

    #[test]
    fn extracts_xlsx_sheet_with_shared_strings() {
        let shared = r#"<sst><si><t>Name</t></si><si><t>Age</t></si></sst>"#;
        let workbook = r#"<workbook><sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
        let sheet = r#"<worksheet><sheetData>
<row><c t="s"><v>0</v></c><c t="s"><v>1</v></c></row>
<row><c><v>Alice</v></c><c><v>30</v></c></row>
</sheetData></worksheet>"#;
        let zip = build_zip(&[
            ("xl/sharedStrings.xml", shared),
            ("xl/workbook.xml", workbook),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);
        let text = extract_xlsx(Path::new("book.xlsx"), &zip).unwrap();
        assert!(text.starts_with("Sheet: Data"));
        assert!(text.contains("Name\tAge"));
        assert!(text.contains("Alice\t30"));
    }

    #[test]
    fn extracts_pptx_slide_text() {
        let slide = r#"<p:sld><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>Title</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;
        let zip = build_zip(&[("ppt/slides/slide1.xml", slide)]);
        let text = extract_pptx(Path::new("deck.pptx"), &zip).unwrap();
        assert!(text.contains("Title"));
    }

    #[test]
    fn rejects_non_zip_bytes() {
        let err = extract_docx(Path::new("bad.docx"), b"not a zip").unwrap_err();
        assert!(matches!(err, EngineError::Extract { .. }));
    }
}
