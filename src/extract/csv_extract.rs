//! CSV extraction with delimiter sniffing, grounded in the original's
//! `csv.Sniffer().sniff(sample)` approach: pick whichever candidate
//! delimiter gives the most consistent field count across the first lines.

use std::path::Path;

use crate::error::{EngineError, Result};
use crate::extract::text::decode_text;

const CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

fn sniff_delimiter(sample: &str) -> u8 {
    let lines: Vec<&str> = sample.lines().take(10).filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return b',';
    }
    CANDIDATES
        .iter()
        .copied()
        .max_by_key(|&delim| {
            let counts: Vec<usize> = lines
                .iter()
                .map(|line| line.matches(delim as char).count())
                .collect();
            if counts.iter().all(|&c| c == 0) {
                return 0;
            }
            let first = counts[0];
            let consistent = counts.iter().filter(|&&c| c == first).count();
            consistent * 1000 + first
        })
        .unwrap_or(b',')
}

pub fn extract(path: &Path, bytes: &[u8]) -> Result<String> {
    let text = decode_text(bytes);
    let sample: String = text.chars().take(1024).collect();
    let delimiter = sniff_delimiter(&sample);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| EngineError::Decode {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        rows.push(record.iter().collect::<Vec<_>>().join("\t"));
    }
    Ok(rows.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_comma_delimiter() {
        let csv = "a,b,c\n1,2,3\n4,5,6\n";
        let text = extract(Path::new("f.csv"), csv.as_bytes()).unwrap();
        assert_eq!(text, "a\tb\tc\n1\t2\t3\n4\t5\t6");
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let csv = "a;b;c\n1;2;3\n";
        let text = extract(Path::new("f.csv"), csv.as_bytes()).unwrap();
        assert_eq!(text, "a\tb\tc\n1\t2\t3");
    }

    #[test]
    fn sniffs_tab_delimiter() {
        let csv = "a\tb\n1\t2\n";
        let text = extract(Path::new("f.csv"), csv.as_bytes()).unwrap();
        assert_eq!(text, "a\tb\n1\t2");
    }
}
