//
// Parse the survey responses CSV file: a header row, then one row per respondent.
// Exports are sometimes gzipped; we sniff for that and decompress transparently.
//

use std::collections::HashMap;
use std::io::Read;

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};

// header name -> raw value, exactly as it appeared in the file
pub type SurveyRow = HashMap<String, String>;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub fn read_input<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }
    let mut buf = Vec::new();
    MultiGzDecoder::new(&raw[..]).read_to_end(&mut buf)?;
    Ok(buf)
}

// the csv reader is forgiving about a quote that is never closed: it just
// swallows the rest of the file into one field. we'd rather fail loudly.
pub fn check_quoting(input: &[u8]) -> Result<()> {
    let mut line: u64 = 1;
    let mut opened_on: u64 = 0;
    let mut in_quotes = false;
    let mut field_start = true;
    let mut iter = input.iter().peekable();

    while let Some(&b) = iter.next() {
        if b == b'\n' {
            line += 1;
        }
        if in_quotes {
            if b == b'"' {
                if iter.peek() == Some(&&b'"') {
                    iter.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match b {
            b'"' if field_start => {
                in_quotes = true;
                opened_on = line;
                field_start = false;
            }
            b',' | b'\n' | b'\r' => field_start = true,
            _ => field_start = false,
        }
    }

    if in_quotes {
        return Err(Error::UnterminatedQuote { line: opened_on });
    }
    Ok(())
}

// free-text columns are full of mis-encoded bytes; we only care about a
// handful of columns, so invalid utf-8 is replaced rather than fatal
fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

pub fn parse(input: &[u8]) -> Result<Vec<SurveyRow>> {
    check_quoting(input)?;
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let mut rdr = csv::Reader::from_reader(input);
    let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode).collect();
    let mut rows: Vec<SurveyRow> = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let row: SurveyRow = headers
            .iter()
            .cloned()
            .zip(record.iter().map(decode))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// ages are free text. we take the leading integer, if there is one, so
// "25 years" is 25 and "42.9" is 42; anything without leading digits is
// not an age at all
pub fn parse_age(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or_else(|| digits.len());
    if end == 0 {
        return None;
    }
    // absurdly long digit runs are still numbers; pin them to the end of the range
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn parses_rows_keyed_by_header() {
        let rows = parse(b"Q3_AGE,Q6_Twix\n25,Joy\n\"40\",\"MEH\"\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Q3_AGE"], "25");
        assert_eq!(rows[1]["Q6_Twix"], "MEH");
    }

    #[test]
    fn quoted_fields_may_hold_commas_quotes_and_newlines() {
        let rows = parse(b"Q3_AGE,note\n30,\"a, \"\"b\"\"\nc\"\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["note"], "a, \"b\"\nc");
    }

    #[test]
    fn unterminated_quote_is_fatal() {
        match parse(b"Q3_AGE,Q6_Twix\n25,Joy\n31,\"Joy\n") {
            Err(Error::UnterminatedQuote { line }) => assert_eq!(line, 3),
            other => panic!("expected unterminated quote, got {:?}", other),
        }
    }

    #[test]
    fn quote_inside_unquoted_field_is_literal() {
        assert!(check_quoting(b"a,b\n5\"2,x\n").is_ok());
    }

    #[test]
    fn short_row_is_fatal() {
        match parse(b"Q3_AGE,Q6_Twix\n25\n") {
            Err(Error::Csv(_)) => {}
            other => panic!("expected csv error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_utf8_in_unread_column_is_replaced() {
        let rows = parse(b"Q3_AGE,Q6_Twix,Q2_COUNTRY\n25,Joy,Canad\xe9\n40,meh,USA\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Q6_Twix"], "Joy");
        assert_eq!(rows[0]["Q2_COUNTRY"], "Canad\u{fffd}");
        assert_eq!(rows[1]["Q6_Twix"], "meh");
    }

    #[test]
    fn bom_on_header_is_stripped() {
        let rows = parse(b"\xef\xbb\xbfQ3_AGE,Q6_Twix\n25,Joy\n").unwrap();
        assert_eq!(rows[0]["Q3_AGE"], "25");
    }

    #[test]
    fn gzipped_input_is_decompressed() {
        let plain = b"Q3_AGE,Q6_Twix\n25,Joy\n".to_vec();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&plain).unwrap();
        let gz = encoder.finish().unwrap();
        assert_eq!(read_input(&gz[..]).unwrap(), plain);
        assert_eq!(read_input(&plain[..]).unwrap(), plain);
    }

    #[test]
    fn age_takes_leading_integer() {
        assert_eq!(parse_age("25"), Some(25));
        assert_eq!(parse_age("  42.9"), Some(42));
        assert_eq!(parse_age("30 years old"), Some(30));
        assert_eq!(parse_age("-3"), Some(-3));
        assert_eq!(parse_age("+51"), Some(51));
        assert_eq!(parse_age("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_age("abc"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("-"), None);
        assert_eq!(parse_age("old, 50"), None);
    }
}
