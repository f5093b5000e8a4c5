//! In-memory ZIP fixtures for integration tests.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;
use std::io::Write;

#[derive(Default)]
struct Record {
    name: Vec<u8>,
    data: Vec<u8>,
    deflate: bool,
    crc_override: Option<u32>,
    /// External attributes; defaults to 0x10 for names ending in '/'
    external_attrs: Option<u32>,
    /// Compressed size announced through a ZIP64 extra field
    zip64_compressed: Option<u64>,
}

/// Builds a minimal, valid ZIP archive byte by byte.
#[derive(Default)]
pub struct ZipBuilder {
    records: Vec<Record>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.raw_name(name.as_bytes(), data)
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.push(Record {
            name: name.as_bytes().to_vec(),
            data: data.to_vec(),
            deflate: true,
            ..Record::default()
        })
    }

    pub fn dir(self, name: &str) -> Self {
        self.stored(name, b"")
    }

    /// A directory flagged only by the MS-DOS attribute, with no trailing slash
    pub fn attribute_dir(self, name: &str) -> Self {
        self.push(Record {
            name: name.as_bytes().to_vec(),
            external_attrs: Some(0x10),
            ..Record::default()
        })
    }

    /// A stored entry whose recorded CRC-32 does not match its data
    pub fn corrupt(self, name: &str, data: &[u8]) -> Self {
        self.push(Record {
            name: name.as_bytes().to_vec(),
            data: data.to_vec(),
            crc_override: Some(0xDEADBEEF),
            ..Record::default()
        })
    }

    /// A stored entry whose Central Directory record claims `claimed`
    /// compressed bytes through the ZIP64 extra field
    pub fn oversized(self, name: &str, data: &[u8], claimed: u64) -> Self {
        self.push(Record {
            name: name.as_bytes().to_vec(),
            data: data.to_vec(),
            zip64_compressed: Some(claimed),
            ..Record::default()
        })
    }

    pub fn raw_name(self, name: &[u8], data: &[u8]) -> Self {
        self.push(Record {
            name: name.to_vec(),
            data: data.to_vec(),
            ..Record::default()
        })
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.as_bytes().to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for record in &self.records {
            let mut crc = Crc::new();
            crc.update(&record.data);
            let crc32 = record.crc_override.unwrap_or(crc.sum());

            let (method, payload) = if record.deflate {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&record.data).unwrap();
                (8u16, encoder.finish().unwrap())
            } else {
                (0u16, record.data.clone())
            };

            let lfh_offset = out.len() as u32;
            let external_attrs = record
                .external_attrs
                .unwrap_or(if record.name.ends_with(b"/") { 0x10 } else { 0 });

            let mut extra = Vec::new();
            let cd_compressed = match record.zip64_compressed {
                Some(claimed) => {
                    extra.write_u16::<LittleEndian>(0x0001).unwrap();
                    extra.write_u16::<LittleEndian>(8).unwrap();
                    extra.write_u64::<LittleEndian>(claimed).unwrap();
                    0xFFFFFFFF
                }
                None => payload.len() as u32,
            };

            out.write_all(b"PK\x03\x04").unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(0x21).unwrap();
            out.write_u32::<LittleEndian>(crc32).unwrap();
            out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(record.data.len() as u32).unwrap();
            out.write_u16::<LittleEndian>(record.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_all(&record.name).unwrap();
            out.write_all(&payload).unwrap();

            central.write_all(b"PK\x01\x02").unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(method).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0x21).unwrap();
            central.write_u32::<LittleEndian>(crc32).unwrap();
            central.write_u32::<LittleEndian>(cd_compressed).unwrap();
            central.write_u32::<LittleEndian>(record.data.len() as u32).unwrap();
            central.write_u16::<LittleEndian>(record.name.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(extra.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(external_attrs).unwrap();
            central.write_u32::<LittleEndian>(lfh_offset).unwrap();
            central.write_all(&record.name).unwrap();
            central.write_all(&extra).unwrap();
        }

        let cd_offset = out.len() as u32;
        out.write_all(&central).unwrap();

        out.write_all(b"PK\x05\x06").unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.records.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.records.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.write_all(&self.comment).unwrap();

        out
    }
}

/// Parse `-a,b` or `+c,d` from a hunk header into (start, len).
fn parse_range(range: &str) -> (usize, usize) {
    let mut parts = range[1..].split(',');
    let start = parts.next().unwrap().parse().unwrap();
    let len = parts.next().map_or(1, |l| l.parse().unwrap());
    (start, len)
}

/// Apply a unified diff to `old`, as `patch` would.
///
/// Panics when a context or removed line does not match `old`, when a
/// hunk overlaps the previous one, or when a hunk body disagrees with
/// its header counts.
pub fn apply_patch(old: &str, patch: &str) -> String {
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let mut out = String::new();
    let mut cursor = 0;

    let mut lines = patch.split('\n').peekable();
    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("@@ ") else {
            continue;
        };

        let mut ranges = header.split(' ');
        let (old_start, old_len) = parse_range(ranges.next().unwrap());
        let (_, new_len) = parse_range(ranges.next().unwrap());
        let hunk_start = if old_len == 0 { old_start } else { old_start - 1 };
        assert!(hunk_start >= cursor, "hunk at line {} overlaps", old_start);
        assert!(hunk_start + old_len <= old_lines.len(), "hunk at line {} past end", old_start);

        while cursor < hunk_start {
            out.push_str(old_lines[cursor]);
            cursor += 1;
        }

        let (mut seen_old, mut seen_new) = (0, 0);
        let mut last_op = ' ';
        while let Some(body) = lines.peek() {
            if body.starts_with("@@") || body.is_empty() {
                break;
            }
            let body = lines.next().unwrap();
            let (op, text) = body.split_at(1);
            match op {
                " " | "-" => {
                    let expected = old_lines[cursor];
                    assert_eq!(
                        expected.strip_suffix('\n').unwrap_or(expected),
                        text,
                        "line {} does not match",
                        cursor + 1
                    );
                    if !expected.ends_with('\n') {
                        assert!(
                            lines.peek().is_some_and(|l| l.starts_with('\\')),
                            "missing newline marker after line {}",
                            cursor + 1
                        );
                    }
                    if op == " " {
                        out.push_str(expected);
                        seen_new += 1;
                    }
                    seen_old += 1;
                    cursor += 1;
                }
                "+" => {
                    out.push_str(text);
                    out.push('\n');
                    seen_new += 1;
                }
                "\\" => {
                    if last_op == '+' {
                        out.pop();
                    }
                }
                _ => panic!("unexpected patch line: {:?}", body),
            }
            if op != "\\" {
                last_op = op.chars().next().unwrap();
            }
        }

        assert_eq!(seen_old, old_len, "old line count of hunk at {}", old_start);
        assert_eq!(seen_new, new_len, "new line count of hunk at {}", old_start);
    }

    while cursor < old_lines.len() {
        out.push_str(old_lines[cursor]);
        cursor += 1;
    }

    out
}
