
use std::io::BufRead;

use crate::branch::{BranchRecord, Outcome};

/// A reader for plain-text branch traces.
///
/// Each line records one executed branch:
///
/// ```text
/// 0x<pc> 0x<target> <outcome> <conditional> <call> <ret> <direct>
/// ```
///
/// with the addresses in hex (the `0x` prefix is optional) and the
/// remaining fields as 0/1 flags. The first line that fails to parse, and
/// any read error, terminates the stream the same way end-of-input does;
/// nothing after it is observed.
pub struct TraceReader<R: BufRead> {
    stream: R,
    buf: String,
    done: bool,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(stream: R) -> Self {
        Self {
            stream,
            buf: String::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = BranchRecord;
    fn next(&mut self) -> Option<BranchRecord> {
        if self.done {
            return None;
        }
        self.buf.clear();
        let record = match self.stream.read_line(&mut self.buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => parse_record(&self.buf),
        };
        self.done = record.is_none();
        record
    }
}

fn parse_address(field: &str) -> Option<usize> {
    let digits = field.strip_prefix("0x").unwrap_or(field);
    usize::from_str_radix(digits, 16).ok()
}

fn parse_flag(field: &str) -> Option<bool> {
    match field {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

/// Parse one trace line into a [BranchRecord].
pub fn parse_record(line: &str) -> Option<BranchRecord> {
    let mut fields = line.split_whitespace();
    let pc = parse_address(fields.next()?)?;
    let target = parse_address(fields.next()?)?;
    let outcome = Outcome::from(parse_flag(fields.next()?)?);
    let conditional = parse_flag(fields.next()?)?;
    let call = parse_flag(fields.next()?)?;
    let ret = parse_flag(fields.next()?)?;
    let direct = parse_flag(fields.next()?)?;

    Some(BranchRecord {
        pc,
        target,
        outcome,
        conditional,
        call,
        ret,
        direct,
    })
}
