//! Access traces.
//!
//! A trace is plain text with one access per line:
//!
//! ```text
//! # comment
//! r 0x00001000
//! w 0x00001004 0xdeadbeef
//! R 4096
//! ```
//!
//! The operation is `r` or `w` in either case. Numbers are decimal or
//! `0x`-prefixed hex. Blank lines and anything after `#` are ignored.

use crate::common::{CacheError, TraceError, TraceErrorKind};
use crate::core::cache::Cache;
use crate::system::memory::Memory;

/// One access issued to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read(u32),
    Write(u32, u32),
}

/// Parses a whole trace.
///
/// # Errors
///
/// The first malformed line, with its 1-based line number.
pub fn parse_trace(input: &str) -> Result<Vec<Access>, TraceError> {
    let mut accesses = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let access = parse_line(line).map_err(|kind| TraceError {
            line: idx + 1,
            kind,
        })?;
        accesses.push(access);
    }
    Ok(accesses)
}

fn parse_line(line: &str) -> Result<Access, TraceErrorKind> {
    let mut fields = line.split_whitespace();
    let op = fields.next().unwrap_or_default();
    let operands: Vec<&str> = fields.collect();
    let expect = |expected: usize| {
        if operands.len() == expected {
            Ok(())
        } else {
            Err(TraceErrorKind::OperandCount {
                expected,
                found: operands.len(),
            })
        }
    };
    match op.to_ascii_lowercase().as_str() {
        "r" => {
            expect(1)?;
            Ok(Access::Read(parse_u32(operands[0])?))
        }
        "w" => {
            expect(2)?;
            Ok(Access::Write(parse_u32(operands[0])?, parse_u32(operands[1])?))
        }
        _ => Err(TraceErrorKind::UnknownOp(op.to_string())),
    }
}

fn parse_u32(s: &str) -> Result<u32, TraceErrorKind> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|_| TraceErrorKind::BadNumber(s.to_string()))
}

impl<M: Memory> Cache<M> {
    /// Issues every access of `trace` in order, stopping at the first fault.
    pub fn run(&mut self, trace: &[Access]) -> Result<(), CacheError> {
        for access in trace {
            match *access {
                Access::Read(addr) => {
                    self.read(addr)?;
                }
                Access::Write(addr, data) => self.write(addr, data)?,
            }
        }
        log::info!("replayed {} accesses", trace.len());
        Ok(())
    }
}
