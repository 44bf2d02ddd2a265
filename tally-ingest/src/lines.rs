//! Line classification and block assembly.
//!
//! Statement pages interleave transaction rows with boilerplate. A
//! transaction row starts with a date ("17 Oct 25" or "17 Oct 2025"); long
//! descriptions wrap onto undated continuation lines that belong to the
//! row above:
//!
//!   02 Oct 25 CARD PAYMENT TESCO STORES          45.67    954.33
//!             REF 4001 2233 4455
//!   BALANCE CARRIED FORWARD                              954.33

use anyhow::Result;
use regex::Regex;

/// Classification of one raw page line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Known non-transaction marker; never reaches the token extractor.
    Noise,
    /// Line opens a new dated block.
    BlockStart { date_token: String, rest: String },
    /// Undated text belonging to the block in progress.
    Continuation(String),
}

/// Tags each raw line as noise, a new dated block, or a continuation.
pub struct LineClassifier {
    noise: Vec<Regex>,
    block_start: Regex,
}

impl LineClassifier {
    pub fn new(noise_patterns: &[&str]) -> Result<Self> {
        let noise = noise_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(Into::into))
            .collect::<Result<Vec<_>>>()?;

        // Day, abbreviated month, 2- or 4-digit year, then at least one
        // further character.
        let block_start =
            Regex::new(r"^\s*(?P<date>\d{1,2}\s+[A-Za-z]{3}\s+\d{2}(?:\d{2})?)\s+(?P<rest>\S.*)$")?;

        Ok(Self { noise, block_start })
    }

    pub fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() || self.noise.iter().any(|re| re.is_match(trimmed)) {
            return LineKind::Noise;
        }

        if let Some(caps) = self.block_start.captures(trimmed) {
            return LineKind::BlockStart {
                date_token: caps["date"].to_string(),
                rest: caps["rest"].to_string(),
            };
        }

        LineKind::Continuation(trimmed.to_string())
    }
}

/// One logical transaction candidate: a dated line plus its continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedBlock {
    pub date_token: String,
    pub text: String,
}

/// Explicit open-block state for one document's parse pass.
///
/// Starts with no block open; each `BlockStart` closes and yields the
/// previous block. State must never be shared across documents.
#[derive(Debug, Default)]
pub struct BlockAccumulator {
    open: Option<DatedBlock>,
}

impl BlockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh block, returning the previously open one (if any).
    pub fn start(&mut self, date_token: String, rest: String) -> Option<DatedBlock> {
        self.open.replace(DatedBlock {
            date_token,
            text: rest,
        })
    }

    /// Append a continuation to the open block. Returns false when no block
    /// is open; the caller discards the line.
    pub fn append(&mut self, rest: &str) -> bool {
        match self.open.as_mut() {
            Some(block) => {
                block.text.push(' ');
                block.text.push_str(rest);
                true
            }
            None => false,
        }
    }

    /// Close and return the open block at end of document.
    pub fn finish(&mut self) -> Option<DatedBlock> {
        self.open.take()
    }
}
