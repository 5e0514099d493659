//! Locates the `ARTICLE_LINK_MAP` declaration inside the target source file and
//! splices a freshly generated block into it.
//!
//! The target is treated as opaque text except for one span: the opening
//! declaration, the entry body, and a closing token. Each accepted shape of that
//! span is a [`BlockGrammar`]. A closing token only counts when it starts a line
//! (after optional indentation), so string literals inside the body can never end
//! the block. Whatever grammar matched, the block is written back with
//! [`CANONICAL_CLOSING`].

use crate::domain::model::{GeneratedBlock, PatchReport};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SyncError};
use std::ops::Range;

pub const MAP_NAME: &str = "ARTICLE_LINK_MAP";

pub const OPENING: &str = "export const ARTICLE_LINK_MAP: Record<string, string> = {";

pub const CANONICAL_CLOSING: &str = "} as const;";

#[derive(Debug, PartialEq, Eq)]
pub struct BlockGrammar {
    pub name: &'static str,
    pub opening: &'static str,
    pub closing: &'static str,
}

/// Accepted block shapes, highest priority first.
pub static BLOCK_GRAMMARS: &[BlockGrammar] = &[
    BlockGrammar {
        name: "as-const",
        opening: OPENING,
        closing: CANONICAL_CLOSING,
    },
    BlockGrammar {
        name: "plain",
        opening: OPENING,
        closing: "};",
    },
];

/// Byte offsets of one matched block inside the target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    pub grammar: &'static BlockGrammar,
    pub opening: Range<usize>,
    pub body: Range<usize>,
    pub closing: Range<usize>,
}

impl BlockSpan {
    pub fn full(&self) -> Range<usize> {
        self.opening.start..self.closing.end
    }
}

/// Start offsets of every opening declaration, across all grammars.
fn openings(text: &str, grammars: &[BlockGrammar]) -> Vec<usize> {
    let mut starts: Vec<usize> = grammars
        .iter()
        .flat_map(|grammar| text.match_indices(grammar.opening).map(|(start, _)| start))
        .collect();
    starts.sort_unstable();
    starts.dedup();
    starts
}

/// Walks the lines after `from` and returns the first one that begins with a
/// grammar's closing token. Grammars are tried in order on that line.
fn closing_after(
    text: &str,
    from: usize,
    grammars: &'static [BlockGrammar],
) -> Option<(&'static BlockGrammar, Range<usize>)> {
    let mut line_start = from + text[from..].find('\n')? + 1;

    loop {
        let line = &text[line_start..];
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        let token_start = line_start + indent;

        if let Some(grammar) = grammars
            .iter()
            .find(|grammar| text[token_start..].starts_with(grammar.closing))
        {
            return Some((grammar, token_start..token_start + grammar.closing.len()));
        }

        line_start += line.find('\n')? + 1;
    }
}

/// The target file's text together with the single block it must contain.
#[derive(Debug)]
pub struct TargetDocument<'a> {
    text: &'a str,
    span: BlockSpan,
}

impl<'a> TargetDocument<'a> {
    pub fn parse(text: &'a str) -> Result<Self> {
        Self::parse_with(text, BLOCK_GRAMMARS)
    }

    /// Exactly one opening declaration may appear in the file, whichever
    /// terminator each copy uses.
    pub fn parse_with(text: &'a str, grammars: &'static [BlockGrammar]) -> Result<Self> {
        let starts = openings(text, grammars);
        let open_start = match starts.as_slice() {
            [] => {
                return Err(SyncError::BlockNotFound {
                    name: MAP_NAME.to_string(),
                })
            }
            [start] => *start,
            many => {
                return Err(SyncError::AmbiguousBlock {
                    name: MAP_NAME.to_string(),
                    count: many.len(),
                })
            }
        };

        let open_end = grammars
            .iter()
            .filter(|grammar| text[open_start..].starts_with(grammar.opening))
            .map(|grammar| open_start + grammar.opening.len())
            .max()
            .unwrap_or(open_start);

        let Some((grammar, closing)) = closing_after(text, open_end, grammars) else {
            tracing::debug!(
                "{} opening at byte {} has no terminator line",
                MAP_NAME,
                open_start
            );
            return Err(SyncError::BlockNotFound {
                name: MAP_NAME.to_string(),
            });
        };

        let span = BlockSpan {
            grammar,
            opening: open_start..open_end,
            body: open_end..closing.start,
            closing,
        };
        tracing::debug!(
            "Matched {} block with '{}' terminator at bytes {:?}",
            MAP_NAME,
            grammar.name,
            span.full()
        );
        Ok(Self { text, span })
    }

    pub fn span(&self) -> &BlockSpan {
        &self.span
    }

    pub fn body(&self) -> &'a str {
        &self.text[self.span.body.clone()]
    }

    /// Replaces the matched block; bytes outside it are copied unchanged.
    pub fn splice(&self, block: &GeneratedBlock) -> String {
        let before = &self.text[..self.span.opening.start];
        let after = &self.text[self.span.closing.end..];

        let mut out = String::with_capacity(self.text.len() + block.as_str().len());
        out.push_str(before);
        out.push_str(self.span.grammar.opening);
        out.push('\n');
        out.push_str(block.as_str());
        out.push('\n');
        out.push_str(CANONICAL_CLOSING);
        out.push_str(after);
        out
    }
}

pub fn patch(current: &str, block: &GeneratedBlock) -> Result<String> {
    Ok(TargetDocument::parse(current)?.splice(block))
}

/// Reads `path`, patches it, and writes the result back in a single write.
///
/// Nothing is written unless the block was found. With `dry_run` the patched
/// text is computed but the file is left alone.
pub async fn apply_to_file<S: Storage>(
    storage: &S,
    path: &str,
    block: &GeneratedBlock,
    dry_run: bool,
) -> Result<PatchReport> {
    if !storage.exists(path).await {
        return Err(SyncError::MissingTarget { path: path.into() });
    }

    let raw = storage.read_file(path).await?;
    let current = String::from_utf8(raw)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let updated = patch(&current, block)?;
    let changed = updated != current;

    if !changed {
        tracing::info!("{} is already up to date", MAP_NAME);
    }

    if dry_run {
        tracing::info!("Dry run: skipping write to {}", path);
    } else {
        storage.write_file(path, updated.as_bytes()).await?;
        tracing::debug!("Wrote {} bytes to {}", updated.len(), path);
    }

    Ok(PatchReport {
        target: path.to_string(),
        entries: block.len(),
        changed,
        written: !dry_run,
    })
}
