use std::collections::VecDeque;

use crate::config::Config;
use crate::load_pages::Page;

/// Separators tried in order, from paragraph breaks down to a raw character cut.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// A retrievable slice of one page. `index` is the position in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub page_number: u32,
    pub text: String,
}

/// Splits every page on its own so each chunk keeps a single page number.
pub fn chunk_pages(pages: &[Page], cfg: &Config) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for page in pages {
        for text in split_text(&page.text, cfg.chunk_size, cfg.chunk_overlap) {
            chunks.push(Chunk {
                index: chunks.len(),
                page_number: page.page_number,
                text,
            });
        }
    }
    chunks
}

/// Recursively splits `text` into trimmed chunks of at most `size` characters.
///
/// The largest separator present in the text is used first; pieces that are
/// still too long are split again with the next one. Consecutive chunks built
/// from the same run of pieces share up to `overlap` trailing characters.
pub fn split_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let mut overlap = overlap;

    if size == 0 {
        let mut chunks = Vec::new();
        push_trimmed(&mut chunks, text);
        return chunks;
    }
    if overlap >= size {
        overlap = size / 4;
    }

    split_recursive(text, &SEPARATORS, size, overlap)
}

fn split_recursive(text: &str, separators: &[&str], size: usize, overlap: usize) -> Vec<String> {
    let mut separator = separators.last().copied().unwrap_or("");
    let mut remaining: &[&str] = &[];
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() {
            separator = sep;
            break;
        }
        if text.contains(sep) {
            separator = sep;
            remaining = &separators[i + 1..];
            break;
        }
    }

    let mut chunks = Vec::new();
    let mut fitting: Vec<&str> = Vec::new();
    for piece in split_keeping_separator(text, separator) {
        if char_len(piece) < size {
            fitting.push(piece);
            continue;
        }
        if !fitting.is_empty() {
            chunks.extend(merge_pieces(&fitting, size, overlap));
            fitting.clear();
        }
        if remaining.is_empty() {
            push_trimmed(&mut chunks, piece);
        } else {
            chunks.extend(split_recursive(piece, remaining, size, overlap));
        }
    }
    if !fitting.is_empty() {
        chunks.extend(merge_pieces(&fitting, size, overlap));
    }

    chunks
}

/// Splits at every occurrence of `separator`, leaving the separator at the
/// start of the piece that follows it. An empty separator splits into chars.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, _) in text.match_indices(separator) {
        if pos > start {
            pieces.push(&text[start..pos]);
        }
        start = pos;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Greedily packs pieces into chunks, sliding a window that keeps at most
/// `overlap` characters of the previous chunk.
fn merge_pieces(pieces: &[&str], size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for piece in pieces {
        let len = char_len(piece);
        if total + len > size && !window.is_empty() {
            push_trimmed(&mut chunks, &window.iter().copied().collect::<String>());
            while total > overlap || (total + len > size && total > 0) {
                match window.pop_front() {
                    Some(front) => total -= char_len(front),
                    None => break,
                }
            }
        }
        window.push_back(piece);
        total += len;
    }

    if !window.is_empty() {
        push_trimmed(&mut chunks, &window.iter().copied().collect::<String>());
    }

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_separator_on_following_piece() {
        assert_eq!(
            split_keeping_separator("a\n\nb\n\n\n\nc", "\n\n"),
            vec!["a", "\n\nb", "\n\n", "\n\nc"]
        );
        assert_eq!(split_keeping_separator("héllo", ""), vec!["h", "é", "l", "l", "o"]);
    }

    #[test]
    fn merge_carries_overlap_window() {
        let pieces = ["aaaa", " bbbb", " cccc", " dddd"];
        let chunks = merge_pieces(&pieces, 10, 5);
        assert_eq!(chunks, vec!["aaaa bbbb", "bbbb cccc", "cccc dddd"]);
    }
}
