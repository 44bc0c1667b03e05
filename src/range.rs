//! Page range expressions
//!
//! Accepted forms, separated by commas, semicolons or whitespace:
//!
//! - `7` a single page
//! - `3-9` an ascending range, `9-3` a descending one
//! - `5-` from page 5 to the last page
//! - `-4` from the first page to page 4
//!
//! An empty expression or `all` selects every page. Order and duplicates are
//! kept as written.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number(u32),
    Dash,
    Separator,
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '0'..='9' => {
                let mut end = start + 1;
                while let Some(&(i, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = i + 1;
                    chars.next();
                }
                let number = text[start..end]
                    .parse()
                    .map_err(|_| Error::InvalidPageRange(format!("number too large: {}", &text[start..end])))?;
                tokens.push(Token::Number(number));
            }
            '-' => tokens.push(Token::Dash),
            ',' | ';' => tokens.push(Token::Separator),
            c if c.is_whitespace() => {}
            other => {
                return Err(Error::InvalidPageRange(format!(
                    "unexpected character '{}' in \"{}\"",
                    other, text
                )))
            }
        }
    }

    Ok(tokens)
}

/// Pages from `from` to `to`, descending when `from > to`
fn expand(from: u32, to: u32, pages: &mut Vec<u32>) {
    if from <= to {
        pages.extend(from..=to);
    } else {
        pages.extend((to..=from).rev());
    }
}

/// Resolve a page range expression against a document of `page_count` pages
///
/// Range endpoints are clamped to the document; a single page, or a range
/// lying entirely past the last page, is an error.
pub fn parse_page_range(text: Option<&str>, page_count: u32) -> Result<Vec<u32>> {
    let text = text.map(str::trim).unwrap_or("");
    if text.is_empty() || text.eq_ignore_ascii_case("all") {
        return Ok((1..=page_count).collect());
    }

    let clamp = |page: u32| page.clamp(1, page_count.max(1));
    let tokens = tokenize(text)?;
    let mut pages = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let (from, to) = match tokens[i..] {
            [Token::Separator, ..] => {
                i += 1;
                continue;
            }
            [Token::Number(from), Token::Dash, Token::Number(to), ..] => {
                i += 3;
                (from, Some(to))
            }
            [Token::Number(from), Token::Dash, ..] => {
                i += 2;
                (from, Some(page_count))
            }
            [Token::Dash, Token::Number(to), ..] => {
                i += 2;
                (1, Some(to))
            }
            [Token::Number(page), ..] => {
                i += 1;
                (page, None)
            }
            _ => return Err(Error::InvalidPageRange(text.to_string())),
        };

        if let Some(Token::Dash) = tokens.get(i) {
            return Err(Error::InvalidPageRange(text.to_string()));
        }

        match to {
            None => {
                if outside_document(from, page_count) {
                    return Err(Error::InvalidPageRange(format!(
                        "page {} is outside 1-{}",
                        from, page_count
                    )));
                }
                pages.push(from);
            }
            Some(to) => {
                if from > page_count && to > page_count {
                    return Err(Error::InvalidPageRange(format!(
                        "range {}-{} is past the last page ({})",
                        from, to, page_count
                    )));
                }
                expand(clamp(from), clamp(to), &mut pages);
            }
        }
    }

    Ok(pages)
}

fn outside_document(page: u32, page_count: u32) -> bool {
    page == 0 || page > page_count
}
