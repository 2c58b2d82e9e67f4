/// A contiguous run of text sharing one emphasis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub emphasized: bool,
}

/// One logical source line of the instructions block after tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub is_bullet: bool,
    pub spans: Vec<TextSpan>,
}

/// Tokenizes one raw instructions line. Two passes: bullet stripping, then a
/// finite scan for `**...**` emphasis pairs. Deliberately not a markdown
/// parser; nothing else is recognized.
pub fn tokenize(raw: &str) -> SourceLine {
    let (is_bullet, rest) = strip_bullet(raw);
    SourceLine {
        is_bullet,
        spans: scan_spans(rest),
    }
}

/// Splits an instructions block into tokenized lines, dropping blank lines.
pub fn source_lines(block: &str) -> Vec<SourceLine> {
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(tokenize)
        .collect()
}

/// A line is a bullet when, after leading whitespace, it starts with `-` or
/// `*` followed by whitespace or end-of-line. The marker and one following
/// separator are consumed.
fn strip_bullet(raw: &str) -> (bool, &str) {
    let trimmed = raw.trim_start();
    let mut chars = trimmed.chars();
    if !matches!(chars.next(), Some('-') | Some('*')) {
        return (false, raw);
    }
    let rest = chars.as_str();
    match rest.chars().next() {
        None => (true, ""),
        Some(sep) if sep.is_whitespace() => (true, &rest[sep.len_utf8()..]),
        Some(_) => (false, raw),
    }
}

/// Emphasis scan: a `**` opener only opens a span if a closing `**` exists
/// later in the line (non-greedy). An unmatched `**` stays literal text.
/// Zero-length spans are omitted.
fn scan_spans(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut plain_start = 0usize;
    let mut cursor = 0usize;
    while let Some(open_rel) = text[cursor..].find("**") {
        let open = cursor + open_rel;
        let body_start = open + 2;
        match text[body_start..].find("**") {
            Some(close_rel) => {
                let close = body_start + close_rel;
                push_span(&mut spans, &text[plain_start..open], false);
                push_span(&mut spans, &text[body_start..close], true);
                cursor = close + 2;
                plain_start = cursor;
            }
            None => {
                cursor = body_start;
            }
        }
    }
    push_span(&mut spans, &text[plain_start..], false);
    spans
}

fn push_span(spans: &mut Vec<TextSpan>, text: &str, emphasized: bool) {
    if text.is_empty() {
        return;
    }
    spans.push(TextSpan {
        text: text.to_string(),
        emphasized,
    });
}
