//! Renderer for the constrained markdown subset used in analysis text.
//!
//! The supported markup is deliberately tiny: headings introduced by one
//! to three leading `#` characters, bold (`**text**`), italic (`*text*`),
//! list items introduced by a leading `- `, and newlines. Rules apply in
//! a fixed order (headings, bold, italic, list items, line breaks) as
//! non-recursive single-pass substitutions. Nested or overlapping
//! constructs on the same line are an accepted limitation, preserved for
//! compatibility rather than "fixed".
//!
//! Internally the input is parsed once into a typed sequence of
//! [`Line`]/[`Span`] nodes; both styling targets serialize the same
//! parse, so the on-screen and document-export renderings can never
//! drift apart. The export pipeline consumes [`parse`] directly and
//! never re-implements the rules.
//!
//! Any input is valid. Plain text with no markup characters passes
//! through with only newline-to-line-break conversion.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Heading rule: three `#` characters at line start.
#[allow(clippy::unwrap_used)]
static H3_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^### (.*)$").unwrap());

/// Heading rule: two `#` characters at line start.
#[allow(clippy::unwrap_used)]
static H2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^## (.*)$").unwrap());

/// Heading rule: one `#` character at line start.
#[allow(clippy::unwrap_used)]
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^# (.*)$").unwrap());

/// Bold rule: double-asterisk delimited span.
#[allow(clippy::unwrap_used)]
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Italic rule: single-asterisk delimited span.
#[allow(clippy::unwrap_used)]
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// List item rule: `- ` at line start.
#[allow(clippy::unwrap_used)]
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^- (.*)$").unwrap());

// ---------------------------------------------------------------------------
// Typed markup model
// ---------------------------------------------------------------------------

/// Block-level classification of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// `# ` heading.
    H1,
    /// `## ` heading.
    H2,
    /// `### ` heading.
    H3,
    /// `- ` list item.
    ListItem,
    /// Anything else, including blank lines.
    Paragraph,
}

/// Inline emphasis applied to a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emphasis {
    /// No emphasis.
    Plain,
    /// Bold (`**text**`).
    Strong,
    /// Italic (`*text*`).
    Em,
}

/// A run of text with a single emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// The emphasis applied to this run.
    pub emphasis: Emphasis,
    /// The literal text of the run, delimiters stripped.
    pub text: String,
}

/// One parsed input line: a block kind plus its inline spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Block-level classification.
    pub block: Block,
    /// Inline spans, in source order.
    pub spans: Vec<Span>,
}

/// Which surface the rendered markup is destined for.
///
/// Screen output carries the frontend's utility classes; print output
/// carries self-contained inline styles so the export layout needs no
/// stylesheet. The rule set and rule order are identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTarget {
    /// On-screen rendering (class-attribute styling).
    Screen,
    /// Document-export rendering (inline styling).
    Print,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse markup text into its typed line sequence.
///
/// Rules apply in fixed order per line: headings (`###`, `##`, `#`),
/// then bold, then italic, then list items. Each rule is a single pass;
/// the output of one rule is never re-scanned by the same rule.
pub fn parse(text: &str) -> Vec<Line> {
    text.split('\n').map(parse_line).collect()
}

/// Classify one line and parse its inline spans.
fn parse_line(line: &str) -> Line {
    for (re, block) in [
        (&H3_RE, Block::H3),
        (&H2_RE, Block::H2),
        (&H1_RE, Block::H1),
        (&LIST_RE, Block::ListItem),
    ] {
        if let Some(caps) = re.captures(line) {
            let content = caps.get(1).map_or("", |m| m.as_str());
            return Line {
                block,
                spans: parse_inline(content),
            };
        }
    }
    Line {
        block: Block::Paragraph,
        spans: parse_inline(line),
    }
}

/// Parse inline emphasis within one line's content.
///
/// Bold spans are found first; italic is then applied only to the text
/// between them. A marker inside an already-matched span is not
/// re-processed (the one-pass limitation).
fn parse_inline(content: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for caps in BOLD_RE.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let before = content.get(cursor..whole.start()).unwrap_or("");
        push_italic_spans(&mut spans, before);
        spans.push(Span {
            emphasis: Emphasis::Strong,
            text: caps.get(1).map_or("", |m| m.as_str()).to_owned(),
        });
        cursor = whole.end();
    }
    push_italic_spans(&mut spans, content.get(cursor..).unwrap_or(""));
    spans
}

/// Split a bold-free segment into plain and italic spans.
fn push_italic_spans(spans: &mut Vec<Span>, segment: &str) {
    let mut cursor = 0;
    for caps in ITALIC_RE.captures_iter(segment) {
        let Some(whole) = caps.get(0) else { continue };
        push_plain(spans, segment.get(cursor..whole.start()).unwrap_or(""));
        spans.push(Span {
            emphasis: Emphasis::Em,
            text: caps.get(1).map_or("", |m| m.as_str()).to_owned(),
        });
        cursor = whole.end();
    }
    push_plain(spans, segment.get(cursor..).unwrap_or(""));
}

/// Append a plain span, skipping empty runs.
fn push_plain(spans: &mut Vec<Span>, text: &str) {
    if !text.is_empty() {
        spans.push(Span {
            emphasis: Emphasis::Plain,
            text: text.to_owned(),
        });
    }
}

// ---------------------------------------------------------------------------
// HTML serialization
// ---------------------------------------------------------------------------

/// Render markup text to styled HTML for the given target.
///
/// Lines are joined with `<br />`, matching the original newline rule:
/// the break appears between every pair of input lines, headings and
/// list items included.
pub fn render_html(text: &str, target: StyleTarget) -> String {
    let rendered: Vec<String> = parse(text)
        .iter()
        .map(|line| line_to_html(line, target))
        .collect();
    rendered.join("<br />")
}

/// Serialize one parsed line for the given target.
fn line_to_html(line: &Line, target: StyleTarget) -> String {
    let inline: String = line
        .spans
        .iter()
        .map(span_to_html)
        .collect();
    match (line.block, target) {
        (Block::Paragraph, _) => inline,
        (Block::H3, StyleTarget::Screen) => {
            format!(r#"<h3 class="text-xl font-semibold text-slate-700 mt-4 mb-2">{inline}</h3>"#)
        }
        (Block::H3, StyleTarget::Print) => format!(
            r#"<h3 style="font-size: 1.25em; font-weight: 600; margin-top: 1em; margin-bottom: 0.5em; color: #334155;">{inline}</h3>"#
        ),
        (Block::H2, StyleTarget::Screen) => {
            format!(r#"<h2 class="text-2xl font-bold text-red-600 mt-6 mb-3">{inline}</h2>"#)
        }
        (Block::H2, StyleTarget::Print) => format!(
            r#"<h2 style="font-size: 1.5em; font-weight: 700; margin-top: 1.2em; margin-bottom: 0.6em; color: #ef4444;">{inline}</h2>"#
        ),
        (Block::H1, StyleTarget::Screen) => {
            format!(r#"<h1 class="text-3xl font-extrabold text-orange-700 mt-8 mb-4">{inline}</h1>"#)
        }
        (Block::H1, StyleTarget::Print) => format!(
            r#"<h1 style="font-size: 2em; font-weight: 800; margin-top: 1.5em; margin-bottom: 0.8em; color: #f97316;">{inline}</h1>"#
        ),
        (Block::ListItem, StyleTarget::Screen) => {
            format!(r#"<li class="ml-6 list-disc">{inline}</li>"#)
        }
        (Block::ListItem, StyleTarget::Print) => format!(
            r#"<li style="margin-left: 1.5em; list-style-type: disc;">{inline}</li>"#
        ),
    }
}

/// Serialize one inline span. Emphasis tags are target-independent.
fn span_to_html(span: &Span) -> String {
    match span.emphasis {
        Emphasis::Plain => span.text.clone(),
        Emphasis::Strong => format!("<strong>{}</strong>", span.text),
        Emphasis::Em => format!("<em>{}</em>", span.text),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through_untouched() {
        let input = "그냥 평범한 문장입니다";
        assert_eq!(render_html(input, StyleTarget::Screen), input);
        assert_eq!(render_html(input, StyleTarget::Print), input);
    }

    #[test]
    fn newlines_become_line_breaks_and_nothing_else() {
        let input = "첫 줄\n둘째 줄\n셋째 줄";
        assert_eq!(
            render_html(input, StyleTarget::Screen),
            "첫 줄<br />둘째 줄<br />셋째 줄"
        );
    }

    #[test]
    fn heading_levels_map_to_their_tags() {
        let parsed = parse("# 하나\n## 둘\n### 셋");
        let blocks: Vec<Block> = parsed.iter().map(|l| l.block).collect();
        assert_eq!(blocks, vec![Block::H1, Block::H2, Block::H3]);
    }

    #[test]
    fn heading_rule_only_fires_at_line_start() {
        // Bold wraps a heading marker: the # is not at line start once
        // preceded by the bold delimiter, so no heading applies.
        let parsed = parse("**# Title**");
        assert_eq!(parsed.len(), 1);
        let line = parsed.first().unwrap();
        assert_eq!(line.block, Block::Paragraph);
        assert_eq!(
            line.spans,
            vec![Span {
                emphasis: Emphasis::Strong,
                text: "# Title".to_owned()
            }]
        );
        assert_eq!(
            render_html("**# Title**", StyleTarget::Screen),
            "<strong># Title</strong>"
        );
    }

    #[test]
    fn mid_line_hash_is_plain_text() {
        assert_eq!(
            render_html("숫자 #1 이야기", StyleTarget::Screen),
            "숫자 #1 이야기"
        );
    }

    #[test]
    fn bold_and_italic_split_a_line_into_spans() {
        let parsed = parse("이건 **굵게** 그리고 *기울여서* 끝");
        let line = parsed.first().unwrap();
        assert_eq!(
            line.spans,
            vec![
                Span {
                    emphasis: Emphasis::Plain,
                    text: "이건 ".to_owned()
                },
                Span {
                    emphasis: Emphasis::Strong,
                    text: "굵게".to_owned()
                },
                Span {
                    emphasis: Emphasis::Plain,
                    text: " 그리고 ".to_owned()
                },
                Span {
                    emphasis: Emphasis::Em,
                    text: "기울여서".to_owned()
                },
                Span {
                    emphasis: Emphasis::Plain,
                    text: " 끝".to_owned()
                },
            ]
        );
    }

    #[test]
    fn two_bold_spans_on_one_line_stay_separate() {
        assert_eq!(
            render_html("**하나** 사이 **둘**", StyleTarget::Print),
            "<strong>하나</strong> 사이 <strong>둘</strong>"
        );
    }

    #[test]
    fn repeated_emphasis_is_matched_lazily_not_greedily() {
        // Deliberate divergence from a greedy `\*\*(.*)\*\*` rule, which
        // would swallow everything between the first and last delimiter
        // into one span ("a** x **b"). Each delimited run stays its own
        // span here; the text between them stays plain.
        let parsed = parse("**a** x **b**");
        let line = parsed.first().unwrap();
        assert_eq!(
            line.spans,
            vec![
                Span {
                    emphasis: Emphasis::Strong,
                    text: "a".to_owned()
                },
                Span {
                    emphasis: Emphasis::Plain,
                    text: " x ".to_owned()
                },
                Span {
                    emphasis: Emphasis::Strong,
                    text: "b".to_owned()
                },
            ]
        );
        assert_eq!(
            render_html("*하나* 그리고 *둘*", StyleTarget::Screen),
            "<em>하나</em> 그리고 <em>둘</em>"
        );
    }

    #[test]
    fn list_items_render_for_both_targets() {
        assert_eq!(
            render_html("- 항목", StyleTarget::Screen),
            r#"<li class="ml-6 list-disc">항목</li>"#
        );
        assert_eq!(
            render_html("- 항목", StyleTarget::Print),
            r#"<li style="margin-left: 1.5em; list-style-type: disc;">항목</li>"#
        );
    }

    #[test]
    fn heading_content_keeps_inline_emphasis() {
        assert_eq!(
            render_html("## 성장의 **순간**", StyleTarget::Screen),
            r#"<h2 class="text-2xl font-bold text-red-600 mt-6 mb-3">성장의 <strong>순간</strong></h2>"#
        );
    }

    #[test]
    fn screen_and_print_share_one_parse() {
        // Structural parity: the two targets differ only in styling
        // attributes, never in which rules fired.
        let input = "# 제목\n- **중요한** 항목\n본문 *강조* 텍스트";
        let screen = render_html(input, StyleTarget::Screen);
        let print = render_html(input, StyleTarget::Print);
        for tag in ["<h1", "<li", "<strong>", "<em>", "<br />"] {
            assert_eq!(
                screen.matches(tag).count(),
                print.matches(tag).count(),
                "tag {tag} count must match between targets"
            );
        }
    }

    #[test]
    fn dash_without_space_is_not_a_list_item() {
        let parsed = parse("-항목");
        assert_eq!(parsed.first().unwrap().block, Block::Paragraph);
    }

    #[test]
    fn blank_line_is_an_empty_paragraph() {
        let parsed = parse("위\n\n아래");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.get(1).unwrap().spans, vec![]);
        assert_eq!(render_html("위\n\n아래", StyleTarget::Screen), "위<br /><br />아래");
    }
}
