#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanStyle {
    Plain,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub style: SpanStyle,
}

/// Splits a dialogue line on backticks. Text between a pair of backticks is
/// a code span; an unmatched trailing backtick opens a code span that runs
/// to the end. Empty spans are dropped.
pub fn parse_rich_text(line: &str) -> Vec<TextSpan> {
    line.split('`')
        .enumerate()
        .filter(|(_, chunk)| !chunk.is_empty())
        .map(|(index, chunk)| TextSpan {
            text: chunk.to_string(),
            style: if index % 2 == 1 {
                SpanStyle::Code
            } else {
                SpanStyle::Plain
            },
        })
        .collect()
}

pub fn plain_text(spans: &[TextSpan]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}
