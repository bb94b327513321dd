use crate::{dialect::Dialect, language::Direction};

const OUTPUT_RULES: &str = "翻訳結果の文章だけを1行で出力してください。説明・補足・ローマ字・引用符は付けないでください。";

/// Labels a model sometimes restates in front of its answer.
const KNOWN_LABELS: &[&str] = &[
    "標準語",
    "方言",
    "翻訳結果",
    "翻訳",
    "結果",
    "standard",
    "dialect",
    "translation",
    "result",
];

/// Build the provider prompt for one text.
pub fn build_prompt(text: &str, direction: Direction, dialect: &Dialect) -> String {
    if direction.is_to_dialect() {
        format!(
            "あなたは日本の方言の専門家です。次の標準語の文章を、{name}の自然な話し言葉に翻訳してください。\n\
             {OUTPUT_RULES}\n\n\
             標準語: {text}\n\
             {name}:",
            name = dialect.name,
        )
    } else {
        format!(
            "あなたは日本の方言の専門家です。次の{name}の文章を、自然な標準語に翻訳してください。\n\
             {OUTPUT_RULES}\n\n\
             {name}: {text}\n\
             標準語:",
            name = dialect.name,
        )
    }
}

/// Reduce a raw provider answer to the translated sentence.
///
/// Takes the first line and strips one restated label such as `標準語:` or
/// `result:`. Falls back to the first line when stripping leaves nothing.
pub fn clean_response(raw: &str, dialect: &Dialect) -> String {
    let first_line = raw.trim().lines().next().unwrap_or_default();

    let stripped = KNOWN_LABELS
        .iter()
        .copied()
        .chain(std::iter::once(dialect.name))
        .find_map(|label| strip_label(first_line, label))
        .unwrap_or(first_line)
        .trim();

    if stripped.is_empty() {
        first_line.to_string()
    } else {
        stripped.to_string()
    }
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = line[label.len()..].trim_start();
    rest.strip_prefix(':').or_else(|| rest.strip_prefix('：'))
}
