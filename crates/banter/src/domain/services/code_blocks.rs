//! Code block rendering for assistant replies
//!
//! Fenced markdown blocks are turned into `<pre><code>` elements carrying
//! `hljs language-*` classes so the client's highlighter can style them.
//! Everything outside a fence is left untouched.

use regex::{Captures, Regex};
use std::sync::OnceLock;

static CODE_BLOCK: OnceLock<Regex> = OnceLock::new();

fn code_block_regex() -> &'static Regex {
    CODE_BLOCK.get_or_init(|| {
        Regex::new(r"```([\w+#.-]+)?[ \t]*\n([\s\S]*?)```").expect("code block pattern is valid")
    })
}

/// Replace every fenced code block with an HTML `<pre><code>` element
pub fn render_code_blocks(content: &str) -> String {
    code_block_regex()
        .replace_all(content, |caps: &Captures| {
            let language = caps
                .get(1)
                .map(|m| m.as_str())
                .unwrap_or("plaintext");
            let code = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            format!(
                "<pre><code class=\"hljs language-{}\">{}</code></pre>",
                language,
                escape_html(code)
            )
        })
        .into_owned()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
