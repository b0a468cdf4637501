//! Tooltip markup for nodes and edges.
//!
//! The client renders titles as raw HTML, so every value passes through
//! [`escape_html`] exactly once while the surrounding tags are emitted as-is.

use std::fmt::Write;

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			_ => out.push(c),
		}
	}
	out
}

/// Ordered key/value rows shown in a tooltip table.
pub type Rows = Vec<(&'static str, String)>;

/// Build a tooltip: a title span followed by a table of `rows` in order.
pub fn describe(title: &str, rows: &[(&str, String)]) -> String {
	let mut html = format!(
		r#"<span class="topology-item-description">{}</span>"#,
		escape_html(title)
	);
	html.push_str(r#"<table class="topology-item-table"><tr>"#);
	for (i, (key, value)) in rows.iter().enumerate() {
		if i > 0 {
			html.push_str("</tr><tr>");
		}
		// Writing into a String cannot fail.
		let _ = write!(
			html,
			r#"<th align="right">{}</th><td>{}</td>"#,
			escape_html(key),
			escape_html(value)
		);
	}
	html.push_str("</tr></table>");
	html
}
