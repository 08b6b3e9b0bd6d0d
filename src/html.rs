/// Appends `text` to `out` with HTML special characters replaced by entities.
pub(crate) fn escape_into(out: &mut String, text: &str) {
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
}

pub(crate) fn push_text(out: &mut String, text: &str, escape: bool) {
	if escape {
		escape_into(out, text)
	} else {
		out.push_str(text)
	}
}
