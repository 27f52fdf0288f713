//! Name and text normalization rules.
//!
//! Role and capability names are lowercase ASCII: `[a-z0-9_-]`, with spaces
//! turned into underscores. Everything else is stripped.

/// Pseudo-capability that must never be stored as a grant or denial.
pub const DO_NOT_ALLOW: &str = "do_not_allow";

/// Normalize a role name: lowercase, keep `[a-z0-9_- ]`, spaces → `_`.
pub fn sanitize_role(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | ' '))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Normalize a capability name. Capabilities follow the role name rules.
pub fn sanitize_cap(raw: &str) -> String {
    sanitize_role(raw)
}

/// Remove `<script>` and `<style>` elements together with their contents.
///
/// Matching is ASCII case-insensitive. An unterminated element swallows the
/// rest of the input.
pub fn strip_script_blocks(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let next = ["script", "style"]
            .iter()
            .filter_map(|tag| {
                lower[pos..]
                    .find(&format!("<{tag}"))
                    .map(|offset| (pos + offset, *tag))
            })
            .min_by_key(|(start, _)| *start);

        let Some((start, tag)) = next else {
            out.push_str(&input[pos..]);
            break;
        };

        out.push_str(&input[pos..start]);
        let close = format!("</{tag}");
        pos = match lower[start..].find(&close) {
            Some(offset) => {
                let close_start = start + offset;
                match lower[close_start..].find('>') {
                    Some(end) => close_start + end + 1,
                    None => input.len(),
                }
            }
            None => input.len(),
        };
    }

    out
}

/// Strip every HTML tag (and script/style contents) and trim whitespace.
pub fn strip_all_tags(input: &str) -> String {
    let without_scripts = strip_script_blocks(input);
    let mut out = String::with_capacity(without_scripts.len());
    let mut in_tag = false;

    for c in without_scripts.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_role_lowercases_and_replaces_spaces() {
        assert_eq!(sanitize_role("Shop Manager"), "shop_manager");
        assert_eq!(sanitize_role("  Editor-In-Chief "), "__editor-in-chief_");
    }

    #[test]
    fn sanitize_cap_strips_punctuation() {
        assert_eq!(sanitize_cap("My Custom Cap!"), "my_custom_cap");
        assert_eq!(sanitize_cap("édit<posts>"), "ditposts");
        assert_eq!(sanitize_cap("!!!"), "");
    }

    #[test]
    fn strip_script_blocks_removes_contents() {
        let input = "Hello <SCRIPT type=\"x\">alert(1)</script>world<style>p{}</style>!";
        assert_eq!(strip_script_blocks(input), "Hello world!");
    }

    #[test]
    fn strip_script_blocks_unterminated_swallows_rest() {
        assert_eq!(strip_script_blocks("keep <script>alert(1)"), "keep ");
    }

    #[test]
    fn strip_all_tags_keeps_text() {
        assert_eq!(strip_all_tags("  <b>Shop</b> <i>Manager</i> "), "Shop Manager");
    }
}
