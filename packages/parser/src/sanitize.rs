/// Balance the braces of a value that is spliced into markup.
///
/// Closing braces without a matching opener are dropped; openers left
/// unclosed get their `}` appended before any trailing whitespace.
pub fn sanitize_markup(value: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => continue,
            '}' => depth -= 1,
            _ => {}
        }
        out.push(c);
    }

    if depth == 0 {
        return out;
    }
    let trimmed_len = out.trim_end().len();
    let tail = out.split_off(trimmed_len);
    out.extend(std::iter::repeat('}').take(depth));
    out.push_str(&tail);
    out
}
