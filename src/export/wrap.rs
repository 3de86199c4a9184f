/// Upper-bound glyph width for the built-in Helvetica faces, in em. Covers the bold face,
/// which is never narrower than the regular one.
fn glyph_em(c: char) -> f32 {
    match c {
        ' ' => 0.28,
        'i' | 'j' | 'l' | 't' | 'f' | 'I' | '.' | ',' | ';' | ':' | '\'' | '!' | '|' => 0.34,
        'W' | '@' => 0.98,
        '%' => 0.9,
        'M' | 'm' => 0.89,
        'w' => 0.78,
        c if c.is_ascii_uppercase() => 0.78,
        c if c.is_ascii_digit() => 0.56,
        c if c.is_ascii_lowercase() => 0.62,
        _ => 0.72,
    }
}

pub fn estimate_width_pt(text: &str, font_size: f32) -> f32 {
    text.chars().map(glyph_em).sum::<f32>() * font_size
}

/// Greedy word wrap. Words are never split; a word wider than the line gets a line of its own.
pub fn wrap_text(text: &str, font_size: f32, max_width_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate_width = estimate_width_pt(&current, font_size)
            + estimate_width_pt(" ", font_size)
            + estimate_width_pt(word, font_size);
        if candidate_width <= max_width_pt {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
